//! Lyrics data types

use serde::{Deserialize, Serialize};

/// Raw lyrics as delivered by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLyrics {
    /// Timestamp-tagged text: `[mm:ss.xx]text` per line
    Synced(String),
    /// Plain text without timing information
    Plain(String),
}

/// A single line of lyrics
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricLine {
    /// Line text
    pub text: String,
    /// Start time in milliseconds
    pub start_time_ms: u64,
    /// Translated text, attached by the translation stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

impl LyricLine {
    pub fn new(text: impl Into<String>, start_time_ms: u64) -> Self {
        Self {
            text: text.into(),
            start_time_ms,
            translation: None,
        }
    }

    /// Copy of this line carrying `translation`
    pub fn with_translation(&self, translation: impl Into<String>) -> Self {
        Self {
            translation: Some(translation.into()),
            ..self.clone()
        }
    }

    /// Check if the line has a translation attached
    pub fn is_translated(&self) -> bool {
        self.translation.is_some()
    }
}

/// Number of lines carrying a translation
pub fn count_translated(lines: &[LyricLine]) -> usize {
    lines.iter().filter(|line| line.is_translated()).count()
}
