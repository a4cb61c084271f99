//! Translation-need heuristic
//!
//! Decides whether a lyric line should be translated. This is a word-list
//! heuristic, not language identification: CJK/Hangul text always needs
//! translation, German and English function words mark a line as native,
//! romanized Japanese particles mark it as foreign, and anything else is
//! translated by default.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const GERMAN_INDICATORS: &[&str] = &[
    "und", "der", "die", "das", "ist", "ich", "ein", "eine", "nicht", "sie", "es", "wir", "auf",
    "für", "mit", "auch", "aber", "oder", "wenn", "noch", "wie", "ihr", "ihre", "dein", "mein",
    "sein", "haben", "werden", "kann", "sind",
];

const ENGLISH_INDICATORS: &[&str] = &[
    "the", "is", "are", "was", "were", "have", "has", "had", "will", "would", "could", "should",
    "can", "may", "might", "must", "and", "but", "or", "if", "when", "where", "what", "who",
    "how", "why", "this", "that", "these", "those", "with", "for", "not", "you", "your", "my",
    "his", "her", "its", "our", "their", "all", "each", "every", "both", "few", "more", "most",
    "other", "some", "such", "than", "too", "very", "just", "even", "also", "back", "now", "here",
    "there", "then", "once", "before", "after", "again", "further", "always", "often", "usually",
    "sometimes", "never", "already", "still", "yet", "soon", "finally", "only", "really",
    "probably", "perhaps", "maybe", "well", "actually", "basically", "certainly", "definitely",
    "possibly",
];

const ROMAJI_INDICATORS: &[&str] = &[
    "wa", "wo", "ga", "no", "ni", "de", "to", "ka", "mo", "yo", "ne", "na", "ra", "ta", "da",
    "sa", "za", "ha", "ba", "pa", "ma", "ya", "la", "desu", "masu", "nai", "tai", "iru", "eru",
    "aru", "suru", "kuru", "tte", "kkiri", "kke", "dayo", "nano", "nda", "jan", "chan", "kun",
    "san", "sama", "sensei", "senpai", "dono", "tachi", "gata", "boku", "watashi", "atashi",
    "ore", "omae", "kimi", "anata", "koko", "soko", "asoko", "doko", "nani", "naze", "doushite",
    "itsu", "dou", "donna", "kono", "sono", "ano", "kore", "sore", "are", "dore", "minna",
    "hitori", "futari", "hito", "mono", "koto", "toki", "mae", "ato", "naka", "soto", "ue",
    "shita", "migi", "hidari", "totemo", "sugoi", "kawaii", "ureshii", "kanashii", "kowai",
    "tanoshii", "oishii", "samui", "atsui", "hayai", "osoi", "chiisai", "ookii", "ii", "warui",
    "nee", "saa", "maa", "aa", "ee", "oo", "un", "hai", "iie", "etto", "chotto", "yappari",
    "tabun", "kitto", "zettai", "hontou", "majide",
];

/// Hiragana, Katakana, CJK Unified Ideographs or Hangul syllables
fn is_cjk(c: char) -> bool {
    matches!(
        c,
        '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{4E00}'..='\u{9FFF}' | '\u{AC00}'..='\u{D7AF}'
    )
}

fn is_hangul(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7AF}')
}

/// Check if text contains any CJK or Hangul character
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk)
}

/// Source-language hint for a translation request
///
/// `"ko"` for Hangul, `"ja"` for other CJK scripts, `"auto"` otherwise.
pub fn detect_source_lang(text: &str) -> &'static str {
    if text.chars().any(is_hangul) {
        "ko"
    } else if contains_cjk(text) {
        "ja"
    } else {
        "auto"
    }
}

/// Word tables driving the heuristic
///
/// Kept as data so they can be extended from a JSON file without touching
/// the decision logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTables {
    /// German function words; a hit marks the line as native
    #[serde(default)]
    pub german: Vec<String>,
    /// English function/stop words; a hit marks the line as native
    #[serde(default)]
    pub english: Vec<String>,
    /// Romanized Japanese particles and endings; a hit marks the line as foreign
    #[serde(default)]
    pub romaji: Vec<String>,
}

impl Default for LanguageTables {
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            german: owned(GERMAN_INDICATORS),
            english: owned(ENGLISH_INDICATORS),
            romaji: owned(ROMAJI_INDICATORS),
        }
    }
}

impl LanguageTables {
    /// Load tables from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read language tables from {:?}", path))?;
        let tables = serde_json::from_str(&content)
            .with_context(|| format!("Invalid language tables in {:?}", path))?;
        Ok(tables)
    }
}

fn word_set(words: &[String]) -> HashSet<String> {
    words.iter().map(|w| w.trim().to_lowercase()).collect()
}

/// Outcome of classifying a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageVerdict {
    /// Empty or whitespace only
    Blank,
    /// Contains kana, CJK ideographs or Hangul
    Cjk,
    /// German indicator word found
    German,
    /// English indicator word found
    English,
    /// Romanized Japanese indicator found
    Romaji,
    /// Latin-script text without any indicator
    Unknown,
}

impl LanguageVerdict {
    /// Whether a line with this verdict gets translated (unknown included)
    pub fn needs_translation(self) -> bool {
        matches!(self, Self::Cjk | Self::Romaji | Self::Unknown)
    }
}

/// Decides which lines need translation
#[derive(Debug, Clone)]
pub struct LanguageHeuristic {
    german: HashSet<String>,
    english: HashSet<String>,
    romaji: HashSet<String>,
}

impl Default for LanguageHeuristic {
    fn default() -> Self {
        Self::new(&LanguageTables::default())
    }
}

impl LanguageHeuristic {
    pub fn new(tables: &LanguageTables) -> Self {
        Self {
            german: word_set(&tables.german),
            english: word_set(&tables.english),
            romaji: word_set(&tables.romaji),
        }
    }

    /// Classify a line of text, first matching rule wins
    pub fn classify(&self, text: &str) -> LanguageVerdict {
        if text.trim().is_empty() {
            return LanguageVerdict::Blank;
        }

        if contains_cjk(text) {
            return LanguageVerdict::Cjk;
        }

        // Whole-word, case-insensitive matching
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        let hits = |set: &HashSet<String>| words.iter().any(|w| set.contains(w));

        if hits(&self.german) {
            LanguageVerdict::German
        } else if hits(&self.english) {
            LanguageVerdict::English
        } else if hits(&self.romaji) {
            LanguageVerdict::Romaji
        } else {
            LanguageVerdict::Unknown
        }
    }

    /// Check if a line of text should be translated
    pub fn needs_translation(&self, text: &str) -> bool {
        self.classify(text).needs_translation()
    }
}
