//! Sync engine settings
//!
//! Tuning values for the playback clock, polling and translation, stored as
//! `settings.json` in the config directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::lyrics::translation::MAX_TIMESTAMP_DIFF_MS;
use super::lyrics::{LanguageHeuristic, LanguageTables, TranslationAligner};
use super::playback::ReconcilerConfig;
use super::playback::resolver::CROSSFADE_WINDOW_MS;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Playback clock reconciliation
    #[serde(default)]
    pub sync: SyncSettings,
    /// Playback source polling
    #[serde(default)]
    pub polling: PollingSettings,
    /// Display-facing values
    #[serde(default)]
    pub display: DisplaySettings,
    /// Translation settings
    #[serde(default)]
    pub translation: TranslationSettings,
}

/// Playback clock reconciliation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Drift above which the estimate jumps to the sample
    pub snap_threshold_ms: u64,
    /// Window over which smaller drifts are blended out
    pub blend_duration_ms: u64,
    /// Drift at or below which samples are ignored
    pub ignore_threshold_ms: u64,
    /// Display refresh period driving the clock
    pub frame_interval_ms: u64,
}

/// Playback source polling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingSettings {
    /// Poll period when no line boundary is near
    pub default_interval_ms: u64,
    /// Poll period when a line boundary is imminent
    pub fast_interval_ms: u64,
    /// How close a boundary must be to count as imminent
    pub imminent_window_ms: u64,
}

/// Display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Anticipation window before a line boundary
    pub crossfade_window_ms: u64,
}

/// Translation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationSettings {
    /// Attach translations at all
    pub enabled: bool,
    /// Target language for machine translation
    pub target_lang: String,
    /// Maximum number of memoized line translations
    pub cache_capacity: usize,
    /// Maximum start time gap for an aligned translation pair
    pub max_timestamp_diff_ms: u64,
    /// Optional JSON file overriding the language heuristic word tables
    #[serde(default)]
    pub language_tables: Option<PathBuf>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            snap_threshold_ms: 2000,
            blend_duration_ms: 500,
            ignore_threshold_ms: 50,
            frame_interval_ms: 16,
        }
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            default_interval_ms: 3000,
            fast_interval_ms: 1000,
            imminent_window_ms: 1500,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            crossfade_window_ms: CROSSFADE_WINDOW_MS,
        }
    }
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            target_lang: "en".to_string(),
            cache_capacity: crate::cache::DEFAULT_CAPACITY,
            max_timestamp_diff_ms: MAX_TIMESTAMP_DIFF_MS,
            language_tables: None,
        }
    }
}

impl SyncSettings {
    pub fn reconciler_config(&self) -> ReconcilerConfig {
        ReconcilerConfig {
            snap_threshold_ms: self.snap_threshold_ms as f64,
            blend_duration_ms: self.blend_duration_ms as f64,
            ignore_threshold_ms: self.ignore_threshold_ms as f64,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

impl TranslationSettings {
    pub fn aligner(&self) -> TranslationAligner {
        TranslationAligner {
            max_timestamp_diff_ms: self.max_timestamp_diff_ms,
        }
    }

    /// Heuristic built from the configured tables, defaults when unset or unreadable
    pub fn language_heuristic(&self) -> LanguageHeuristic {
        let tables = match &self.language_tables {
            Some(path) => LanguageTables::load_from_file(path).unwrap_or_else(|e| {
                tracing::warn!("Using default language tables: {:#}", e);
                LanguageTables::default()
            }),
            None => LanguageTables::default(),
        };
        LanguageHeuristic::new(&tables)
    }
}

impl Settings {
    /// `settings.json` in the config directory
    pub fn file_path() -> Option<PathBuf> {
        crate::utils::config_dir().map(|dir| dir.join("settings.json"))
    }

    /// Load from the default file, defaults when missing or invalid
    pub fn load() -> Self {
        Self::file_path()
            .and_then(|path| Self::load_from_file(&path).ok())
            .unwrap_or_default()
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SettingsError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Save settings to the default file
    pub fn save(&self) -> Result<(), SettingsError> {
        if let Some(path) = Self::file_path() {
            self.save_to_file(&path)
        } else {
            Err(SettingsError::Io(
                "Could not determine config directory".to_string(),
            ))
        }
    }

    /// Save settings to a specific file
    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::Io(e.to_string()))?;
        }

        let content =
            serde_json::to_string_pretty(self).map_err(|e| SettingsError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| SettingsError::Io(e.to_string()))?;
        Ok(())
    }
}

/// Settings load/save failure
#[derive(Debug, Clone)]
pub enum SettingsError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "Settings IO error: {}", e),
            SettingsError::Parse(e) => write!(f, "Settings parse error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.polling.fast_interval_ms = 750;
        settings.translation.enabled = false;
        settings.save_to_file(&path).unwrap();

        let loaded = Settings::load_from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"sync": {"snap_threshold_ms": 3000, "blend_duration_ms": 400, "ignore_threshold_ms": 40, "frame_interval_ms": 8}}"#)
                .unwrap();
        assert_eq!(settings.sync.snap_threshold_ms, 3000);
        assert_eq!(settings.polling, PollingSettings::default());
        assert_eq!(settings.translation.max_timestamp_diff_ms, 5000);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert!(matches!(
            Settings::load_from_file(&path),
            Err(SettingsError::Io(_))
        ));

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Settings::load_from_file(&path),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_unreadable_tables_fall_back_to_defaults() {
        let settings = TranslationSettings {
            language_tables: Some(PathBuf::from("/nonexistent/tables.json")),
            ..Default::default()
        };
        let heuristic = settings.language_heuristic();
        assert!(!heuristic.needs_translation("I am here"));
    }

    #[test]
    fn test_reconciler_config() {
        let config = SyncSettings::default().reconciler_config();
        assert_eq!(config, ReconcilerConfig::default());
    }
}
