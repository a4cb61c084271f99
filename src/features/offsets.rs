//! Per-track timing offsets
//!
//! A user-adjustable offset (in milliseconds) added to the reconciled
//! playback time before resolving the active line. Persisted per track id.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

/// Offsets are clamped to ±this many milliseconds
pub const OFFSET_LIMIT_MS: i64 = 500;

/// Increment used by manual nudges
pub const OFFSET_STEP_MS: i64 = 50;

/// Clamp an offset to the supported range
pub fn clamp_offset(offset_ms: i64) -> i64 {
    offset_ms.clamp(-OFFSET_LIMIT_MS, OFFSET_LIMIT_MS)
}

/// Persisted per-track timing adjustment
pub trait OffsetStore: Send + Sync {
    /// Saved offset for a track, 0 when none is stored
    fn get(&self, track_id: &str) -> i64;
    fn set(&self, track_id: &str, offset_ms: i64) -> Result<(), OffsetStoreError>;
}

/// Non-persistent store
#[derive(Debug, Default)]
pub struct MemoryOffsetStore {
    offsets: Mutex<HashMap<String, i64>>,
}

impl MemoryOffsetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OffsetStore for MemoryOffsetStore {
    fn get(&self, track_id: &str) -> i64 {
        self.offsets.lock().get(track_id).copied().unwrap_or(0)
    }

    fn set(&self, track_id: &str, offset_ms: i64) -> Result<(), OffsetStoreError> {
        self.offsets
            .lock()
            .insert(track_id.to_string(), clamp_offset(offset_ms));
        Ok(())
    }
}

/// Store backed by a JSON object `{ "trackId": offsetMs }`
#[derive(Debug)]
pub struct JsonOffsetStore {
    path: PathBuf,
    offsets: Mutex<HashMap<String, i64>>,
}

impl JsonOffsetStore {
    /// Default file in the config directory
    pub fn default_path() -> Option<PathBuf> {
        crate::utils::config_dir().map(|dir| dir.join("offsets.json"))
    }

    /// Open a store; a missing or unreadable file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let offsets = match Self::read(&path) {
            Ok(offsets) => offsets,
            Err(OffsetStoreError::Io(_)) => HashMap::new(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable offsets file {:?}: {}", path, e);
                HashMap::new()
            }
        };
        Self {
            path,
            offsets: Mutex::new(offsets),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<HashMap<String, i64>, OffsetStoreError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| OffsetStoreError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| OffsetStoreError::Parse(e.to_string()))
    }

    fn write(&self, offsets: &HashMap<String, i64>) -> Result<(), OffsetStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| OffsetStoreError::Io(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(offsets)
            .map_err(|e| OffsetStoreError::Parse(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| OffsetStoreError::Io(e.to_string()))
    }
}

impl OffsetStore for JsonOffsetStore {
    fn get(&self, track_id: &str) -> i64 {
        self.offsets.lock().get(track_id).copied().unwrap_or(0)
    }

    fn set(&self, track_id: &str, offset_ms: i64) -> Result<(), OffsetStoreError> {
        let mut offsets = self.offsets.lock();
        offsets.insert(track_id.to_string(), clamp_offset(offset_ms));
        self.write(&offsets)
    }
}

/// Errors that can occur with the offset store
#[derive(Debug, Clone)]
pub enum OffsetStoreError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for OffsetStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OffsetStoreError::Io(e) => write!(f, "Offset store IO error: {}", e),
            OffsetStoreError::Parse(e) => write!(f, "Offset store parse error: {}", e),
        }
    }
}

impl std::error::Error for OffsetStoreError {}
