//! External collaborators
//!
//! Traits for everything the sync engine consumes but does not own (playback
//! state, lyrics, translations), plus HTTP clients for LRCLIB and MyMemory.

mod lrclib;
pub mod model;
mod mymemory;

use anyhow::Result;
use async_trait::async_trait;

pub use lrclib::LrcLibClient;
pub use model::{PlaybackSnapshot, TrackMeta};
pub use mymemory::MyMemoryClient;

use crate::features::lyrics::RawLyrics;

/// Upstream playback-state query
#[async_trait]
pub trait PlaybackSource: Send + Sync {
    /// Current playback state, `None` when nothing is loaded
    async fn poll(&self) -> Result<Option<PlaybackSnapshot>>;
}

/// Lyrics lookup for a track
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    async fn fetch(
        &self,
        track_name: &str,
        artist_name: &str,
        duration_ms: u64,
    ) -> Result<Option<RawLyrics>>;
}

/// Source of an official, independently timed translation of a track
#[async_trait]
pub trait TranslationCandidateProvider: Send + Sync {
    /// Synced lyrics of the translated version, if one exists
    async fn fetch_candidate(&self, track_name: &str, artist_name: &str) -> Result<Option<String>>;
}

/// Generic per-line machine translation
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate `text`; `source_lang` is a hint such as `"ja"` or `"auto"`
    async fn translate(&self, text: &str, source_lang: &str) -> Result<Option<String>>;
}
