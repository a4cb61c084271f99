//! Lyrics parsing module
//!
//! - Synced: `[mm:ss.xx]text` lines with millisecond start times
//! - Plain: untimed text, spaced evenly over the track duration

mod lrc;
mod plain;
mod types;

pub use lrc::parse_synced;
pub use plain::{parse_unsynced, placeholder_lyrics};
pub use types::*;

/// Parse provider output into lyric lines
///
/// Synced text that yields no lines is not re-read as plain text: a blob
/// that claims to be synced but has no valid tags is treated as no data.
pub fn parse_lyrics(raw: &RawLyrics, duration_ms: i64) -> Vec<LyricLine> {
    match raw {
        RawLyrics::Synced(text) => parse_synced(text),
        RawLyrics::Plain(text) => parse_unsynced(text, duration_ms),
    }
}
