//! Plain (unsynced) lyrics and placeholder content
//!
//! Lines without timestamps get evenly spaced placeholder timings over the
//! track duration.

use super::types::LyricLine;

/// Shown when a track is known but no lyrics were found
const NO_LYRICS_LINES: [&str; 6] = [
    "♪ ♪ ♪",
    "",
    "No lyrics available",
    "for this song",
    "",
    "♪ ♪ ♪",
];

/// Shown before any track is playing
const WAITING_LINES: [&str; 6] = [
    "♪ Waiting for music...",
    "",
    "Play a song",
    "and lyrics will appear here",
    "",
    "♪ ♪ ♪",
];

/// Evenly spaced start time for line `index` of `count` over `duration_ms`
fn spaced_start(index: usize, count: usize, duration_ms: i64) -> u64 {
    if count == 0 || duration_ms <= 0 {
        return 0;
    }
    (index as u128 * duration_ms as u128 / count as u128) as u64
}

/// Split plain lyrics into non-blank lines with evenly spaced timings
///
/// Returns an empty sequence for a non-positive duration or when there
/// are no non-blank lines.
pub fn parse_unsynced(src: &str, duration_ms: i64) -> Vec<LyricLine> {
    if duration_ms <= 0 {
        return Vec::new();
    }

    let texts: Vec<&str> = src
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let count = texts.len();
    texts
        .into_iter()
        .enumerate()
        .map(|(index, text)| LyricLine::new(text, spaced_start(index, count, duration_ms)))
        .collect()
}

/// Placeholder rows displayed when no lyrics are available
///
/// `has_track` selects the "no lyrics" block over the "waiting" block.
/// Blank rows are kept; they are spacing, not lyrics.
pub fn placeholder_lyrics(duration_ms: i64, has_track: bool) -> Vec<LyricLine> {
    let texts = if has_track {
        NO_LYRICS_LINES
    } else {
        WAITING_LINES
    };

    texts
        .iter()
        .enumerate()
        .map(|(index, text)| LyricLine::new(*text, spaced_start(index, texts.len(), duration_ms)))
        .collect()
}
