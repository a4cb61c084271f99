//! Active line resolution
//!
//! Finds the line whose interval contains the current time and an
//! anticipatory cross-fade weight for the upcoming boundary. No visual
//! decisions are made here; the renderer gets indices and a 0..=1 weight.

use crate::features::lyrics::LyricLine;

/// Default anticipation window before a line boundary
pub const CROSSFADE_WINDOW_MS: u64 = 200;

/// Resolution of the current time against a line sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveLine {
    /// Active line, `None` before the first line starts
    pub index: Option<usize>,
    /// Line following the active one (the first line when none is active)
    pub next_index: Option<usize>,
    /// 0 outside the anticipation window, rising to 1 at the next boundary
    pub crossfade_progress: f32,
}

impl ActiveLine {
    pub const NONE: Self = Self {
        index: None,
        next_index: None,
        crossfade_progress: 0.0,
    };
}

impl Default for ActiveLine {
    fn default() -> Self {
        Self::NONE
    }
}

/// Index of the active line at `current_time_ms`
///
/// The lowest index whose start is reached and whose successor (if any)
/// has not started yet.
pub fn active_index(lines: &[LyricLine], current_time_ms: i64) -> Option<usize> {
    let starts = |i: usize| lines[i].start_time_ms as i64;
    (0..lines.len()).find(|&i| {
        current_time_ms >= starts(i) && (i + 1 == lines.len() || current_time_ms < starts(i + 1))
    })
}

/// Resolve with the default cross-fade window
pub fn resolve(lines: &[LyricLine], current_time_ms: i64) -> ActiveLine {
    resolve_with_window(lines, current_time_ms, CROSSFADE_WINDOW_MS)
}

/// Resolve the active line and cross-fade weight
pub fn resolve_with_window(lines: &[LyricLine], current_time_ms: i64, window_ms: u64) -> ActiveLine {
    let index = active_index(lines, current_time_ms);
    let next = index.map_or(0, |i| i + 1);
    let next_index = (next < lines.len()).then_some(next);

    let crossfade_progress = next_index
        .map(|next| {
            let time_to_next = lines[next].start_time_ms as i64 - current_time_ms;
            let window = window_ms as i64;
            if time_to_next > 0 && time_to_next < window {
                1.0 - time_to_next as f32 / window as f32
            } else {
                0.0
            }
        })
        .unwrap_or(0.0);

    ActiveLine {
        index,
        next_index,
        crossfade_progress,
    }
}

/// Milliseconds until the next line start after `current_time_ms`
pub fn time_to_next_boundary(lines: &[LyricLine], current_time_ms: i64) -> Option<i64> {
    lines
        .iter()
        .map(|line| line.start_time_ms as i64 - current_time_ms)
        .filter(|&delta| delta > 0)
        .min()
}
