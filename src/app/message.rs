//! Session messages and commands

use crate::api::{PlaybackSnapshot, TrackMeta};
use crate::features::lyrics::{LoadedLyrics, LyricLine, TranslatedLyrics};

use super::TrackFence;

/// Events delivered to the session
#[derive(Debug, Clone)]
pub enum Message {
    /// Playback source answered; `at_ms` is the local monotonic receive time
    Polled {
        snapshot: Option<PlaybackSnapshot>,
        at_ms: f64,
    },
    /// Playback source query failed
    PollFailed(String),
    /// Lyrics fetch finished for the track identified by the fence
    LyricsLoaded(TrackFence, LoadedLyrics),
    /// Translation stage finished
    TranslationsLoaded(TrackFence, TranslatedLyrics),
    /// Title translation finished
    TitleTranslated(TrackFence, Option<String>),
    /// Shift the current track's timing offset by the given milliseconds
    NudgeOffset(i64),
}

/// Asynchronous work requested by the session
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchLyrics {
        fence: TrackFence,
        track: TrackMeta,
    },
    FetchTranslations {
        fence: TrackFence,
        track: TrackMeta,
        lines: Vec<LyricLine>,
    },
    TranslateTitle {
        fence: TrackFence,
        title: String,
    },
}

impl Command {
    /// Fence the result of this command will be checked against
    pub fn fence(&self) -> TrackFence {
        match self {
            Command::FetchLyrics { fence, .. }
            | Command::FetchTranslations { fence, .. }
            | Command::TranslateTitle { fence, .. } => *fence,
        }
    }
}
