// src/app/state.rs
//! Session state
//!
//! Everything that belongs to the current track lives here and is reset
//! together when the track changes.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::api::TrackMeta;
use crate::features::lyrics::{LyricLine, TranslationSource};
use crate::features::playback::{ActiveLine, TimeReconciler, poll_interval};
use crate::features::{OffsetStore, Settings};

/// Monotonic track generation
///
/// Every track change advances the fence. Async results carry the fence
/// they were requested under and are dropped if it no longer matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TrackFence(u64);

impl TrackFence {
    /// Move to the next generation and return it
    pub fn advance(&mut self) -> Self {
        self.0 += 1;
        *self
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Lyrics session for a single playback source
pub struct Session {
    pub(crate) settings: Settings,
    pub(crate) offsets: Arc<dyn OffsetStore>,
    pub(crate) fence: TrackFence,
    pub(crate) track: Option<TrackMeta>,
    /// `None` until the first snapshot arrives
    pub(crate) reconciler: Option<TimeReconciler>,
    pub(crate) lines: Vec<LyricLine>,
    pub(crate) is_placeholder: bool,
    pub(crate) translation_source: TranslationSource,
    pub(crate) title_translation: Option<String>,
    /// Per-track user offset, added to the estimate before line lookup
    pub(crate) offset_ms: i64,
    pub(crate) active: ActiveLine,
}

impl Session {
    pub fn new(settings: Settings, offsets: Arc<dyn OffsetStore>) -> Self {
        Self {
            settings,
            offsets,
            fence: TrackFence::default(),
            track: None,
            reconciler: None,
            lines: Vec::new(),
            is_placeholder: false,
            translation_source: TranslationSource::None,
            title_translation: None,
            offset_ms: 0,
            active: ActiveLine::NONE,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn fence(&self) -> TrackFence {
        self.fence
    }

    pub fn track(&self) -> Option<&TrackMeta> {
        self.track.as_ref()
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn is_placeholder(&self) -> bool {
        self.is_placeholder
    }

    pub fn translation_source(&self) -> TranslationSource {
        self.translation_source
    }

    pub fn title_translation(&self) -> Option<&str> {
        self.title_translation.as_deref()
    }

    pub fn offset_ms(&self) -> i64 {
        self.offset_ms
    }

    /// Line reported by the most recent frame
    pub fn active_line(&self) -> ActiveLine {
        self.active
    }

    pub fn is_playing(&self) -> bool {
        self.reconciler.as_ref().is_some_and(|r| r.is_playing())
    }

    /// Estimated playback position with the track offset applied
    pub fn current_time_ms(&self) -> i64 {
        let estimate = self.reconciler.as_ref().map_or(0, |r| r.estimate_ms());
        estimate as i64 + self.offset_ms
    }

    /// How long to wait before the next playback query
    pub fn poll_interval(&self) -> Duration {
        poll_interval(&self.lines, self.current_time_ms(), &self.settings.polling)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("fence", &self.fence)
            .field("track", &self.track.as_ref().map(|t| &t.id))
            .field("lines", &self.lines.len())
            .field("is_placeholder", &self.is_placeholder)
            .field("translation_source", &self.translation_source)
            .field("offset_ms", &self.offset_ms)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
