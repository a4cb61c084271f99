// src/app/update/playback.rs
//! Playback sampling, frame and offset handlers

use crate::api::{PlaybackSnapshot, TrackMeta};
use crate::app::{Command, Session};
use crate::features::offsets::clamp_offset;
use crate::features::playback::{
    ActiveLine, PositionSample, TimeReconciler, resolve_with_window,
};

impl Session {
    /// Handle a playback snapshot received at local time `at_ms`
    ///
    /// `None` means nothing is playing: the estimate freezes where it is.
    pub fn on_poll(&mut self, snapshot: Option<PlaybackSnapshot>, at_ms: f64) -> Vec<Command> {
        let Some(snapshot) = snapshot else {
            if let Some(reconciler) = self.reconciler.as_mut().filter(|r| r.is_playing()) {
                let position_ms = reconciler.estimate_ms();
                reconciler.on_sample(PositionSample {
                    position_ms,
                    is_playing: false,
                    sampled_at_monotonic_ms: at_ms,
                });
                tracing::info!("Playback stopped at {}ms", position_ms);
            }
            return Vec::new();
        };

        let sample = PositionSample {
            position_ms: snapshot.position_ms,
            is_playing: snapshot.is_playing,
            sampled_at_monotonic_ms: at_ms,
        };

        let is_new_track = self
            .track
            .as_ref()
            .is_none_or(|track| track.id != snapshot.track.id);
        if is_new_track {
            return self.start_track(snapshot.track, &sample);
        }

        match self.reconciler.as_mut() {
            Some(reconciler) => {
                reconciler.on_sample(sample);
            }
            None => {
                self.reconciler = Some(TimeReconciler::new(
                    &sample,
                    self.settings.sync.reconciler_config(),
                ))
            }
        }
        Vec::new()
    }

    /// Reset all per-track state and request lyrics for `track`
    fn start_track(&mut self, track: TrackMeta, sample: &PositionSample) -> Vec<Command> {
        let fence = self.fence.advance();
        tracing::info!(
            "Track changed: {} - {} (id={}, fence={})",
            track.artist_line(),
            track.name,
            track.id,
            fence.id()
        );

        match self.reconciler.as_mut() {
            Some(reconciler) => reconciler.reset(sample),
            None => {
                self.reconciler = Some(TimeReconciler::new(
                    sample,
                    self.settings.sync.reconciler_config(),
                ))
            }
        }

        self.lines.clear();
        self.is_placeholder = false;
        self.translation_source = Default::default();
        self.title_translation = None;
        self.active = ActiveLine::NONE;
        self.offset_ms = clamp_offset(self.offsets.get(&track.id));
        if self.offset_ms != 0 {
            tracing::debug!("Applying saved offset {}ms", self.offset_ms);
        }

        let mut commands = vec![Command::FetchLyrics {
            fence,
            track: track.clone(),
        }];
        if self.settings.translation.enabled {
            commands.push(Command::TranslateTitle {
                fence,
                title: track.name.clone(),
            });
        }

        self.track = Some(track);
        commands
    }

    /// Advance the estimate to `now_ms`
    ///
    /// Returns the resolved line only when the active index changed.
    pub fn on_frame(&mut self, now_ms: f64) -> Option<ActiveLine> {
        let reconciler = self.reconciler.as_mut()?;
        reconciler.tick(now_ms);

        let resolved = resolve_with_window(
            &self.lines,
            self.current_time_ms(),
            self.settings.display.crossfade_window_ms,
        );
        let changed = resolved.index != self.active.index;
        self.active = resolved;
        changed.then_some(resolved)
    }

    /// Shift the offset of the current track and persist it
    pub fn nudge_offset(&mut self, delta_ms: i64) -> i64 {
        self.offset_ms = clamp_offset(self.offset_ms.saturating_add(delta_ms));

        if let Some(track) = &self.track {
            if let Err(e) = self.offsets.set(&track.id, self.offset_ms) {
                tracing::warn!("Failed to save offset for {}: {}", track.id, e);
            }
        }
        tracing::debug!("Offset now {}ms", self.offset_ms);
        self.offset_ms
    }
}
