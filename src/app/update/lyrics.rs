// src/app/update/lyrics.rs
//! Lyrics and translation result handlers
//!
//! Every result carries the fence it was requested under. Results for a
//! track that is no longer current are dropped.

use crate::app::{Command, Session, TrackFence};
use crate::features::lyrics::{LoadedLyrics, TranslatedLyrics, count_translated};
use crate::features::playback::ActiveLine;

impl Session {
    fn is_stale(&self, fence: TrackFence, what: &str) -> bool {
        if fence == self.fence {
            return false;
        }
        tracing::debug!(
            "Discarding {} for fence {} (current {})",
            what,
            fence.id(),
            self.fence.id()
        );
        true
    }

    /// Install fetched lyrics and request translations when useful
    pub fn on_lyrics_loaded(&mut self, fence: TrackFence, loaded: LoadedLyrics) -> Vec<Command> {
        if self.is_stale(fence, "lyrics") {
            return Vec::new();
        }

        tracing::info!(
            "Loaded {} lines{}",
            loaded.lines.len(),
            if loaded.is_placeholder { " (placeholder)" } else { "" }
        );
        self.lines = loaded.lines;
        self.is_placeholder = loaded.is_placeholder;
        self.active = ActiveLine::NONE;

        if self.is_placeholder || self.lines.is_empty() || !self.settings.translation.enabled {
            return Vec::new();
        }
        let Some(track) = self.track.clone() else {
            return Vec::new();
        };

        vec![Command::FetchTranslations {
            fence,
            track,
            lines: self.lines.clone(),
        }]
    }

    /// Replace the lines with their translated version
    pub fn on_translations_loaded(&mut self, fence: TrackFence, translated: TranslatedLyrics) {
        if self.is_stale(fence, "translations") {
            return;
        }
        if translated.lines.len() != self.lines.len() {
            tracing::warn!(
                "Translated lyrics have {} lines, expected {}",
                translated.lines.len(),
                self.lines.len()
            );
            return;
        }

        tracing::info!(
            "Translations ready: {}/{} lines ({:?})",
            count_translated(&translated.lines),
            translated.lines.len(),
            translated.source
        );
        self.lines = translated.lines;
        self.translation_source = translated.source;
    }

    pub fn on_title_translated(&mut self, fence: TrackFence, title: Option<String>) {
        if self.is_stale(fence, "title translation") {
            return;
        }
        self.title_translation = title;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::api::{PlaybackSnapshot, TrackMeta};
    use crate::features::lyrics::{LyricLine, TranslationSource};
    use crate::features::{MemoryOffsetStore, Settings};

    use super::*;

    fn playing(session: &mut Session, id: &str) -> TrackFence {
        session.on_poll(
            Some(PlaybackSnapshot {
                is_playing: true,
                position_ms: 0,
                track: TrackMeta {
                    id: id.to_string(),
                    name: format!("Song {}", id),
                    artists: vec!["Artist".to_string()],
                    duration_ms: 60_000,
                },
            }),
            0.0,
        );
        session.fence()
    }

    fn loaded(texts: &[&str]) -> LoadedLyrics {
        LoadedLyrics {
            lines: texts
                .iter()
                .enumerate()
                .map(|(i, text)| LyricLine::new(*text, i as u64 * 1000))
                .collect(),
            is_placeholder: false,
        }
    }

    fn session() -> Session {
        Session::new(Settings::default(), Arc::new(MemoryOffsetStore::new()))
    }

    #[test]
    fn test_lyrics_trigger_translation_fetch() {
        let mut session = session();
        let fence = playing(&mut session, "a");

        let commands = session.on_lyrics_loaded(fence, loaded(&["un", "deux"]));
        assert_eq!(session.lines().len(), 2);
        match &commands[..] {
            [Command::FetchTranslations { fence: f, track, lines }] => {
                assert_eq!(*f, fence);
                assert_eq!(track.id, "a");
                assert_eq!(lines.len(), 2);
            }
            other => panic!("unexpected commands: {:?}", other),
        }
    }

    #[test]
    fn test_placeholder_skips_translation() {
        let mut session = session();
        let fence = playing(&mut session, "a");
        let mut lyrics = loaded(&["♪"]);
        lyrics.is_placeholder = true;

        assert!(session.on_lyrics_loaded(fence, lyrics).is_empty());
        assert!(session.is_placeholder());
    }

    #[test]
    fn test_stale_results_are_discarded() {
        let mut session = session();
        let old = playing(&mut session, "a");
        let current = playing(&mut session, "b");
        assert_ne!(old, current);

        assert!(session.on_lyrics_loaded(old, loaded(&["old"])).is_empty());
        assert!(session.lines().is_empty());

        session.on_title_translated(old, Some("Old".to_string()));
        assert_eq!(session.title_translation(), None);

        session.on_lyrics_loaded(current, loaded(&["new"]));
        session.on_translations_loaded(
            old,
            TranslatedLyrics {
                lines: vec![LyricLine::new("new", 0).with_translation("stale")],
                source: TranslationSource::Auto,
            },
        );
        assert!(!session.lines()[0].is_translated());
        assert_eq!(session.translation_source(), TranslationSource::None);
    }

    #[test]
    fn test_translations_replace_lines() {
        let mut session = session();
        let fence = playing(&mut session, "a");
        session.on_lyrics_loaded(fence, loaded(&["un", "deux"]));

        let lines = session
            .lines()
            .iter()
            .map(|line| line.with_translation(format!("[{}]", line.text)))
            .collect();
        session.on_translations_loaded(
            fence,
            TranslatedLyrics {
                lines,
                source: TranslationSource::Official,
            },
        );

        assert_eq!(session.translation_source(), TranslationSource::Official);
        assert_eq!(session.lines()[1].translation.as_deref(), Some("[deux]"));
        assert_eq!(session.lines()[1].start_time_ms, 1000);
    }

    #[test]
    fn test_mismatched_translation_is_ignored() {
        let mut session = session();
        let fence = playing(&mut session, "a");
        session.on_lyrics_loaded(fence, loaded(&["un", "deux"]));

        session.on_translations_loaded(
            fence,
            TranslatedLyrics {
                lines: vec![LyricLine::new("un", 0).with_translation("one")],
                source: TranslationSource::Auto,
            },
        );
        assert_eq!(session.translation_source(), TranslationSource::None);
        assert_eq!(crate::features::lyrics::count_translated(session.lines()), 0);
    }

    #[test]
    fn test_title_translation_applies_to_current_track() {
        let mut session = session();
        let fence = playing(&mut session, "a");
        session.on_title_translated(fence, Some("Translated".to_string()));
        assert_eq!(session.title_translation(), Some("Translated"));

        playing(&mut session, "b");
        assert_eq!(session.title_translation(), None);
    }
}
