//! Message update handlers - thin dispatcher delegating to submodules

mod lyrics;
mod playback;

use super::{Command, Message, Session};

impl Session {
    /// Apply a message and return the async work it requires
    pub fn update(&mut self, message: Message) -> Vec<Command> {
        match message {
            Message::Polled { snapshot, at_ms } => self.on_poll(snapshot, at_ms),
            Message::PollFailed(error) => {
                tracing::warn!("Playback query failed: {}", error);
                Vec::new()
            }
            Message::LyricsLoaded(fence, loaded) => self.on_lyrics_loaded(fence, loaded),
            Message::TranslationsLoaded(fence, translated) => {
                self.on_translations_loaded(fence, translated);
                Vec::new()
            }
            Message::TitleTranslated(fence, title) => {
                self.on_title_translated(fence, title);
                Vec::new()
            }
            Message::NudgeOffset(delta_ms) => {
                self.nudge_offset(delta_ms);
                Vec::new()
            }
        }
    }
}
