//! Session controller
//!
//! [`Session`] holds the per-track state and reacts to [`Message`]s. The
//! [`run`] loop feeds it from three sources: playback polls on an adaptive
//! timer, display frames while playing, and results of the async work it
//! requested through [`Command`]s.

mod message;
mod state;
mod update;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::api::{LyricsProvider, PlaybackSource, TranslationCandidateProvider, TranslationProvider};
use crate::cache::TranslationCache;
use crate::features::Settings;
use crate::features::lyrics::{
    LanguageHeuristic, TranslationAligner, TranslationContext, load_lyrics, load_translations,
    translate_title,
};
use crate::features::playback::{ActiveLine, PollSchedule};

pub use message::{Command, Message};
pub use state::{Session, TrackFence};

/// External collaborators shared by all spawned work
#[derive(Clone)]
pub struct Services {
    pub playback: Arc<dyn PlaybackSource>,
    pub lyrics: Arc<dyn LyricsProvider>,
    pub candidates: Arc<dyn TranslationCandidateProvider>,
    pub translator: Arc<dyn TranslationProvider>,
    pub cache: Arc<TranslationCache>,
    pub heuristic: Arc<LanguageHeuristic>,
    pub aligner: TranslationAligner,
}

impl Services {
    /// Bundle providers with the cache and heuristics described by `settings`
    pub fn new(
        settings: &Settings,
        playback: Arc<dyn PlaybackSource>,
        lyrics: Arc<dyn LyricsProvider>,
        candidates: Arc<dyn TranslationCandidateProvider>,
        translator: Arc<dyn TranslationProvider>,
    ) -> Self {
        Self {
            playback,
            lyrics,
            candidates,
            translator,
            cache: Arc::new(TranslationCache::new(settings.translation.cache_capacity)),
            heuristic: Arc::new(settings.translation.language_heuristic()),
            aligner: settings.translation.aligner(),
        }
    }

    fn translation_context(&self) -> TranslationContext<'_> {
        TranslationContext {
            candidates: self.candidates.as_ref(),
            translator: self.translator.as_ref(),
            heuristic: &self.heuristic,
            aligner: self.aligner,
            cache: &self.cache,
        }
    }

    /// Query the playback source in the background
    fn spawn_poll(&self, clock: Instant, tx: &UnboundedSender<Message>) {
        let playback = self.playback.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let message = match playback.poll().await {
                Ok(snapshot) => Message::Polled {
                    snapshot,
                    at_ms: elapsed_ms(clock),
                },
                Err(e) => Message::PollFailed(format!("{:#}", e)),
            };
            // Receiver is gone once the session stopped
            let _ = tx.send(message);
        });
    }

    /// Run a command in the background and send its result back
    fn dispatch(&self, command: Command, tx: &UnboundedSender<Message>) {
        let services = self.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let message = match command {
                Command::FetchLyrics { fence, track } => {
                    Message::LyricsLoaded(fence, load_lyrics(services.lyrics.as_ref(), &track).await)
                }
                Command::FetchTranslations {
                    fence,
                    track,
                    lines,
                } => {
                    let ctx = services.translation_context();
                    Message::TranslationsLoaded(fence, load_translations(&lines, &track, &ctx).await)
                }
                Command::TranslateTitle { fence, title } => {
                    let translated = translate_title(
                        &title,
                        &services.heuristic,
                        services.translator.as_ref(),
                        &services.cache,
                    )
                    .await;
                    Message::TitleTranslated(fence, translated)
                }
            };
            let _ = tx.send(message);
        });
    }
}

fn elapsed_ms(clock: Instant) -> f64 {
    clock.elapsed().as_secs_f64() * 1000.0
}

fn poll_timer(period: Duration, first_tick: Instant) -> Interval {
    let mut timer = tokio::time::interval_at(first_tick, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// Drive `session` until `shutdown` completes
///
/// `on_line` is called whenever the active line index changes. `nudges`
/// delivers offset adjustments from the caller.
pub async fn run<F, S>(
    mut session: Session,
    services: Services,
    mut nudges: mpsc::UnboundedReceiver<i64>,
    mut on_line: F,
    shutdown: S,
) -> Session
where
    F: FnMut(&Session, ActiveLine),
    S: Future<Output = ()>,
{
    let clock = Instant::now();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut schedule = PollSchedule::new(session.poll_interval());
    let mut poll = poll_timer(schedule.current(), clock);
    let mut poll_in_flight = false;

    let mut frame = tokio::time::interval(session.settings().sync.frame_interval());
    frame.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut nudges_open = true;

    tokio::pin!(shutdown);
    tracing::info!("Session started");

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = poll.tick() => {
                // At most one query outstanding
                if !poll_in_flight {
                    poll_in_flight = true;
                    services.spawn_poll(clock, &tx);
                }
            }
            _ = frame.tick(), if session.is_playing() => {
                if let Some(active) = session.on_frame(elapsed_ms(clock)) {
                    on_line(&session, active);
                }
                if let Some(period) = schedule.update(session.poll_interval()) {
                    tracing::debug!("Poll interval now {:?}", period);
                    poll = poll_timer(period, Instant::now() + period);
                }
            }
            delta = nudges.recv(), if nudges_open => match delta {
                Some(delta) => {
                    session.update(Message::NudgeOffset(delta));
                }
                None => nudges_open = false,
            },
            Some(message) = rx.recv() => {
                if matches!(message, Message::Polled { .. } | Message::PollFailed(_)) {
                    poll_in_flight = false;
                }
                for command in session.update(message) {
                    services.dispatch(command, &tx);
                }
            }
        }
    }

    tracing::info!("Session stopped");
    session
}
