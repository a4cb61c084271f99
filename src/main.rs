//! Lyricsync - synced lyrics for a playing track
//!
//! Plays a simulated track of the given length and prints lyric lines as
//! they become active. Type `+` or `-` and Enter to shift the track's
//! timing offset.

use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

use lyricsync::api::{
    LrcLibClient, MyMemoryClient, PlaybackSnapshot, PlaybackSource, TrackMeta,
};
use lyricsync::app::{self, Services, Session};
use lyricsync::features::offsets::OFFSET_STEP_MS;
use lyricsync::features::{JsonOffsetStore, MemoryOffsetStore, OffsetStore, Settings};
use lyricsync::utils::format_timestamp;

/// Position reports lag the real position by this much
const SOURCE_LATENCY_MS: u64 = 250;

/// Local stand-in for a media player, started when the program starts
struct SimulatedPlayback {
    track: TrackMeta,
    started: Instant,
}

#[async_trait]
impl PlaybackSource for SimulatedPlayback {
    async fn poll(&self) -> Result<Option<PlaybackSnapshot>> {
        let elapsed = self.started.elapsed().as_millis() as u64;
        if elapsed >= self.track.duration_ms {
            return Ok(None);
        }
        Ok(Some(PlaybackSnapshot {
            is_playing: true,
            position_ms: elapsed.saturating_sub(SOURCE_LATENCY_MS),
            track: self.track.clone(),
        }))
    }
}

fn parse_args() -> Result<TrackMeta> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [name, artist, duration] = args.as_slice() else {
        bail!("usage: lyricsync <track> <artist> <duration_secs>");
    };
    let duration_secs: u64 = duration
        .parse()
        .with_context(|| format!("invalid duration: {}", duration))?;

    Ok(TrackMeta {
        id: format!("{} - {}", artist, name).to_lowercase(),
        name: name.clone(),
        artists: vec![artist.clone()],
        duration_ms: duration_secs * 1000,
    })
}

fn offset_store() -> Arc<dyn OffsetStore> {
    match JsonOffsetStore::default_path() {
        Some(path) => Arc::new(JsonOffsetStore::open(path)),
        None => {
            tracing::warn!("No config directory, offsets will not be saved");
            Arc::new(MemoryOffsetStore::new())
        }
    }
}

/// Forward `+`/`-` lines from stdin as offset nudges
///
/// Reads on a plain thread so a pending read does not hold up runtime shutdown.
fn spawn_stdin_nudges() -> mpsc::UnboundedReceiver<i64> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let delta = match line.trim() {
                "+" => OFFSET_STEP_MS,
                "-" => -OFFSET_STEP_MS,
                _ => continue,
            };
            if tx.send(delta).is_err() {
                break;
            }
        }
    });
    rx
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lyricsync=info")),
        )
        .init();

    let track = parse_args()?;
    let settings = Settings::load();
    let duration = Duration::from_millis(track.duration_ms);

    let lrclib = Arc::new(LrcLibClient::new()?);
    let translator = Arc::new(MyMemoryClient::new(settings.translation.target_lang.clone())?);
    let playback = Arc::new(SimulatedPlayback {
        track,
        started: Instant::now(),
    });
    let services = Services::new(&settings, playback, lrclib.clone(), lrclib, translator);
    let session = Session::new(settings, offset_store());

    let shutdown = async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted"),
            _ = tokio::time::sleep(duration) => tracing::info!("Track finished"),
        }
    };

    let session = app::run(
        session,
        services,
        spawn_stdin_nudges(),
        |session, active| {
            let Some(line) = active.index.and_then(|i| session.lines().get(i)) else {
                return;
            };
            match &line.translation {
                Some(translation) => println!(
                    "[{}] {}  ({})",
                    format_timestamp(line.start_time_ms as i64),
                    line.text,
                    translation
                ),
                None => println!("[{}] {}", format_timestamp(line.start_time_ms as i64), line.text),
            }
        },
        shutdown,
    )
    .await;

    if let Some(title) = session.title_translation() {
        tracing::info!("Title translation: {}", title);
    }
    tracing::info!(
        "Translations: {:?}, offset {}ms",
        session.translation_source(),
        session.offset_ms()
    );
    Ok(())
}
