//! LRCLIB client
//!
//! Lyrics lookup by track/artist/duration and search for official English
//! versions of a track.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::model::LrcLibTrack;
use super::{LyricsProvider, TranslationCandidateProvider};
use crate::features::lyrics::RawLyrics;

static BASE_URL: &str = "https://lrclib.net/api";

const TIMEOUT: u64 = 10;

const USER_AGENT: &str = concat!("lyricsync/", env!("CARGO_PKG_VERSION"));

/// Title markers of an English version of a track
const ENGLISH_VERSION_MARKERS: [&str; 4] = ["english ver", "english version", "(en)", "[english]"];

#[derive(Clone)]
pub struct LrcLibClient {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for LrcLibClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LrcLibClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LrcLibClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    /// Client against a different LRCLIB instance
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build LRCLIB HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn get_url(&self, track_name: &str, artist_name: &str, duration_ms: u64) -> String {
        let mut url = format!(
            "{}/get?track_name={}&artist_name={}",
            self.base_url,
            urlencoding::encode(track_name),
            urlencoding::encode(artist_name)
        );
        // LRCLIB matches durations in whole seconds
        if duration_ms > 0 {
            url.push_str(&format!("&duration={}", duration_ms / 1000));
        }
        url
    }

    fn search_url(&self, query: &str) -> String {
        format!("{}/search?q={}", self.base_url, urlencoding::encode(query))
    }

    async fn search(&self, query: &str) -> Result<Vec<LrcLibTrack>> {
        let response = self.client.get(self.search_url(query)).send().await?;
        if !response.status().is_success() {
            debug!("LRCLIB search {:?} returned {}", query, response.status());
            return Ok(Vec::new());
        }
        Ok(response.json().await?)
    }
}

/// Pick the lyrics of a record, synced preferred over plain
fn pick_lyrics(track: LrcLibTrack) -> Option<RawLyrics> {
    if track.instrumental {
        debug!("Track {:?} is marked as instrumental", track.track_name);
        return None;
    }

    let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
    non_empty(track.synced_lyrics)
        .map(RawLyrics::Synced)
        .or_else(|| non_empty(track.plain_lyrics).map(RawLyrics::Plain))
}

/// Check if a search result is an English version by the same artist
fn is_english_version(result: &LrcLibTrack, artist_name: &str) -> bool {
    let name = result.track_name.to_lowercase();
    let artist = result.artist_name.to_lowercase();
    artist.contains(&artist_name.to_lowercase())
        && ENGLISH_VERSION_MARKERS
            .iter()
            .any(|marker| name.contains(marker))
}

fn english_version_queries(track_name: &str, artist_name: &str) -> [String; 3] {
    [
        format!("{} English {}", track_name, artist_name),
        format!("{} (English ver.) {}", track_name, artist_name),
        format!("{} (English Version) {}", track_name, artist_name),
    ]
}

#[async_trait]
impl LyricsProvider for LrcLibClient {
    async fn fetch(
        &self,
        track_name: &str,
        artist_name: &str,
        duration_ms: u64,
    ) -> Result<Option<RawLyrics>> {
        let url = self.get_url(track_name, artist_name, duration_ms);
        debug!("Fetching lyrics from LRCLIB: {}", url);

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("No lyrics in LRCLIB for {} - {}", artist_name, track_name);
            return Ok(None);
        }
        let response = response.error_for_status()?;
        let track: LrcLibTrack = response.json().await?;

        Ok(pick_lyrics(track))
    }
}

#[async_trait]
impl TranslationCandidateProvider for LrcLibClient {
    async fn fetch_candidate(&self, track_name: &str, artist_name: &str) -> Result<Option<String>> {
        for query in english_version_queries(track_name, artist_name) {
            let results = self.search(&query).await?;
            let found = results
                .into_iter()
                .filter(|result| is_english_version(result, artist_name))
                .find_map(|result| result.synced_lyrics.filter(|s| !s.trim().is_empty()));

            if let Some(synced) = found {
                debug!("Found official English version for {}", track_name);
                return Ok(Some(synced));
            }
        }
        Ok(None)
    }
}
