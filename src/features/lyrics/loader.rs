//! Per-track lyrics and translation loading
//!
//! Provider failures never escape: they are logged and treated as "no data",
//! which falls back to placeholder lyrics or to no translation.

use super::language::LanguageHeuristic;
use super::parser::{LyricLine, count_translated, parse_lyrics, parse_synced, placeholder_lyrics};
use super::translation::{TranslationAligner, TranslationSource, translate_lyrics};
use crate::api::{LyricsProvider, TrackMeta, TranslationCandidateProvider, TranslationProvider};
use crate::cache::TranslationCache;

/// Lyrics ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedLyrics {
    pub lines: Vec<LyricLine>,
    /// True when no lyrics were found and the lines are placeholder rows
    pub is_placeholder: bool,
}

/// Lyrics with translations attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedLyrics {
    pub lines: Vec<LyricLine>,
    pub source: TranslationSource,
}

/// Everything the translation stage needs
pub struct TranslationContext<'a> {
    pub candidates: &'a dyn TranslationCandidateProvider,
    pub translator: &'a dyn TranslationProvider,
    pub heuristic: &'a LanguageHeuristic,
    pub aligner: TranslationAligner,
    pub cache: &'a TranslationCache,
}

/// Fetch and parse lyrics for a track, falling back to placeholder rows
pub async fn load_lyrics(provider: &dyn LyricsProvider, track: &TrackMeta) -> LoadedLyrics {
    let duration_ms = track.duration_ms as i64;

    let raw = match provider
        .fetch(&track.name, track.primary_artist(), track.duration_ms)
        .await
    {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Failed to fetch lyrics for {}: {:#}", track.name, e);
            None
        }
    };

    let lines = raw
        .map(|raw| parse_lyrics(&raw, duration_ms))
        .unwrap_or_default();

    if lines.is_empty() {
        tracing::info!("No lyrics for {}, showing placeholder", track.name);
        return LoadedLyrics {
            lines: placeholder_lyrics(duration_ms, true),
            is_placeholder: true,
        };
    }

    tracing::info!("Loaded {} lyrics lines for {}", lines.len(), track.name);
    LoadedLyrics {
        lines,
        is_placeholder: false,
    }
}

/// Attach translations: official version first, machine translation second
pub async fn load_translations(
    lines: &[LyricLine],
    track: &TrackMeta,
    ctx: &TranslationContext<'_>,
) -> TranslatedLyrics {
    let untranslated = || TranslatedLyrics {
        lines: lines.to_vec(),
        source: TranslationSource::None,
    };

    if !lines.iter().any(|l| ctx.heuristic.needs_translation(&l.text)) {
        tracing::debug!("{} needs no translation", track.name);
        return untranslated();
    }

    let candidate = match ctx
        .candidates
        .fetch_candidate(&track.name, track.primary_artist())
        .await
    {
        Ok(candidate) => candidate,
        Err(e) => {
            tracing::warn!("Official translation lookup failed: {:#}", e);
            None
        }
    };

    if let Some(raw) = candidate {
        let merged = ctx.aligner.merge(lines, &parse_synced(&raw));
        let attached = count_translated(&merged);
        if attached > 0 {
            tracing::info!("Attached {} official translations", attached);
            return TranslatedLyrics {
                lines: merged,
                source: TranslationSource::Official,
            };
        }
    }

    let translated = translate_lyrics(lines, ctx.heuristic, ctx.translator, ctx.cache).await;
    let attached = count_translated(&translated);
    if attached == 0 {
        return untranslated();
    }

    tracing::info!("Attached {} machine translations", attached);
    TranslatedLyrics {
        lines: translated,
        source: TranslationSource::Auto,
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;

    use super::*;
    use crate::features::lyrics::RawLyrics;

    fn track() -> TrackMeta {
        TrackMeta {
            id: "t1".into(),
            name: "Song".into(),
            artists: vec!["Artist".into()],
            duration_ms: 6000,
        }
    }

    struct FixedLyrics(Option<RawLyrics>);

    #[async_trait]
    impl LyricsProvider for FixedLyrics {
        async fn fetch(&self, _: &str, _: &str, _: u64) -> Result<Option<RawLyrics>> {
            Ok(self.0.clone())
        }
    }

    struct FailingLyrics;

    #[async_trait]
    impl LyricsProvider for FailingLyrics {
        async fn fetch(&self, _: &str, _: &str, _: u64) -> Result<Option<RawLyrics>> {
            Err(anyhow!("HTTP 503"))
        }
    }

    struct FixedCandidate(Option<&'static str>);

    #[async_trait]
    impl TranslationCandidateProvider for FixedCandidate {
        async fn fetch_candidate(&self, _: &str, _: &str) -> Result<Option<String>> {
            Ok(self.0.map(str::to_string))
        }
    }

    struct Echo;

    #[async_trait]
    impl TranslationProvider for Echo {
        async fn translate(&self, text: &str, _: &str) -> Result<Option<String>> {
            Ok(Some(format!("<{}>", text)))
        }
    }

    fn context<'a>(
        candidates: &'a dyn TranslationCandidateProvider,
        heuristic: &'a LanguageHeuristic,
        cache: &'a TranslationCache,
    ) -> TranslationContext<'a> {
        TranslationContext {
            candidates,
            translator: &Echo,
            heuristic,
            aligner: TranslationAligner::default(),
            cache,
        }
    }

    #[tokio::test]
    async fn test_load_synced() {
        let provider = FixedLyrics(Some(RawLyrics::Synced("[00:01.00]a\n[00:02.00]b".into())));
        let loaded = load_lyrics(&provider, &track()).await;
        assert!(!loaded.is_placeholder);
        assert_eq!(loaded.lines.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_or_failed_lyrics_use_placeholder() {
        let loaded = load_lyrics(&FixedLyrics(None), &track()).await;
        assert!(loaded.is_placeholder);
        assert_eq!(loaded.lines[2].text, "No lyrics available");
        assert_eq!(loaded.lines[1].start_time_ms, 1000);

        let loaded = load_lyrics(&FailingLyrics, &track()).await;
        assert!(loaded.is_placeholder);

        let garbage = FixedLyrics(Some(RawLyrics::Synced("no tags here".into())));
        assert!(load_lyrics(&garbage, &track()).await.is_placeholder);
    }

    #[tokio::test]
    async fn test_official_translation_preferred() {
        let lines = vec![LyricLine::new("君の", 1000), LyricLine::new("名は", 2000)];
        let candidates = FixedCandidate(Some("[00:01.00]Your\n[00:02.00]name"));
        let heuristic = LanguageHeuristic::default();
        let cache = TranslationCache::default();

        let result = load_translations(&lines, &track(), &context(&candidates, &heuristic, &cache)).await;
        assert_eq!(result.source, TranslationSource::Official);
        assert_eq!(result.lines[1].translation.as_deref(), Some("name"));
    }

    #[tokio::test]
    async fn test_falls_back_to_machine_translation() {
        let lines = vec![LyricLine::new("君の", 1000)];
        // Candidate too far away in time to be accepted
        let candidates = FixedCandidate(Some("[01:00.00]Your"));
        let heuristic = LanguageHeuristic::default();
        let cache = TranslationCache::default();

        let result = load_translations(&lines, &track(), &context(&candidates, &heuristic, &cache)).await;
        assert_eq!(result.source, TranslationSource::Auto);
        assert_eq!(result.lines[0].translation.as_deref(), Some("<君の>"));
    }

    #[tokio::test]
    async fn test_native_lyrics_skip_translation() {
        let lines = vec![LyricLine::new("I am here", 0)];
        let candidates = FixedCandidate(Some("[00:00.00]Ich bin hier"));
        let heuristic = LanguageHeuristic::default();
        let cache = TranslationCache::default();

        let result = load_translations(&lines, &track(), &context(&candidates, &heuristic, &cache)).await;
        assert_eq!(result.source, TranslationSource::None);
        assert_eq!(result.lines, lines);
    }
}
