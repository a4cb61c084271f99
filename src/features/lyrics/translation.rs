//! Translation alignment and machine-translation fallback
//!
//! An official translation arrives as its own independently timed line
//! sequence. Lines are paired by index (proportionally when the counts
//! differ) and each pair is validated by start time and text before the
//! translation is attached.

use futures_util::future::join_all;

use super::language::{LanguageHeuristic, detect_source_lang};
use super::parser::LyricLine;
use crate::api::TranslationProvider;
use crate::cache::TranslationCache;

/// Default maximum start time gap for a translation pair
pub const MAX_TIMESTAMP_DIFF_MS: u64 = 5000;

/// Where the attached translations came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationSource {
    /// Official translated version of the track
    Official,
    /// Per-line machine translation
    Auto,
    /// No translation attached
    #[default]
    None,
}

/// Candidate index for original line `index`
fn aligned_index(index: usize, orig_len: usize, cand_len: usize) -> usize {
    if orig_len == cand_len {
        index
    } else if orig_len == 1 {
        0
    } else {
        // round(index * (cand_len - 1) / (orig_len - 1)), halves rounding up
        let numerator = 2 * index * (cand_len - 1) + (orig_len - 1);
        let rounded = numerator / (2 * (orig_len - 1));
        rounded.min(cand_len - 1)
    }
}

/// Merges an independently parsed translation into original lyrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationAligner {
    /// Pairs whose start times differ by more than this are rejected
    pub max_timestamp_diff_ms: u64,
}

impl Default for TranslationAligner {
    fn default() -> Self {
        Self {
            max_timestamp_diff_ms: MAX_TIMESTAMP_DIFF_MS,
        }
    }
}

impl TranslationAligner {
    /// Attach candidate texts as translations, returning a new sequence
    ///
    /// Lines whose pairing fails validation are returned untouched.
    pub fn merge(&self, original: &[LyricLine], candidate: &[LyricLine]) -> Vec<LyricLine> {
        if candidate.is_empty() {
            return original.to_vec();
        }

        let orig_len = original.len();
        let cand_len = candidate.len();

        original
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let cand = &candidate[aligned_index(index, orig_len, cand_len)];
                if self.accepts(line, cand) {
                    line.with_translation(cand.text.clone())
                } else {
                    line.clone()
                }
            })
            .collect()
    }

    fn accepts(&self, line: &LyricLine, cand: &LyricLine) -> bool {
        if cand.start_time_ms.abs_diff(line.start_time_ms) > self.max_timestamp_diff_ms {
            return false;
        }
        if cand.text.to_lowercase() == line.text.to_lowercase() {
            return false;
        }
        !cand.text.trim().is_empty()
    }
}

/// Translate one piece of text through the cache
///
/// Provider failures and translations equal to the input yield `None`.
pub async fn translate_text(
    provider: &dyn TranslationProvider,
    cache: &TranslationCache,
    text: &str,
    source_lang: &str,
) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }

    if let Some(cached) = cache.get(source_lang, text) {
        return Some(cached);
    }

    let translation = match provider.translate(text, source_lang).await {
        Ok(Some(translation)) => translation,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Translation failed for {:?}: {:#}", text, e);
            return None;
        }
    };

    // Already in the target language
    if translation.to_lowercase() == text.to_lowercase() {
        return None;
    }

    cache.insert(source_lang, text, translation.clone());
    Some(translation)
}

/// Machine-translate every line that needs it, concurrently
pub async fn translate_lyrics(
    lines: &[LyricLine],
    heuristic: &LanguageHeuristic,
    provider: &dyn TranslationProvider,
    cache: &TranslationCache,
) -> Vec<LyricLine> {
    let tasks = lines.iter().map(|line| async move {
        if !heuristic.needs_translation(&line.text) {
            return line.clone();
        }
        let source_lang = detect_source_lang(&line.text);
        match translate_text(provider, cache, &line.text, source_lang).await {
            Some(translation) => line.with_translation(translation),
            None => line.clone(),
        }
    });

    join_all(tasks).await
}

/// Translate a track title if it is not in a native language
pub async fn translate_title(
    title: &str,
    heuristic: &LanguageHeuristic,
    provider: &dyn TranslationProvider,
    cache: &TranslationCache,
) -> Option<String> {
    if !heuristic.needs_translation(title) {
        return None;
    }
    translate_text(provider, cache, title, detect_source_lang(title)).await
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::{Result, anyhow};
    use async_trait::async_trait;

    use super::*;

    fn lines(entries: &[(&str, u64)]) -> Vec<LyricLine> {
        entries
            .iter()
            .map(|(text, start)| LyricLine::new(*text, *start))
            .collect()
    }

    struct FakeTranslator {
        table: HashMap<&'static str, &'static str>,
        calls: AtomicUsize,
    }

    impl FakeTranslator {
        fn new(table: &[(&'static str, &'static str)]) -> Self {
            Self {
                table: table.iter().copied().collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TranslationProvider for FakeTranslator {
        async fn translate(&self, text: &str, _source_lang: &str) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text == "エラー" {
                return Err(anyhow!("service unavailable"));
            }
            Ok(self.table.get(text).map(|t| t.to_string()))
        }
    }

    #[test]
    fn test_aligned_index() {
        for i in 0..5 {
            assert_eq!(aligned_index(i, 5, 5), i);
        }
        assert_eq!(aligned_index(0, 1, 4), 0);
        // 4 originals onto 7 candidates: 0, 2, 4, 6
        let mapped: Vec<usize> = (0..4).map(|i| aligned_index(i, 4, 7)).collect();
        assert_eq!(mapped, vec![0, 2, 4, 6]);
        // 5 originals onto 2 candidates: round(i / 4) -> 0, 0, 1, 1, 1
        let mapped: Vec<usize> = (0..5).map(|i| aligned_index(i, 5, 2)).collect();
        assert_eq!(mapped, vec![0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_empty_candidate_returns_original() {
        let original = lines(&[("a", 0), ("b", 1000)]);
        assert_eq!(TranslationAligner::default().merge(&original, &[]), original);
    }

    #[test]
    fn test_identity_mapping() {
        let original = lines(&[("一", 0), ("二", 1000), ("三", 2000)]);
        let candidate = lines(&[("one", 100), ("two", 1100), ("three", 2100)]);
        let merged = TranslationAligner::default().merge(&original, &candidate);
        let translations: Vec<Option<&str>> =
            merged.iter().map(|l| l.translation.as_deref()).collect();
        assert_eq!(translations, vec![Some("one"), Some("two"), Some("three")]);
        // Inputs are untouched
        assert!(original.iter().all(|l| l.translation.is_none()));
    }

    #[test]
    fn test_rejects_distant_timestamps() {
        let original = lines(&[("一", 0), ("二", 10_000)]);
        let candidate = lines(&[("one", 5000), ("two", 15_001)]);
        let merged = TranslationAligner::default().merge(&original, &candidate);
        assert_eq!(merged[0].translation.as_deref(), Some("one"));
        assert_eq!(merged[1].translation, None);
    }

    #[test]
    fn test_rejects_redundant_and_empty_text() {
        let original = lines(&[("Hello", 0), ("二", 1000)]);
        let candidate = lines(&[("HELLO", 0), ("   ", 1000)]);
        let merged = TranslationAligner::default().merge(&original, &candidate);
        assert!(merged.iter().all(|l| l.translation.is_none()));
    }

    #[test]
    fn test_custom_tolerance() {
        let aligner = TranslationAligner {
            max_timestamp_diff_ms: 100,
        };
        let merged = aligner.merge(&lines(&[("一", 0)]), &lines(&[("one", 101)]));
        assert_eq!(merged[0].translation, None);
    }

    #[tokio::test]
    async fn test_translate_lyrics() {
        let provider = FakeTranslator::new(&[("ありがとう", "Thank you")]);
        let cache = TranslationCache::new(8);
        let heuristic = LanguageHeuristic::default();
        let original = lines(&[("ありがとう", 0), ("I am here", 1000), ("エラー", 2000)]);

        let translated = translate_lyrics(&original, &heuristic, &provider, &cache).await;
        assert_eq!(translated[0].translation.as_deref(), Some("Thank you"));
        assert_eq!(translated[1].translation, None);
        assert_eq!(translated[2].translation, None);
        // English line never reaches the provider
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_translate_text_uses_cache() {
        let provider = FakeTranslator::new(&[("さよなら", "Goodbye")]);
        let cache = TranslationCache::new(8);

        let first = translate_text(&provider, &cache, "さよなら", "ja").await;
        let second = translate_text(&provider, &cache, "さよなら", "ja").await;
        assert_eq!(first.as_deref(), Some("Goodbye"));
        assert_eq!(second.as_deref(), Some("Goodbye"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_translation_equal_to_input_is_dropped() {
        let provider = FakeTranslator::new(&[("Tokyo", "TOKYO")]);
        let cache = TranslationCache::new(8);
        assert_eq!(translate_text(&provider, &cache, "Tokyo", "auto").await, None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_translate_title() {
        let provider = FakeTranslator::new(&[("夜に駆ける", "Racing into the Night")]);
        let cache = TranslationCache::new(8);
        let heuristic = LanguageHeuristic::default();
        assert_eq!(
            translate_title("夜に駆ける", &heuristic, &provider, &cache)
                .await
                .as_deref(),
            Some("Racing into the Night")
        );
        assert_eq!(
            translate_title("The Night", &heuristic, &provider, &cache).await,
            None
        );
    }
}
