//! Translation cache
//!
//! Bounded LRU memo of per-line translations, keyed by source language and
//! text. Shared between concurrent translation tasks.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

/// Default number of cached translations
pub const DEFAULT_CAPACITY: usize = 512;

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

struct CacheInner {
    entries: LruCache<String, String>,
    hits: u64,
    misses: u64,
}

/// Bounded translation memo
pub struct TranslationCache {
    inner: Mutex<CacheInner>,
}

impl std::fmt::Debug for TranslationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationCache")
            .field("stats", &self.stats())
            .finish()
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TranslationCache {
    /// Create a cache holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(CacheInner {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
        }
    }

    fn key(source_lang: &str, text: &str) -> String {
        format!("{}:{}", source_lang, text)
    }

    /// Look up a cached translation
    pub fn get(&self, source_lang: &str, text: &str) -> Option<String> {
        let mut inner = self.inner.lock();
        let found = inner.entries.get(&Self::key(source_lang, text)).cloned();
        if found.is_some() {
            inner.hits += 1;
        } else {
            inner.misses += 1;
        }
        found
    }

    /// Store a translation, evicting the least recently used entry when full
    pub fn insert(&self, source_lang: &str, text: &str, translation: String) {
        self.inner
            .lock()
            .entries
            .put(Self::key(source_lang, text), translation);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            entries: inner.entries.len(),
        }
    }
}
