//! Lyrics module - parsing, language heuristic and translation
//!
//! - `parser`: synced/plain lyrics parsing
//! - `language`: which lines need translation
//! - `translation`: aligning official translations, machine-translation fallback
//! - `loader`: per-track fetch pipeline with graceful degradation

pub mod language;
pub mod loader;
pub mod parser;
pub mod translation;

// Re-export commonly used items
pub use language::{LanguageHeuristic, LanguageTables, LanguageVerdict, detect_source_lang};
pub use loader::{LoadedLyrics, TranslatedLyrics, TranslationContext, load_lyrics, load_translations};
pub use parser::*;
pub use translation::{TranslationAligner, TranslationSource, translate_lyrics, translate_title};
