//! Lyricsync - time-synchronized lyrics driven by a sampled playback position
//!
//! - `features::lyrics`: LRC parsing, language heuristic, translation alignment
//! - `features::playback`: playback clock reconciliation and active line resolution
//! - `api`: provider traits and HTTP clients (LRCLIB, MyMemory)
//! - `app`: the session controller tying everything together

pub mod api;
pub mod app;
pub mod cache;
pub mod features;
pub mod utils;
