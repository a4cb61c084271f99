//! Feature modules - the sync engine's core logic
//!
//! Each feature module contains the logic for one concern and does not
//! depend on the session controller.

pub mod lyrics;
pub mod offsets;
pub mod playback;
pub mod settings;

pub use offsets::{JsonOffsetStore, MemoryOffsetStore, OffsetStore};
pub use settings::Settings;
