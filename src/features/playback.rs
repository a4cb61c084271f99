//! Playback timing - clock reconciliation, active line, polling cadence
//!
//! - `reconciler`: smooth monotonic clock from noisy position samples
//! - `resolver`: active line and cross-fade weight at a given time
//! - `polling`: adaptive poll interval around line boundaries

pub mod polling;
pub mod reconciler;
pub mod resolver;

pub use polling::{PollSchedule, poll_interval};
pub use reconciler::{
    PositionSample, ReconcilerConfig, ReconciliationState, SampleDecision, SyncEvent, SyncPhase,
    TimeReconciler, step,
};
pub use resolver::{ActiveLine, resolve, resolve_with_window};
