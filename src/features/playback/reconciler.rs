//! Playback clock reconciliation
//!
//! Turns intermittent, delayed position samples into a smooth estimate that
//! advances at the display refresh rate. A new sample is ignored, blended
//! toward, or snapped to depending on how far it is from the estimate.
//!
//! The whole state is a plain value: [`step`] takes a state and an event and
//! returns the next state. [`TimeReconciler`] is a thin owner around it.

/// Thresholds and window of the reconciler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcilerConfig {
    /// Drift above which the estimate jumps straight to the sample
    pub snap_threshold_ms: f64,
    /// Window over which smaller drifts are eased out
    pub blend_duration_ms: f64,
    /// Drift at or below which a sample is ignored
    pub ignore_threshold_ms: f64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            snap_threshold_ms: 2000.0,
            blend_duration_ms: 500.0,
            ignore_threshold_ms: 50.0,
        }
    }
}

/// A position reported by the playback source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub position_ms: u64,
    pub is_playing: bool,
    /// Local monotonic time at which the sample was taken
    pub sampled_at_monotonic_ms: f64,
}

/// An in-progress correction toward a sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blend {
    pub from_ms: f64,
    pub to_ms: f64,
    pub start_monotonic_ms: f64,
}

/// Input to [`step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncEvent {
    /// A new sample from the playback source
    Sample(PositionSample),
    /// A display refresh at the given monotonic time
    Frame { now_monotonic_ms: f64 },
}

/// How a sample was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDecision {
    /// Drift within interpolation noise
    Ignore,
    /// Eased toward the sample over the blend window
    Blend,
    /// Jumped to the sample
    Snap,
    /// Playback stopped; estimate frozen at the sample
    Stop,
}

/// Reconciler phase, derived from the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Interpolating,
    Blending,
}

/// Everything the reconciler knows about one playback session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconciliationState {
    pub current_estimate_ms: f64,
    /// Position of the latest accepted sample
    pub target_ms: f64,
    pub blend: Option<Blend>,
    /// Time of the previous frame; `None` until the first frame after (re)start
    pub last_frame_monotonic_ms: Option<f64>,
    pub playing: bool,
}

impl ReconciliationState {
    /// Fresh state positioned at `sample`
    pub fn new(sample: &PositionSample) -> Self {
        let position = sample.position_ms as f64;
        Self {
            current_estimate_ms: position,
            target_ms: position,
            blend: None,
            last_frame_monotonic_ms: None,
            playing: sample.is_playing,
        }
    }

    /// Current estimate in whole milliseconds
    pub fn estimate_ms(&self) -> u64 {
        self.current_estimate_ms.max(0.0).floor() as u64
    }

    pub fn phase(&self) -> SyncPhase {
        if !self.playing {
            SyncPhase::Idle
        } else if self.blend.is_some() {
            SyncPhase::Blending
        } else {
            SyncPhase::Interpolating
        }
    }
}

/// Ease-out cubic: fast start, gentle landing
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Decide how to treat a playing sample with the given drift
pub fn classify_drift(drift_ms: f64, config: &ReconcilerConfig) -> SampleDecision {
    if drift_ms > config.snap_threshold_ms {
        SampleDecision::Snap
    } else if drift_ms > config.ignore_threshold_ms {
        SampleDecision::Blend
    } else {
        SampleDecision::Ignore
    }
}

/// What [`step`] would decide for a sample against `state`
pub fn decide(
    state: &ReconciliationState,
    sample: &PositionSample,
    config: &ReconcilerConfig,
) -> SampleDecision {
    if !sample.is_playing {
        return SampleDecision::Stop;
    }
    let drift = (state.current_estimate_ms - sample.position_ms as f64).abs();
    classify_drift(drift, config)
}

fn apply_sample(
    mut state: ReconciliationState,
    sample: &PositionSample,
    config: &ReconcilerConfig,
) -> ReconciliationState {
    let position = sample.position_ms as f64;

    match decide(&state, sample, config) {
        SampleDecision::Stop => {
            state.current_estimate_ms = position;
            state.target_ms = position;
            state.blend = None;
            state.last_frame_monotonic_ms = None;
            state.playing = false;
            return state;
        }
        SampleDecision::Snap => {
            state.current_estimate_ms = position;
            state.target_ms = position;
            state.blend = None;
        }
        SampleDecision::Blend => {
            state.blend = Some(Blend {
                from_ms: state.current_estimate_ms,
                to_ms: position,
                start_monotonic_ms: sample.sampled_at_monotonic_ms,
            });
            state.target_ms = position;
        }
        SampleDecision::Ignore => {}
    }

    if !state.playing {
        // Resuming: the next frame starts a fresh delta
        state.playing = true;
        state.last_frame_monotonic_ms = None;
    }
    state
}

fn apply_frame(
    mut state: ReconciliationState,
    now: f64,
    config: &ReconcilerConfig,
) -> ReconciliationState {
    if !state.playing {
        return state;
    }

    let Some(last_frame) = state.last_frame_monotonic_ms else {
        // First frame only establishes the time base
        state.last_frame_monotonic_ms = Some(now);
        return state;
    };
    let delta = (now - last_frame).max(0.0);

    match state.blend {
        Some(blend) => {
            let t = if config.blend_duration_ms > 0.0 {
                ((now - blend.start_monotonic_ms) / config.blend_duration_ms).clamp(0.0, 1.0)
            } else {
                1.0
            };

            if t >= 1.0 {
                // Land on the target and keep this frame's delta
                state.current_estimate_ms = blend.to_ms + delta;
                state.blend = None;
            } else {
                state.current_estimate_ms =
                    blend.from_ms + (blend.to_ms - blend.from_ms) * ease_out_cubic(t);
            }
        }
        None => state.current_estimate_ms += delta,
    }

    state.last_frame_monotonic_ms = Some(now);
    state
}

/// Advance the reconciliation state by one event
pub fn step(
    state: ReconciliationState,
    event: SyncEvent,
    config: &ReconcilerConfig,
) -> ReconciliationState {
    match event {
        SyncEvent::Sample(sample) => apply_sample(state, &sample, config),
        SyncEvent::Frame { now_monotonic_ms } => apply_frame(state, now_monotonic_ms, config),
    }
}

/// Owner of a session's reconciliation state
#[derive(Debug, Clone)]
pub struct TimeReconciler {
    state: ReconciliationState,
    config: ReconcilerConfig,
}

impl TimeReconciler {
    pub fn new(sample: &PositionSample, config: ReconcilerConfig) -> Self {
        Self {
            state: ReconciliationState::new(sample),
            config,
        }
    }

    /// Feed a new sample, superseding the previous one
    pub fn on_sample(&mut self, sample: PositionSample) -> SampleDecision {
        let decision = decide(&self.state, &sample, &self.config);
        match decision {
            SampleDecision::Snap | SampleDecision::Blend => tracing::debug!(
                "{:?}: estimate {:.0}ms, sample {}ms",
                decision,
                self.state.current_estimate_ms,
                sample.position_ms
            ),
            _ => {}
        }
        self.state = step(self.state, SyncEvent::Sample(sample), &self.config);
        decision
    }

    /// Advance to a display refresh and return the estimate
    pub fn tick(&mut self, now_monotonic_ms: f64) -> u64 {
        self.state = step(
            self.state,
            SyncEvent::Frame { now_monotonic_ms },
            &self.config,
        );
        self.state.estimate_ms()
    }

    /// Discard all history and restart at `sample`
    pub fn reset(&mut self, sample: &PositionSample) {
        self.state = ReconciliationState::new(sample);
    }

    pub fn estimate_ms(&self) -> u64 {
        self.state.estimate_ms()
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    pub fn state(&self) -> &ReconciliationState {
        &self.state
    }
}
