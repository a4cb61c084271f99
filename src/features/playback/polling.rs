//! Adaptive polling of the playback source
//!
//! Polls faster when a line boundary is close so the clock gets a fresh
//! sample right around the transition.

use std::time::Duration;

use super::resolver::time_to_next_boundary;
use crate::features::lyrics::LyricLine;
use crate::features::settings::PollingSettings;

/// Poll interval for the current position
pub fn poll_interval(
    lines: &[LyricLine],
    current_time_ms: i64,
    settings: &PollingSettings,
) -> Duration {
    let imminent = time_to_next_boundary(lines, current_time_ms)
        .is_some_and(|delta| delta <= settings.imminent_window_ms as i64);

    let ms = if imminent {
        settings.fast_interval_ms
    } else {
        settings.default_interval_ms
    };
    Duration::from_millis(ms.max(1))
}

/// Tracks the active poll interval so the timer is only rebuilt on change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    current: Duration,
}

impl PollSchedule {
    pub fn new(initial: Duration) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    /// Record the wanted interval; `Some` only when it differs from the active one
    pub fn update(&mut self, wanted: Duration) -> Option<Duration> {
        if wanted == self.current {
            return None;
        }
        self.current = wanted;
        Some(wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(starts: &[u64]) -> Vec<LyricLine> {
        starts.iter().map(|&s| LyricLine::new("x", s)).collect()
    }

    #[test]
    fn test_fast_when_boundary_imminent() {
        let settings = PollingSettings::default();
        let lines = lines(&[0, 5000]);
        assert_eq!(
            poll_interval(&lines, 3500, &settings),
            Duration::from_millis(settings.fast_interval_ms)
        );
        assert_eq!(
            poll_interval(&lines, 3499, &settings),
            Duration::from_millis(settings.default_interval_ms)
        );
    }

    #[test]
    fn test_default_without_upcoming_lines() {
        let settings = PollingSettings::default();
        assert_eq!(
            poll_interval(&lines(&[0]), 100, &settings),
            Duration::from_millis(3000)
        );
        assert_eq!(poll_interval(&[], 0, &settings), Duration::from_millis(3000));
    }

    #[test]
    fn test_schedule_reports_only_changes() {
        let mut schedule = PollSchedule::new(Duration::from_millis(3000));
        assert_eq!(schedule.update(Duration::from_millis(3000)), None);
        assert_eq!(
            schedule.update(Duration::from_millis(1000)),
            Some(Duration::from_millis(1000))
        );
        assert_eq!(schedule.update(Duration::from_millis(1000)), None);
        assert_eq!(schedule.current(), Duration::from_millis(1000));
    }
}
