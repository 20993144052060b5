//! Clock utilities for recording sessions.
//!
//! Every trial is anchored to a monotonic clock epoch captured the
//! moment recording starts. Per-sample timesteps are measured as the
//! elapsed time between consecutive accepted detections, so a missed
//! frame simply widens the next timestep instead of corrupting it.

use std::time::Instant;

/// A recording clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment recording started).
#[derive(Debug, Clone)]
pub struct RecordingClock {
    /// The instant recording started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl RecordingClock {
    /// Create a new recording clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Seconds elapsed since recording start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at recording start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// The underlying epoch instant.
    pub fn epoch(&self) -> Instant {
        self.epoch
    }
}

/// Measures the timestep between consecutive accepted samples.
///
/// `split()` returns the time since the previous split (or since the
/// clock epoch for the first sample) and re-arms for the next one.
#[derive(Debug)]
pub struct TimestepClock {
    clock: RecordingClock,
    last_split_secs: f64,
}

impl TimestepClock {
    /// Arm a timestep clock against a running recording clock.
    pub fn new(clock: RecordingClock) -> Self {
        let last_split_secs = clock.elapsed_secs();
        Self {
            clock,
            last_split_secs,
        }
    }

    /// Seconds since the previous split; re-arms the clock.
    pub fn split(&mut self) -> f64 {
        let now = self.clock.elapsed_secs();
        let dt = now - self.last_split_secs;
        self.last_split_secs = now;
        dt
    }

    /// The wrapped recording clock.
    pub fn clock(&self) -> &RecordingClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = RecordingClock::start();
        // Should be very small but non-negative
        assert!(clock.elapsed_secs() < 1.0);
    }

    #[test]
    fn test_epoch_wall_is_rfc3339() {
        let clock = RecordingClock::start();
        assert!(chrono::DateTime::parse_from_rfc3339(clock.epoch_wall()).is_ok());
    }

    #[test]
    fn test_timestep_clock_splits_are_non_negative_and_increasing() {
        let mut splits = TimestepClock::new(RecordingClock::start());
        let first = splits.split();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = splits.split();
        assert!(first >= 0.0);
        assert!(second >= 0.002);
    }
}
