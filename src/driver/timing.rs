//! Per-operation timing, grounded in the teacher's inline `Instant::now()`/`elapsed()`
//! use inside `btree_cli.rs`'s `bulk_insert` command, generalized into a small reusable
//! recorder so both the CSV and interactive drivers share one aggregate-summary format.

use std::time::{Duration, Instant};

/// Records one timed operation's wall-clock duration.
pub struct OpTimer {
    start: Instant,
}

impl OpTimer {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    /// Stop the timer and return the elapsed duration.
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }
}

/// Aggregate timing stats across a batch of operations: count, total, mean, min, max.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSummary {
    pub count: usize,
    pub total: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl TimingSummary {
    pub fn mean(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total / self.count as u32
        }
    }
}

/// Accumulates individual [`OpTimer`] results into a running [`TimingSummary`].
#[derive(Debug, Default)]
pub struct TimingRecorder {
    count: usize,
    total: Duration,
    min: Option<Duration>,
    max: Option<Duration>,
}

impl TimingRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, elapsed: Duration) {
        self.count += 1;
        self.total += elapsed;
        self.min = Some(self.min.map_or(elapsed, |m| m.min(elapsed)));
        self.max = Some(self.max.map_or(elapsed, |m| m.max(elapsed)));
    }

    pub fn summary(&self) -> TimingSummary {
        TimingSummary {
            count: self.count,
            total: self.total,
            min: self.min.unwrap_or(Duration::ZERO),
            max: self.max.unwrap_or(Duration::ZERO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_recorder_summarizes_to_zero() {
        let recorder = TimingRecorder::new();
        let summary = recorder.summary();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean(), Duration::ZERO);
    }

    #[test]
    fn recorder_tracks_min_max_mean() {
        let mut recorder = TimingRecorder::new();
        recorder.record(Duration::from_millis(10));
        recorder.record(Duration::from_millis(30));
        recorder.record(Duration::from_millis(20));
        let summary = recorder.summary();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.min, Duration::from_millis(10));
        assert_eq!(summary.max, Duration::from_millis(30));
        assert_eq!(summary.mean(), Duration::from_millis(20));
    }
}
