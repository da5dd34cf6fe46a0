use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

// Sliding window estimator over the most recent chunk completion times
pub struct SpeedEstimator {
    times: VecDeque<Instant>,
    window: usize,
    chunk_size: u64,
}

impl SpeedEstimator {
    pub fn new(window: usize, chunk_size: u64) -> Self {
        let window = window.max(2);
        SpeedEstimator {
            times: VecDeque::with_capacity(window),
            window,
            chunk_size,
        }
    }

    pub fn on_chunk_completed(&mut self) {
        self.record(Instant::now());
    }

    fn record(&mut self, at: Instant) {
        self.times.push_back(at);
        if self.times.len() > self.window {
            self.times.pop_front();
        }
    }

    // Blocks per second over the retained window
    pub fn blocks_per_second(&self) -> u64 {
        if self.times.len() < 2 {
            return 0;
        }
        let (first, last) = (self.times.front(), self.times.back());
        let (Some(first), Some(last)) = (first, last) else {
            return 0;
        };
        let span = last.duration_since(*first).as_secs_f64().round().max(1.0);
        let blocks = self.chunk_size * (self.times.len() as u64 - 1);
        (blocks as f64 / span) as u64
    }

    // Remaining time estimate for `remaining` blocks, None while no speed
    // can be measured yet
    pub fn eta(&self, remaining: u64) -> Option<Duration> {
        let speed = self.blocks_per_second();
        if speed == 0 {
            return None;
        }
        Some(Duration::from_secs(remaining.div_ceil(speed)))
    }
}

// Human readable duration, seconds precision
pub fn humanize(duration: Duration) -> String {
    humantime::format_duration(Duration::from_secs(duration.as_secs())).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_speed_before_two_chunks() {
        let mut estimator = SpeedEstimator::new(8, 500);
        assert_eq!(estimator.blocks_per_second(), 0);
        assert!(estimator.eta(1000).is_none());
        estimator.record(Instant::now());
        assert_eq!(estimator.blocks_per_second(), 0);
    }

    #[test]
    fn test_speed_over_window() {
        let mut estimator = SpeedEstimator::new(8, 500);
        let start = Instant::now();
        // three completions, two seconds apart: 1000 blocks over 4 seconds
        estimator.record(start);
        estimator.record(start + Duration::from_secs(2));
        estimator.record(start + Duration::from_secs(4));
        assert_eq!(estimator.blocks_per_second(), 250);
        assert_eq!(estimator.eta(1000), Some(Duration::from_secs(4)));
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut estimator = SpeedEstimator::new(2, 500);
        let start = Instant::now();
        estimator.record(start);
        estimator.record(start + Duration::from_secs(100));
        estimator.record(start + Duration::from_secs(101));
        // only the last two timestamps remain: 500 blocks over 1 second
        assert_eq!(estimator.blocks_per_second(), 500);
    }

    #[test]
    fn test_sub_second_span_counts_as_one_second() {
        let mut estimator = SpeedEstimator::new(8, 500);
        let start = Instant::now();
        estimator.record(start);
        estimator.record(start + Duration::from_millis(10));
        assert_eq!(estimator.blocks_per_second(), 500);
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize(Duration::from_secs(180)), "3m");
        assert_eq!(humanize(Duration::from_secs(0)), "0s");
    }
}
