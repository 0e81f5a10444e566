// Fixed-window moving average for the joint-angle stream
//
// The window holds the most recent raw samples, oldest evicted first. It has
// no memory beyond `capacity` samples, so it follows real movement within
// `capacity` frames while damping frame-to-frame landmark jitter.

use std::collections::VecDeque;

/// Window size used by the exercise tracker unless configured otherwise
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Bounded FIFO of raw angle samples
#[derive(Debug, Clone, PartialEq)]
pub struct AngleHistory {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl AngleHistory {
    /// Create an empty history; a capacity of 0 is raised to 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Push a sample, evict past capacity, and return the window mean
    ///
    /// With a capacity of 1 this returns `sample` unchanged.
    pub fn smooth(&mut self, sample: f64) -> f64 {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        self.mean()
    }

    /// Mean of the current window, 0.0 when empty
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.mean()
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples in arrival order (oldest first)
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.samples.iter()
    }

    fn mean(&self) -> f64 {
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }
}

impl Default for AngleHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_samples_return_value() {
        let mut history = AngleHistory::new(10);
        let mut smoothed = 0.0;
        for _ in 0..15 {
            smoothed = history.smooth(42.5);
        }
        assert_eq!(smoothed, 42.5);
        assert_eq!(history.len(), 10);
    }

    #[test]
    fn test_single_outlier_is_damped() {
        let mut history = AngleHistory::new(10);
        for _ in 0..9 {
            history.smooth(0.0);
        }
        assert_eq!(history.smooth(100.0), 10.0);
    }

    #[test]
    fn test_oldest_sample_evicted_first() {
        let mut history = AngleHistory::new(3);
        history.smooth(1.0);
        history.smooth(2.0);
        history.smooth(3.0);
        assert_eq!(history.smooth(4.0), 3.0);
        let samples: Vec<f64> = history.iter().copied().collect();
        assert_eq!(samples, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_capacity_one_disables_smoothing() {
        let mut history = AngleHistory::new(1);
        assert_eq!(history.smooth(170.0), 170.0);
        assert_eq!(history.smooth(95.0), 95.0);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let history = AngleHistory::new(0);
        assert_eq!(history.capacity(), 1);
    }

    #[test]
    fn test_average_of_empty_history() {
        let mut history = AngleHistory::default();
        assert_eq!(history.average(), 0.0);
        history.smooth(120.0);
        history.smooth(140.0);
        assert_eq!(history.average(), 130.0);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.average(), 0.0);
    }
}
