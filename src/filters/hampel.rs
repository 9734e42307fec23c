use super::{median_of, SignalFilter};
use crate::constants::MAD_SCALE;
use std::collections::VecDeque;

/// Hampel filter: replaces samples far from the running median
pub struct HampelFilter {
    window_size: usize,
    threshold: f64,
    buffer: VecDeque<f64>,
}

impl HampelFilter {
    /// Create a new Hampel filter
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is not odd or is zero, or if threshold is negative
    #[must_use]
    pub fn new(window_size: usize, threshold: f64) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        assert!(window_size % 2 == 1, "Window size must be odd, got {}", window_size);
        assert!(threshold >= 0.0, "Threshold must be non-negative, got {}", threshold);
        Self {
            window_size,
            threshold,
            buffer: VecDeque::with_capacity(window_size),
        }
    }

    fn filter_value(&self, new_value: f64) -> f64 {
        if self.buffer.is_empty() {
            return new_value;
        }

        let mut window: Vec<f64> = self.buffer.iter().copied().collect();
        window.push(new_value);
        let Some(median) = median_of(&mut window) else {
            return new_value;
        };

        let mut deviations: Vec<f64> = window.iter().map(|&x| (x - median).abs()).collect();
        let mad = median_of(&mut deviations).unwrap_or(0.0);
        let sigma = MAD_SCALE * mad;

        if (new_value - median).abs() > self.threshold * sigma {
            median
        } else {
            new_value
        }
    }
}

impl SignalFilter for HampelFilter {
    fn apply(&mut self, value: f64) -> f64 {
        let filtered = self.filter_value(value);

        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(filtered);

        filtered
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "HampelFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hampel_filter_normal() {
        let mut filter = HampelFilter::new(5, 3.0);

        // Normal values should pass through
        for val in [150.0, 151.0, 150.5, 151.5, 150.2] {
            assert!((filter.apply(val) - val).abs() < 0.1);
        }
    }

    #[test]
    fn test_hampel_filter_outlier() {
        let mut filter = HampelFilter::new(5, 3.0);

        filter.apply(150.0);
        filter.apply(151.0);
        filter.apply(150.5);
        filter.apply(151.5);

        // Outlier should be replaced with something close to the median
        let filtered = filter.apply(20.0);
        assert!(filtered > 140.0);
    }

    #[test]
    #[should_panic(expected = "Window size must be odd")]
    fn test_even_window_panics() {
        let _ = HampelFilter::new(4, 3.0);
    }
}
