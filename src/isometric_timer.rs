//! Hold timer for isometric exercises.
//!
//! Time accrues only while posture is confirmed correct; an incorrect or
//! unknown posture pauses the timer without resetting it. Each frame credits
//! the wall-clock delta since the previous accepted frame, capped so that a
//! long tracking gap cannot award a burst of time.

use crate::constants::DEFAULT_MAX_FRAME_GAP_MS;
use crate::utils::safe_cast::{f64_to_u32_clamp, ms_to_secs};

#[derive(Debug, Clone)]
pub struct IsometricTimer {
    max_frame_gap_ms: u64,
    accumulated_secs: f64,
    last_frame_at: Option<u64>,
}

impl Default for IsometricTimer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_GAP_MS)
    }
}

impl IsometricTimer {
    #[must_use]
    pub fn new(max_frame_gap_ms: u64) -> Self {
        Self {
            max_frame_gap_ms,
            accumulated_secs: 0.0,
            last_frame_at: None,
        }
    }

    /// Account for one frame; returns the seconds credited
    pub fn advance(&mut self, timestamp_ms: u64, posture_correct: bool) -> f64 {
        let delta_ms = self
            .last_frame_at
            .map_or(0, |last| timestamp_ms.saturating_sub(last).min(self.max_frame_gap_ms));
        self.last_frame_at = Some(timestamp_ms);

        if !posture_correct {
            return 0.0;
        }
        let credited = ms_to_secs(delta_ms);
        self.accumulated_secs += credited;
        credited
    }

    #[must_use]
    pub fn accumulated_secs(&self) -> f64 {
        self.accumulated_secs
    }

    /// Accumulated time rounded to the nearest second
    #[must_use]
    pub fn whole_seconds(&self) -> u32 {
        f64_to_u32_clamp(self.accumulated_secs.round(), 0, u32::MAX)
    }

    pub fn reset(&mut self) {
        self.accumulated_secs = 0.0;
        self.last_frame_at = None;
    }
}
