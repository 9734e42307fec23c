//! Debounced posture verdicts and rate-limited warnings.

use crate::constants::{DEFAULT_POSTURE_BAD_FRAMES, DEFAULT_POSTURE_GOOD_FRAMES, DEFAULT_WARNING_COOLDOWN_MS};
use crate::events::{Feedback, Severity};
use log::debug;

/// Something wrong with the user's form on one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostureFault {
    HipsSagging,
    HipsTooHigh,
    BackNotStraight,
    BodyNotHorizontal,
    KneesBent,
    ArmsBent,
    ElbowAngleOff,
    ElbowNotUnderShoulder,
    FeetNotStacked,
    HeadMisaligned,
    BackRounded,
    LeaningForward,
    HandsTooNarrow,
    HandsTooWide,
    HandsNotTogether,
    ArmsUneven,
    KneesNotBent,
}

impl PostureFault {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            PostureFault::HipsSagging => "Don't let your hips sag",
            PostureFault::HipsTooHigh => "Lower your hips",
            PostureFault::BackNotStraight => "Keep your back straight",
            PostureFault::BodyNotHorizontal => "Keep your body parallel to the floor",
            PostureFault::KneesBent => "Straighten your legs",
            PostureFault::ArmsBent => "Lock your arms straight",
            PostureFault::ElbowAngleOff => "Keep your supporting elbow at 90 degrees",
            PostureFault::ElbowNotUnderShoulder => "Place your elbow under your shoulder",
            PostureFault::FeetNotStacked => "Stack your feet",
            PostureFault::HeadMisaligned => "Keep your head in line with your spine",
            PostureFault::BackRounded => "Stand tall at the top",
            PostureFault::LeaningForward => "Keep your chest up",
            PostureFault::HandsTooNarrow => "Place your hands wider",
            PostureFault::HandsTooWide => "Bring your hands closer together",
            PostureFault::HandsNotTogether => "Form a diamond with your hands",
            PostureFault::ArmsUneven => "Move both arms together",
            PostureFault::KneesNotBent => "Keep your knees bent",
        }
    }

    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            PostureFault::HipsSagging | PostureFault::BackNotStraight => Severity::Danger,
            PostureFault::HandsTooNarrow | PostureFault::HandsTooWide | PostureFault::HandsNotTogether => {
                Severity::Info
            }
            _ => Severity::Warning,
        }
    }

    #[must_use]
    pub fn feedback(self) -> Feedback {
        Feedback::new(self.message(), self.severity())
    }
}

/// Per-frame form verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostureCheck {
    Aligned,
    Fault(PostureFault),
}

impl PostureCheck {
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        matches!(self, PostureCheck::Aligned)
    }
}

/// Debounced posture state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostureStatus {
    #[default]
    Unknown,
    Correct,
    Incorrect,
}

/// Frames needed to flip the posture status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    pub good_frames: u32,
    pub bad_frames: u32,
}

impl Default for Debounce {
    fn default() -> Self {
        Self {
            good_frames: DEFAULT_POSTURE_GOOD_FRAMES,
            bad_frames: DEFAULT_POSTURE_BAD_FRAMES,
        }
    }
}

/// What changed after one posture update
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostureUpdate {
    /// New correctness flag when the status flipped
    pub changed_to: Option<bool>,
    pub warning: Option<Feedback>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostureState {
    pub status: PostureStatus,
    pub consecutive_good: u32,
    pub consecutive_bad: u32,
    pub last_warning_at: Option<u64>,
}

/// Turns per-frame checks into a stable status and cooldown-gated warnings
#[derive(Debug, Clone)]
pub struct PostureValidator {
    debounce: Debounce,
    cooldown_ms: u64,
    warnings_enabled: bool,
    state: PostureState,
}

impl Default for PostureValidator {
    fn default() -> Self {
        Self::new(Debounce::default(), DEFAULT_WARNING_COOLDOWN_MS)
    }
}

impl PostureValidator {
    /// Create a posture validator
    ///
    /// # Panics
    ///
    /// Panics if either debounce count is zero
    #[must_use]
    pub fn new(debounce: Debounce, cooldown_ms: u64) -> Self {
        assert!(
            debounce.good_frames > 0 && debounce.bad_frames > 0,
            "Debounce frame counts must be positive, got {:?}",
            debounce
        );
        Self {
            debounce,
            cooldown_ms,
            warnings_enabled: true,
            state: PostureState::default(),
        }
    }

    /// Suppress warnings entirely; status still updates
    #[must_use]
    pub fn with_warnings(mut self, enabled: bool) -> Self {
        self.warnings_enabled = enabled;
        self
    }

    #[must_use]
    pub fn status(&self) -> PostureStatus {
        self.state.status
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.state.status == PostureStatus::Correct
    }

    #[must_use]
    pub fn state(&self) -> &PostureState {
        &self.state
    }

    /// Record one frame's verdict
    pub fn update(&mut self, timestamp_ms: u64, check: PostureCheck) -> PostureUpdate {
        let mut update = PostureUpdate::default();

        match check {
            PostureCheck::Aligned => {
                self.state.consecutive_good = self.state.consecutive_good.saturating_add(1);
                self.state.consecutive_bad = 0;
                if self.state.status != PostureStatus::Correct
                    && self.state.consecutive_good >= self.debounce.good_frames
                {
                    debug!("Posture correct at {} ms", timestamp_ms);
                    self.state.status = PostureStatus::Correct;
                    update.changed_to = Some(true);
                }
            }
            PostureCheck::Fault(fault) => {
                self.state.consecutive_bad = self.state.consecutive_bad.saturating_add(1);
                self.state.consecutive_good = 0;
                if self.state.status != PostureStatus::Incorrect
                    && self.state.consecutive_bad >= self.debounce.bad_frames
                {
                    debug!("Posture incorrect at {} ms: {:?}", timestamp_ms, fault);
                    self.state.status = PostureStatus::Incorrect;
                    update.changed_to = Some(false);
                    update.warning = self.warn(timestamp_ms, fault);
                }
            }
        }

        update
    }

    pub fn reset(&mut self) {
        self.state = PostureState::default();
    }

    fn warn(&mut self, timestamp_ms: u64, fault: PostureFault) -> Option<Feedback> {
        if !self.warnings_enabled {
            return None;
        }
        if let Some(last) = self.state.last_warning_at {
            if timestamp_ms.saturating_sub(last) < self.cooldown_ms {
                debug!("Warning '{}' suppressed by cooldown", fault.message());
                return None;
            }
        }
        self.state.last_warning_at = Some(timestamp_ms);
        Some(fault.feedback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAG: PostureCheck = PostureCheck::Fault(PostureFault::HipsSagging);

    #[test]
    fn test_single_bad_frame_does_not_flip() {
        let mut validator = PostureValidator::default();
        validator.update(0, PostureCheck::Aligned);
        validator.update(100, PostureCheck::Aligned);
        assert!(validator.is_correct());

        let update = validator.update(200, SAG);
        assert_eq!(update, PostureUpdate::default());
        assert!(validator.is_correct());

        validator.update(300, PostureCheck::Aligned);
        validator.update(400, SAG);
        validator.update(500, SAG);
        assert!(validator.is_correct());
    }

    #[test]
    fn test_flip_to_incorrect_warns_once() {
        let mut validator = PostureValidator::default();
        validator.update(0, SAG);
        validator.update(100, SAG);
        let update = validator.update(200, SAG);
        assert_eq!(update.changed_to, Some(false));
        assert_eq!(update.warning, Some(PostureFault::HipsSagging.feedback()));

        // Staying incorrect is silent
        let update = validator.update(300, SAG);
        assert_eq!(update, PostureUpdate::default());
        assert_eq!(validator.state().last_warning_at, Some(200));
    }

    #[test]
    fn test_cooldown_suppresses_warning_but_not_status() {
        let mut validator = PostureValidator::new(Debounce { good_frames: 1, bad_frames: 1 }, 2000);
        assert!(validator.update(0, SAG).warning.is_some());
        validator.update(100, PostureCheck::Aligned);

        let update = validator.update(200, SAG);
        assert_eq!(update.changed_to, Some(false));
        assert!(update.warning.is_none());
        assert_eq!(validator.state().last_warning_at, Some(0));

        validator.update(2100, PostureCheck::Aligned);
        assert!(validator.update(2200, SAG).warning.is_some());
    }

    #[test]
    fn test_disabled_warnings_keep_cooldown_untouched() {
        let mut validator = PostureValidator::new(Debounce { good_frames: 1, bad_frames: 1 }, 2000).with_warnings(false);
        let update = validator.update(0, SAG);
        assert_eq!(update.changed_to, Some(false));
        assert!(update.warning.is_none());
        assert_eq!(validator.state().last_warning_at, None);
    }

    #[test]
    fn test_fault_severities() {
        assert_eq!(PostureFault::HipsSagging.severity(), Severity::Danger);
        assert_eq!(PostureFault::HandsTooWide.severity(), Severity::Info);
        assert_eq!(PostureFault::LeaningForward.severity(), Severity::Warning);
    }

    #[test]
    #[should_panic(expected = "Debounce frame counts must be positive")]
    fn test_zero_debounce_panics() {
        let _ = PostureValidator::new(Debounce { good_frames: 0, bad_frames: 3 }, 0);
    }
}
