//! Per-exercise signal extraction.
//!
//! An analyzer turns one normalized frame (and its angle set) into the rep
//! channel values the repetition state machine consumes and the posture
//! verdict the validator consumes. It holds no state; everything that
//! remembers earlier frames lives in the session.

/// Push-ups and their width/knee variants
pub mod pushup;

/// Front planks and their arm/knee variants
pub mod plank;

/// Side plank on the forearm
pub mod side_plank;

/// Bodyweight squats
pub mod squat;

/// Forward/stationary lunges
pub mod lunge;

/// Jumping jacks (two arms plus legs)
pub mod jumping_jacks;

/// Burpees (standing to plank and back)
pub mod burpee;

/// Sit-ups
pub mod sit_up;

/// High knees in place
pub mod high_knees;

use crate::geometry::{offset_from_line, AngleSet};
use crate::landmarks::{NormalizedFrame, Point};
use crate::posture::{PostureCheck, PostureFault};
use crate::profiles::ExerciseKind;

/// What one frame says about the current exercise
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSignals {
    pub angles: AngleSet,
    /// One value per rep channel of the profile, `None` when undefined
    pub channels: Vec<Option<f64>>,
    /// Extra condition for entering the down phase (depth gates)
    pub down_allowed: bool,
    /// `None` when the frame carries no usable alignment signal
    pub posture: Option<PostureCheck>,
}

impl FrameSignals {
    #[must_use]
    pub fn new(angles: AngleSet) -> Self {
        Self {
            angles,
            channels: Vec::new(),
            down_allowed: true,
            posture: None,
        }
    }

    /// No rep channel and no posture verdict could be derived
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posture.is_none() && self.channels.iter().all(Option::is_none)
    }
}

/// Trait for all exercise analyzers
pub trait ExerciseAnalyzer: Send + Sync {
    /// Extract rep channels and a posture verdict from one frame
    fn analyze(&self, frame: &NormalizedFrame, angles: AngleSet) -> FrameSignals;

    /// Get analyzer name
    fn name(&self) -> &str;
}

/// Create the analyzer for an exercise
#[must_use]
pub fn create_analyzer(kind: ExerciseKind) -> Box<dyn ExerciseAnalyzer> {
    match kind {
        ExerciseKind::PushUps => Box::new(pushup::PushUpAnalyzer::new(pushup::PushUpVariant::Standard)),
        ExerciseKind::WidePushUps => Box::new(pushup::PushUpAnalyzer::new(pushup::PushUpVariant::Wide)),
        ExerciseKind::NarrowPushUps => Box::new(pushup::PushUpAnalyzer::new(pushup::PushUpVariant::Narrow)),
        ExerciseKind::DiamondPushUps => Box::new(pushup::PushUpAnalyzer::new(pushup::PushUpVariant::Diamond)),
        ExerciseKind::KneePushUps => Box::new(pushup::PushUpAnalyzer::new(pushup::PushUpVariant::Knee)),
        ExerciseKind::Plank => Box::new(plank::PlankAnalyzer::new(plank::PlankVariant::Forearm)),
        ExerciseKind::StraightArmPlank => Box::new(plank::PlankAnalyzer::new(plank::PlankVariant::StraightArm)),
        ExerciseKind::KneePlank => Box::new(plank::PlankAnalyzer::new(plank::PlankVariant::Knee)),
        ExerciseKind::ReverseStraightArmPlank => {
            Box::new(plank::PlankAnalyzer::new(plank::PlankVariant::ReverseStraightArm))
        }
        ExerciseKind::SidePlank => Box::new(side_plank::SidePlankAnalyzer),
        ExerciseKind::Squats => Box::new(squat::SquatAnalyzer),
        ExerciseKind::Lunges => Box::new(lunge::LungeAnalyzer),
        ExerciseKind::JumpingJacks => Box::new(jumping_jacks::JumpingJacksAnalyzer),
        ExerciseKind::Burpees => Box::new(burpee::BurpeeAnalyzer),
        ExerciseKind::SitUps => Box::new(sit_up::SitUpAnalyzer),
        ExerciseKind::HighKnees => Box::new(high_knees::HighKneesAnalyzer),
    }
}

/// Ordered alignment checks for one frame.
///
/// The first failing check names the fault. A check whose inputs are
/// undefined is skipped, unless it is essential: a missing essential input
/// withholds the whole verdict.
#[derive(Debug, Default)]
pub(crate) struct PostureChecks {
    evaluated: usize,
    missing_essential: bool,
    fault: Option<PostureFault>,
}

impl PostureChecks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn essential(mut self, ok: Option<bool>, fault: PostureFault) -> Self {
        if ok.is_none() {
            self.missing_essential = true;
        }
        self.check(ok, fault)
    }

    pub(crate) fn check(mut self, ok: Option<bool>, fault: PostureFault) -> Self {
        if let Some(ok) = ok {
            self.evaluated += 1;
            if !ok && self.fault.is_none() {
                self.fault = Some(fault);
            }
        }
        self
    }

    /// Like [`check`](Self::check) with the fault chosen from the input
    pub(crate) fn check_with(mut self, fault: Option<Option<PostureFault>>) -> Self {
        if let Some(found) = fault {
            self.evaluated += 1;
            if self.fault.is_none() {
                self.fault = found;
            }
        }
        self
    }

    pub(crate) fn finish(self) -> Option<PostureCheck> {
        if self.missing_essential || self.evaluated == 0 {
            return None;
        }
        Some(self.fault.map_or(PostureCheck::Aligned, PostureCheck::Fault))
    }
}

/// Sag or pike of the hip relative to the shoulder -> feet line, used to
/// name a bent-body fault
pub(crate) fn hip_fault(shoulder: Option<Point>, hip: Option<Point>, feet: Option<Point>) -> PostureFault {
    let offset = match (shoulder, hip, feet) {
        (Some(s), Some(h), Some(f)) => offset_from_line(s, f, h),
        _ => None,
    };
    match offset {
        Some(o) if o < 0.0 => PostureFault::HipsTooHigh,
        Some(_) => PostureFault::HipsSagging,
        None => PostureFault::BackNotStraight,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_exercise_has_an_analyzer() {
        for kind in ExerciseKind::ALL {
            assert!(!create_analyzer(kind).name().is_empty());
        }
    }

    #[test]
    fn test_posture_checks_first_fault_wins() {
        let verdict = PostureChecks::new()
            .check(Some(true), PostureFault::KneesBent)
            .check(Some(false), PostureFault::HipsSagging)
            .check(Some(false), PostureFault::ArmsBent)
            .finish();
        assert_eq!(verdict, Some(PostureCheck::Fault(PostureFault::HipsSagging)));
    }

    #[test]
    fn test_posture_checks_undefined_inputs() {
        assert_eq!(PostureChecks::new().check(None, PostureFault::KneesBent).finish(), None);
        assert_eq!(
            PostureChecks::new()
                .check(None, PostureFault::KneesBent)
                .check(Some(true), PostureFault::ArmsBent)
                .finish(),
            Some(PostureCheck::Aligned)
        );
        assert_eq!(
            PostureChecks::new()
                .essential(None, PostureFault::ElbowAngleOff)
                .check(Some(true), PostureFault::ArmsBent)
                .finish(),
            None
        );
    }

    #[test]
    fn test_hip_fault_direction() {
        let shoulder = Some(Point::xy(0.2, 0.5));
        let feet = Some(Point::xy(0.8, 0.5));
        assert_eq!(hip_fault(shoulder, Some(Point::xy(0.5, 0.6)), feet), PostureFault::HipsSagging);
        assert_eq!(hip_fault(shoulder, Some(Point::xy(0.5, 0.4)), feet), PostureFault::HipsTooHigh);
        assert_eq!(hip_fault(None, Some(Point::xy(0.5, 0.4)), feet), PostureFault::BackNotStraight);
    }

    #[test]
    fn test_empty_signals() {
        let mut signals = FrameSignals::new(AngleSet::new());
        signals.channels = vec![None, None];
        assert!(signals.is_empty());
        signals.channels[1] = Some(90.0);
        assert!(!signals.is_empty());
    }
}
