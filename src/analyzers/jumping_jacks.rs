use super::{ExerciseAnalyzer, FrameSignals, PostureChecks};
use crate::geometry::{AngleName, AngleSet};
use crate::landmarks::NormalizedFrame;
use crate::posture::PostureFault;
use crate::profiles::JUMPING_JACKS;

/// Left arm, right arm and leg spread as three channels
pub struct JumpingJacksAnalyzer;

impl ExerciseAnalyzer for JumpingJacksAnalyzer {
    fn analyze(&self, _frame: &NormalizedFrame, angles: AngleSet) -> FrameSignals {
        let left = angles.get(AngleName::LeftShoulder);
        let right = angles.get(AngleName::RightShoulder);

        let symmetric = match (left, right) {
            (Some(l), Some(r)) => Some((l - r).abs() <= JUMPING_JACKS.arm_symmetry_max_deg),
            _ => None,
        };
        let posture = PostureChecks::new().check(symmetric, PostureFault::ArmsUneven).finish();

        let mut signals = FrameSignals::new(angles);
        signals.channels = vec![left, right, signals.angles.get(AngleName::LegSpread)];
        signals.posture = posture;
        signals
    }

    fn name(&self) -> &str {
        "JumpingJacksAnalyzer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::analyze;
    use crate::landmarks::PoseLandmark as L;
    use crate::posture::PostureCheck;

    #[test]
    fn test_star_position() {
        let points = vec![
            (L::LeftShoulder, 0.6, 0.3),
            (L::RightShoulder, 0.4, 0.3),
            (L::LeftElbow, 0.75, 0.15),
            (L::RightElbow, 0.25, 0.15),
            (L::LeftHip, 0.55, 0.6),
            (L::RightHip, 0.45, 0.6),
            (L::LeftAnkle, 0.75, 0.9),
            (L::RightAnkle, 0.25, 0.9),
        ];
        let signals = analyze(&JumpingJacksAnalyzer, &points);
        let [left, right, legs] = [signals.channels[0], signals.channels[1], signals.channels[2]].map(Option::unwrap);
        assert!(left >= JUMPING_JACKS.shoulder_abduction_up, "left arm {left}");
        assert!(right >= JUMPING_JACKS.shoulder_abduction_up, "right arm {right}");
        assert!(legs >= JUMPING_JACKS.hip_abduction_up, "legs {legs}");
        assert_eq!(signals.posture, Some(PostureCheck::Aligned));
    }

    #[test]
    fn test_one_arm_up_is_uneven() {
        let points = vec![
            (L::LeftShoulder, 0.6, 0.3),
            (L::RightShoulder, 0.4, 0.3),
            (L::LeftElbow, 0.75, 0.15),
            (L::RightElbow, 0.4, 0.45),
            (L::LeftHip, 0.55, 0.6),
            (L::RightHip, 0.45, 0.6),
        ];
        let signals = analyze(&JumpingJacksAnalyzer, &points);
        assert_eq!(signals.channels[2], None);
        assert_eq!(signals.posture, Some(PostureCheck::Fault(PostureFault::ArmsUneven)));
    }
}
