use super::{ExerciseAnalyzer, FrameSignals, PostureChecks};
use crate::geometry::{center, mirror_reflex, AngleName, AngleSet};
use crate::landmarks::{NormalizedFrame, PoseLandmark};
use crate::posture::PostureFault;
use crate::profiles::SQUAT;

const KNEES: [AngleName; 2] = [AngleName::LeftKnee, AngleName::RightKnee];
const HIPS: [AngleName; 2] = [AngleName::LeftHip, AngleName::RightHip];

/// Counts on the mean knee angle; the down phase needs the hips at knee depth
pub struct SquatAnalyzer;

impl SquatAnalyzer {
    /// Hip centre lower than knee centre by at least the depth margin
    fn deep_enough(frame: &NormalizedFrame) -> bool {
        let hips = center(frame, PoseLandmark::LeftHip, PoseLandmark::RightHip);
        let knees = center(frame, PoseLandmark::LeftKnee, PoseLandmark::RightKnee);
        match (hips, knees) {
            (Some(h), Some(k)) => h.y - k.y >= SQUAT.hip_below_knee_min,
            _ => false,
        }
    }
}

impl ExerciseAnalyzer for SquatAnalyzer {
    fn analyze(&self, frame: &NormalizedFrame, angles: AngleSet) -> FrameSignals {
        let knee = angles.mean(&KNEES);
        let standing = knee.is_some_and(|deg| deg >= mirror_reflex(SQUAT.knee_angle_up));
        let hip = angles.mean(&HIPS).filter(|_| standing);

        let posture = PostureChecks::new()
            .check(
                angles.get(AngleName::TorsoTilt).map(|deg| SQUAT.torso_tilt.contains(deg)),
                PostureFault::LeaningForward,
            )
            .check(hip.map(|deg| deg >= SQUAT.hip_angle_min), PostureFault::BackRounded)
            .finish();

        let mut signals = FrameSignals::new(angles);
        signals.channels = vec![knee];
        signals.down_allowed = Self::deep_enough(frame);
        signals.posture = posture;
        signals
    }

    fn name(&self) -> &str {
        "SquatAnalyzer"
    }
}
