use super::{ExerciseAnalyzer, FrameSignals, PostureChecks};
use crate::geometry::{center, AngleName, AngleSet};
use crate::landmarks::{NormalizedFrame, PoseLandmark, Side};
use crate::posture::PostureFault;
use crate::profiles::LUNGES;

/// Tracks the front (more bent) and back knee as two channels
pub struct LungeAnalyzer;

impl LungeAnalyzer {
    fn front_side(angles: &AngleSet) -> Option<Side> {
        match (angles.get(AngleName::LeftKnee), angles.get(AngleName::RightKnee)) {
            (Some(l), Some(r)) => Some(if r < l { Side::Right } else { Side::Left }),
            (Some(_), None) => Some(Side::Left),
            (None, Some(_)) => Some(Side::Right),
            (None, None) => None,
        }
    }

    fn deep_enough(frame: &NormalizedFrame, front: Option<Side>) -> bool {
        let hips = center(frame, PoseLandmark::LeftHip, PoseLandmark::RightHip);
        let knee = front.and_then(|side| frame.get(side.knee()));
        match (hips, knee) {
            (Some(h), Some(k)) => h.y - k.y >= LUNGES.hip_below_front_knee_min,
            _ => false,
        }
    }
}

impl ExerciseAnalyzer for LungeAnalyzer {
    fn analyze(&self, frame: &NormalizedFrame, angles: AngleSet) -> FrameSignals {
        let front = Self::front_side(&angles);
        let front_knee = front.and_then(|side| angles.get(AngleName::knee(side)));
        let back_knee = angles.max(&[AngleName::LeftKnee, AngleName::RightKnee]);

        let posture = PostureChecks::new()
            .check(
                angles.get(AngleName::TorsoTilt).map(|deg| deg <= LUNGES.torso_tilt_max),
                PostureFault::LeaningForward,
            )
            .finish();

        let mut signals = FrameSignals::new(angles);
        signals.channels = vec![front_knee, back_knee];
        signals.down_allowed = Self::deep_enough(frame, front);
        signals.posture = posture;
        signals
    }

    fn name(&self) -> &str {
        "LungeAnalyzer"
    }
}
