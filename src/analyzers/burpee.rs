use super::{hip_fault, ExerciseAnalyzer, FrameSignals, PostureChecks};
use crate::geometry::{center, AngleName, AngleSet};
use crate::landmarks::{NormalizedFrame, PoseLandmark};
use crate::posture::PostureFault;
use crate::profiles::BURPEES;

/// Counts standing -> plank -> standing on the torso tilt
pub struct BurpeeAnalyzer;

impl ExerciseAnalyzer for BurpeeAnalyzer {
    fn analyze(&self, frame: &NormalizedFrame, angles: AngleSet) -> FrameSignals {
        let tilt = angles.get(AngleName::TorsoTilt);

        // Only the plank part of the movement has a body line to hold
        let checks = PostureChecks::new();
        let checks = match tilt {
            Some(deg) if deg >= BURPEES.torso_tilt_down => checks.check(
                angles
                    .mean(&[AngleName::LeftBodyLine, AngleName::RightBodyLine])
                    .map(|line| line >= BURPEES.plank_body_line_min),
                hip_fault(
                    center(frame, PoseLandmark::LeftShoulder, PoseLandmark::RightShoulder),
                    center(frame, PoseLandmark::LeftHip, PoseLandmark::RightHip),
                    center(frame, PoseLandmark::LeftAnkle, PoseLandmark::RightAnkle),
                ),
            ),
            Some(_) => checks.check(Some(true), PostureFault::BackNotStraight),
            None => checks,
        };

        let mut signals = FrameSignals::new(angles);
        signals.channels = vec![tilt];
        signals.posture = checks.finish();
        signals
    }

    fn name(&self) -> &str {
        "BurpeeAnalyzer"
    }
}
