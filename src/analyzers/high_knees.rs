use super::{ExerciseAnalyzer, FrameSignals, PostureChecks};
use crate::geometry::{AngleName, AngleSet};
use crate::landmarks::NormalizedFrame;
use crate::posture::PostureFault;
use crate::profiles::HIGH_KNEES;

/// One channel per leg; either knee coming up completes a rep
pub struct HighKneesAnalyzer;

impl ExerciseAnalyzer for HighKneesAnalyzer {
    fn analyze(&self, _frame: &NormalizedFrame, angles: AngleSet) -> FrameSignals {
        let posture = PostureChecks::new()
            .check(
                angles.get(AngleName::TorsoTilt).map(|deg| deg <= HIGH_KNEES.torso_tilt_max),
                PostureFault::LeaningForward,
            )
            .finish();

        let mut signals = FrameSignals::new(angles);
        signals.channels = vec![
            signals.angles.get(AngleName::LeftHip),
            signals.angles.get(AngleName::RightHip),
        ];
        signals.posture = posture;
        signals
    }

    fn name(&self) -> &str {
        "HighKneesAnalyzer"
    }
}
