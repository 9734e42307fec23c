use super::{ExerciseAnalyzer, FrameSignals, PostureChecks};
use crate::geometry::{AngleName, AngleSet};
use crate::landmarks::NormalizedFrame;
use crate::posture::PostureFault;
use crate::profiles::SITUPS;

/// Counts on the hip angle, which opens when lying back
pub struct SitUpAnalyzer;

impl ExerciseAnalyzer for SitUpAnalyzer {
    fn analyze(&self, _frame: &NormalizedFrame, angles: AngleSet) -> FrameSignals {
        let posture = PostureChecks::new()
            .check(
                angles
                    .mean(&[AngleName::LeftKnee, AngleName::RightKnee])
                    .map(|deg| SITUPS.knee_bend.contains(deg)),
                PostureFault::KneesNotBent,
            )
            .finish();

        let mut signals = FrameSignals::new(angles);
        signals.channels = vec![signals.angles.mean(&[AngleName::LeftHip, AngleName::RightHip])];
        signals.posture = posture;
        signals
    }

    fn name(&self) -> &str {
        "SitUpAnalyzer"
    }
}
