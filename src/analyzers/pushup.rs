use super::{hip_fault, ExerciseAnalyzer, FrameSignals, PostureChecks};
use crate::geometry::{center, distance_2d, AngleName, AngleSet};
use crate::landmarks::{NormalizedFrame, PoseLandmark};
use crate::posture::PostureFault;
use crate::profiles::{HAND_PLACEMENT, PUSHUP};

const ELBOWS: [AngleName; 2] = [AngleName::LeftElbow, AngleName::RightElbow];
const BODY_LINES: [AngleName; 2] = [AngleName::LeftBodyLine, AngleName::RightBodyLine];
const HIPS: [AngleName; 2] = [AngleName::LeftHip, AngleName::RightHip];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushUpVariant {
    Standard,
    Wide,
    Narrow,
    Diamond,
    /// Body line runs shoulder - hip - knee
    Knee,
}

/// Counts on the mean elbow angle and checks the body line
pub struct PushUpAnalyzer {
    variant: PushUpVariant,
}

impl PushUpAnalyzer {
    #[must_use]
    pub fn new(variant: PushUpVariant) -> Self {
        Self { variant }
    }

    /// Wrist span over shoulder span, when the user faces the camera
    fn hand_ratio(frame: &NormalizedFrame) -> Option<f64> {
        let shoulders = distance_2d(
            frame.get(PoseLandmark::LeftShoulder)?,
            frame.get(PoseLandmark::RightShoulder)?,
        );
        if shoulders < HAND_PLACEMENT.min_shoulder_span {
            return None;
        }
        let wrists = distance_2d(frame.get(PoseLandmark::LeftWrist)?, frame.get(PoseLandmark::RightWrist)?);
        Some(wrists / shoulders)
    }

    fn hand_check(&self, frame: &NormalizedFrame, checks: PostureChecks) -> PostureChecks {
        let ratio = Self::hand_ratio(frame);
        match self.variant {
            PushUpVariant::Wide => checks.check(
                ratio.map(|r| r >= HAND_PLACEMENT.wide_min_ratio),
                PostureFault::HandsTooNarrow,
            ),
            PushUpVariant::Narrow => checks.check(
                ratio.map(|r| r <= HAND_PLACEMENT.narrow_max_ratio),
                PostureFault::HandsTooWide,
            ),
            PushUpVariant::Diamond => checks.check(
                ratio.map(|r| r <= HAND_PLACEMENT.diamond_max_ratio),
                PostureFault::HandsNotTogether,
            ),
            PushUpVariant::Standard | PushUpVariant::Knee => checks,
        }
    }
}

impl ExerciseAnalyzer for PushUpAnalyzer {
    fn analyze(&self, frame: &NormalizedFrame, angles: AngleSet) -> FrameSignals {
        let shoulders = center(frame, PoseLandmark::LeftShoulder, PoseLandmark::RightShoulder);
        let hips = center(frame, PoseLandmark::LeftHip, PoseLandmark::RightHip);

        let (back, feet) = if self.variant == PushUpVariant::Knee {
            (angles.mean(&HIPS), center(frame, PoseLandmark::LeftKnee, PoseLandmark::RightKnee))
        } else {
            (angles.mean(&BODY_LINES), center(frame, PoseLandmark::LeftAnkle, PoseLandmark::RightAnkle))
        };

        let checks = PostureChecks::new().check(
            back.map(|deg| PUSHUP.back_alignment.contains(deg)),
            hip_fault(shoulders, hips, feet),
        );
        let posture = self.hand_check(frame, checks).finish();

        let mut signals = FrameSignals::new(angles);
        signals.channels = vec![signals.angles.mean(&ELBOWS)];
        signals.posture = posture;
        signals
    }

    fn name(&self) -> &str {
        match self.variant {
            PushUpVariant::Standard => "PushUpAnalyzer",
            PushUpVariant::Wide => "WidePushUpAnalyzer",
            PushUpVariant::Narrow => "NarrowPushUpAnalyzer",
            PushUpVariant::Diamond => "DiamondPushUpAnalyzer",
            PushUpVariant::Knee => "KneePushUpAnalyzer",
        }
    }
}
