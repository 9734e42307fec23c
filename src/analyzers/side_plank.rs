use super::{ExerciseAnalyzer, FrameSignals, PostureChecks};
use crate::geometry::{distance_2d, offset_from_line, AngleName, AngleSet};
use crate::landmarks::{NormalizedFrame, PoseLandmark, Side};
use crate::posture::PostureFault;
use crate::profiles::SIDE_PLANK;

/// Forearm side plank seen from the front
pub struct SidePlankAnalyzer;

impl SidePlankAnalyzer {
    /// The supporting arm is the one whose elbow sits lower in the image
    fn supporting_side(frame: &NormalizedFrame) -> Option<Side> {
        match (frame.get(PoseLandmark::LeftElbow), frame.get(PoseLandmark::RightElbow)) {
            (Some(l), Some(r)) => Some(if r.y > l.y { Side::Right } else { Side::Left }),
            (Some(_), None) => Some(Side::Left),
            (None, Some(_)) => Some(Side::Right),
            (None, None) => None,
        }
    }

    fn hip_offset(frame: &NormalizedFrame, side: Side) -> Option<Option<PostureFault>> {
        let offset = offset_from_line(frame.get(side.shoulder())?, frame.get(side.ankle())?, frame.get(side.hip())?)?;
        Some(if offset > SIDE_PLANK.hip_sag_threshold {
            Some(PostureFault::HipsSagging)
        } else if offset < -SIDE_PLANK.hip_hike_threshold {
            Some(PostureFault::HipsTooHigh)
        } else {
            None
        })
    }

    fn elbow_under_shoulder(frame: &NormalizedFrame, side: Side) -> Option<bool> {
        let elbow = frame.get(side.elbow())?;
        let shoulder = frame.get(side.shoulder())?;
        Some((elbow.x - shoulder.x).abs() <= SIDE_PLANK.elbow_alignment_threshold)
    }

    fn feet_stacked(frame: &NormalizedFrame) -> Option<bool> {
        let left = frame.get(PoseLandmark::LeftAnkle)?;
        let right = frame.get(PoseLandmark::RightAnkle)?;
        Some(distance_2d(left, right) <= SIDE_PLANK.feet_stacking_threshold)
    }
}

impl ExerciseAnalyzer for SidePlankAnalyzer {
    fn analyze(&self, frame: &NormalizedFrame, angles: AngleSet) -> FrameSignals {
        let posture = Self::supporting_side(frame).and_then(|side| {
            let torso = angles
                .get(AngleName::body_line(side))
                .or_else(|| angles.mean(&[AngleName::LeftBodyLine, AngleName::RightBodyLine]));

            PostureChecks::new()
                .essential(
                    angles.get(AngleName::elbow(side)).map(|deg| SIDE_PLANK.elbow_support.contains(deg)),
                    PostureFault::ElbowAngleOff,
                )
                .essential(
                    torso.map(|deg| SIDE_PLANK.torso.contains(deg)),
                    PostureFault::BackNotStraight,
                )
                .check_with(Self::hip_offset(frame, side))
                .check(Self::elbow_under_shoulder(frame, side), PostureFault::ElbowNotUnderShoulder)
                .check(Self::feet_stacked(frame), PostureFault::FeetNotStacked)
                .check(
                    angles.get(AngleName::neck(side)).map(|deg| SIDE_PLANK.head_neck.contains(deg)),
                    PostureFault::HeadMisaligned,
                )
                .finish()
        });

        let mut signals = FrameSignals::new(angles);
        signals.posture = posture;
        signals
    }

    fn name(&self) -> &str {
        "SidePlankAnalyzer"
    }
}
