use super::{hip_fault, ExerciseAnalyzer, FrameSignals, PostureChecks};
use crate::geometry::{center, inclination_from_horizontal, segment_cos_3d, AngleName, AngleSet};
use crate::landmarks::{NormalizedFrame, PoseLandmark, Side};
use crate::posture::PostureFault;
use crate::profiles::PLANK;

const BODY_LINES: [AngleName; 2] = [AngleName::LeftBodyLine, AngleName::RightBodyLine];
const HIPS: [AngleName; 2] = [AngleName::LeftHip, AngleName::RightHip];
const KNEES: [AngleName; 2] = [AngleName::LeftKnee, AngleName::RightKnee];
const ELBOWS: [AngleName; 2] = [AngleName::LeftElbow, AngleName::RightElbow];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlankVariant {
    Forearm,
    StraightArm,
    /// Supported on the knees; the body line ends at the knee
    Knee,
    /// Face up on straight arms
    ReverseStraightArm,
}

pub struct PlankAnalyzer {
    variant: PlankVariant,
}

impl PlankAnalyzer {
    #[must_use]
    pub fn new(variant: PlankVariant) -> Self {
        Self { variant }
    }

    fn end_of_line(&self, side: Side) -> PoseLandmark {
        match self.variant {
            PlankVariant::Knee => side.knee(),
            _ => side.ankle(),
        }
    }

    /// Mean |cos| of the 3D shoulder -> hip -> end chain over visible sides
    fn straightness(&self, frame: &NormalizedFrame) -> Option<f64> {
        let values: Vec<f64> = Side::BOTH
            .iter()
            .filter_map(|&side| {
                segment_cos_3d(
                    frame.get(side.shoulder())?,
                    frame.get(side.hip())?,
                    frame.get(self.end_of_line(side))?,
                )
            })
            .map(f64::abs)
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }
}

impl ExerciseAnalyzer for PlankAnalyzer {
    fn analyze(&self, frame: &NormalizedFrame, angles: AngleSet) -> FrameSignals {
        let shoulders = center(frame, PoseLandmark::LeftShoulder, PoseLandmark::RightShoulder);
        let hips = center(frame, PoseLandmark::LeftHip, PoseLandmark::RightHip);
        let ends = center(frame, self.end_of_line(Side::Left), self.end_of_line(Side::Right));
        let bent_body = hip_fault(shoulders, hips, ends);

        let (back, tilt) = if self.variant == PlankVariant::Knee {
            let tilt = match (shoulders, ends) {
                (Some(s), Some(k)) => inclination_from_horizontal(s, k),
                _ => None,
            };
            (angles.mean(&HIPS), tilt)
        } else {
            (angles.mean(&BODY_LINES), angles.get(AngleName::BodyTilt))
        };

        let mut checks = PostureChecks::new()
            .essential(back.map(|deg| PLANK.back_alignment.contains(deg)), bent_body)
            .check(
                self.straightness(frame).map(|cos| cos >= PLANK.straight_abs_cos_min),
                bent_body,
            )
            .check(tilt.map(|deg| deg <= PLANK.horiz_max_deg), PostureFault::BodyNotHorizontal);

        if self.variant != PlankVariant::Knee {
            checks = checks.check(
                angles.mean(&KNEES).map(|deg| deg >= PLANK.knee_min_deg),
                PostureFault::KneesBent,
            );
        }
        if matches!(self.variant, PlankVariant::StraightArm | PlankVariant::ReverseStraightArm) {
            checks = checks.check(
                angles.mean(&ELBOWS).map(|deg| deg >= PLANK.straight_arm_elbow_min_deg),
                PostureFault::ArmsBent,
            );
        }

        let mut signals = FrameSignals::new(angles);
        signals.posture = checks.finish();
        signals
    }

    fn name(&self) -> &str {
        match self.variant {
            PlankVariant::Forearm => "PlankAnalyzer",
            PlankVariant::StraightArm => "StraightArmPlankAnalyzer",
            PlankVariant::Knee => "KneePlankAnalyzer",
            PlankVariant::ReverseStraightArm => "ReverseStraightArmPlankAnalyzer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::analyze;
    use crate::posture::PostureCheck;
    use PoseLandmark as L;

    fn forearm_plank(hip_y: f64, ankle_y: f64) -> Vec<(PoseLandmark, f64, f64)> {
        vec![
            (L::LeftShoulder, 0.3, 0.5),
            (L::LeftElbow, 0.3, 0.6),
            (L::LeftWrist, 0.15, 0.6),
            (L::LeftHip, 0.55, hip_y),
            (L::LeftKnee, 0.7, 0.5 + (ankle_y - 0.5) * 0.6),
            (L::LeftAnkle, 0.85, ankle_y),
        ]
    }

    #[test]
    fn test_straight_plank_is_aligned() {
        let signals = analyze(&PlankAnalyzer::new(PlankVariant::Forearm), &forearm_plank(0.5, 0.5));
        assert!(signals.channels.is_empty());
        assert_eq!(signals.posture, Some(PostureCheck::Aligned));
    }

    #[test]
    fn test_sagging_plank() {
        let signals = analyze(&PlankAnalyzer::new(PlankVariant::Forearm), &forearm_plank(0.58, 0.5));
        assert_eq!(signals.posture, Some(PostureCheck::Fault(PostureFault::HipsSagging)));
    }

    #[test]
    fn test_tilted_body_is_not_horizontal() {
        // Straight line but steeply inclined
        let points = vec![
            (L::LeftShoulder, 0.3, 0.2),
            (L::LeftHip, 0.45, 0.45),
            (L::LeftKnee, 0.54, 0.6),
            (L::LeftAnkle, 0.6, 0.7),
        ];
        let signals = analyze(&PlankAnalyzer::new(PlankVariant::Forearm), &points);
        assert_eq!(signals.posture, Some(PostureCheck::Fault(PostureFault::BodyNotHorizontal)));
    }

    #[test]
    fn test_straight_arm_requires_locked_elbows() {
        let analyzer = PlankAnalyzer::new(PlankVariant::StraightArm);
        let bent = analyze(&analyzer, &forearm_plank(0.5, 0.5));
        assert_eq!(bent.posture, Some(PostureCheck::Fault(PostureFault::ArmsBent)));

        let mut points = forearm_plank(0.5, 0.5);
        for point in &mut points {
            match point.0 {
                L::LeftElbow => *point = (L::LeftElbow, 0.3, 0.6),
                L::LeftWrist => *point = (L::LeftWrist, 0.3, 0.7),
                _ => {}
            }
        }
        assert_eq!(analyze(&analyzer, &points).posture, Some(PostureCheck::Aligned));
    }

    #[test]
    fn test_missing_body_line_withholds_verdict() {
        let points = vec![(L::LeftShoulder, 0.3, 0.5), (L::LeftElbow, 0.3, 0.6)];
        let signals = analyze(&PlankAnalyzer::new(PlankVariant::Forearm), &points);
        assert_eq!(signals.posture, None);
        assert!(signals.is_empty());
    }

    #[test]
    fn test_knee_plank_ignores_ankles() {
        let points = vec![
            (L::LeftShoulder, 0.3, 0.5),
            (L::LeftHip, 0.5, 0.52),
            (L::LeftKnee, 0.7, 0.54),
            (L::LeftAnkle, 0.8, 0.3),
        ];
        let signals = analyze(&PlankAnalyzer::new(PlankVariant::Knee), &points);
        assert_eq!(signals.posture, Some(PostureCheck::Aligned));
    }
}
