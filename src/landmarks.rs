//! Pose landmark frames and the frame adapter.
//!
//! Frames are produced by an external pose-estimation library: 33 landmarks
//! in normalized image space (`x`, `y` in [0, 1], `y` growing downward, `z`
//! relative depth) each carrying a visibility confidence. The adapter turns a
//! raw frame into a [`NormalizedFrame`] where every landmark is either a
//! usable point or absent, or rejects the frame outright.

use crate::constants::{DEFAULT_MIN_VISIBILITY, NUM_POSE_LANDMARKS};
use serde::{Deserialize, Serialize};

/// Landmark indices of the 33-point body schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(usize)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseLandmark {
    /// Position of this landmark in a frame
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Body side used by exercises that measure one limb at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    #[must_use]
    pub const fn shoulder(self) -> PoseLandmark {
        match self {
            Side::Left => PoseLandmark::LeftShoulder,
            Side::Right => PoseLandmark::RightShoulder,
        }
    }

    #[must_use]
    pub const fn elbow(self) -> PoseLandmark {
        match self {
            Side::Left => PoseLandmark::LeftElbow,
            Side::Right => PoseLandmark::RightElbow,
        }
    }

    #[must_use]
    pub const fn wrist(self) -> PoseLandmark {
        match self {
            Side::Left => PoseLandmark::LeftWrist,
            Side::Right => PoseLandmark::RightWrist,
        }
    }

    #[must_use]
    pub const fn hip(self) -> PoseLandmark {
        match self {
            Side::Left => PoseLandmark::LeftHip,
            Side::Right => PoseLandmark::RightHip,
        }
    }

    #[must_use]
    pub const fn knee(self) -> PoseLandmark {
        match self {
            Side::Left => PoseLandmark::LeftKnee,
            Side::Right => PoseLandmark::RightKnee,
        }
    }

    #[must_use]
    pub const fn ankle(self) -> PoseLandmark {
        match self {
            Side::Left => PoseLandmark::LeftAnkle,
            Side::Right => PoseLandmark::RightAnkle,
        }
    }

    #[must_use]
    pub const fn ear(self) -> PoseLandmark {
        match self {
            Side::Left => PoseLandmark::LeftEar,
            Side::Right => PoseLandmark::RightEar,
        }
    }
}

/// One tracked keypoint as delivered by the pose-estimation library
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    /// Detection confidence in [0, 1]
    #[serde(default = "full_visibility")]
    pub visibility: f64,
}

fn full_visibility() -> f64 {
    1.0
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }

    #[must_use]
    pub const fn point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}

/// One frame of pose landmarks with its monotonic timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Milliseconds on a monotonic clock
    pub timestamp_ms: u64,
    pub landmarks: Vec<Landmark>,
}

impl PoseFrame {
    #[must_use]
    pub fn new(timestamp_ms: u64, landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp_ms,
            landmarks,
        }
    }
}

/// A landmark position that passed the visibility check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Point in the image plane
    #[must_use]
    pub const fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// Why a frame produced no update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameRejection {
    /// The landmarks the active exercise needs are not visible enough
    LowConfidence,
    /// The frame does not follow the 33-landmark schema
    Malformed(String),
}

/// A frame whose landmarks are either usable points or absent
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFrame {
    pub timestamp_ms: u64,
    points: [Option<Point>; NUM_POSE_LANDMARKS],
}

impl NormalizedFrame {
    /// Position of a landmark, `None` when it was not visible
    #[must_use]
    pub fn get(&self, landmark: PoseLandmark) -> Option<Point> {
        self.points[landmark.index()]
    }

    /// Whether a landmark passed the visibility check
    #[must_use]
    pub fn is_visible(&self, landmark: PoseLandmark) -> bool {
        self.get(landmark).is_some()
    }

    /// Number of usable landmarks
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }
}

/// Validates raw frames and drops landmarks below the visibility floor
#[derive(Debug, Clone)]
pub struct FrameAdapter {
    min_visibility: f64,
}

impl Default for FrameAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_VISIBILITY)
    }
}

impl FrameAdapter {
    /// Create a frame adapter
    ///
    /// # Panics
    ///
    /// Panics if `min_visibility` is outside [0, 1]
    #[must_use]
    pub fn new(min_visibility: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&min_visibility),
            "Minimum visibility must be in [0, 1], got {}",
            min_visibility
        );
        Self { min_visibility }
    }

    #[must_use]
    pub fn min_visibility(&self) -> f64 {
        self.min_visibility
    }

    /// Normalize a raw frame for an exercise needing `required` landmarks.
    ///
    /// A landmark is kept when its visibility reaches the floor and its
    /// coordinates are finite. The frame is `LowConfidence` when every
    /// required landmark was dropped.
    pub fn adapt(
        &self,
        frame: &PoseFrame,
        required: &[PoseLandmark],
    ) -> std::result::Result<NormalizedFrame, FrameRejection> {
        if frame.landmarks.len() != NUM_POSE_LANDMARKS {
            return Err(FrameRejection::Malformed(format!(
                "Expected {} landmarks, got {}",
                NUM_POSE_LANDMARKS,
                frame.landmarks.len()
            )));
        }

        let mut points = [None; NUM_POSE_LANDMARKS];
        for (slot, landmark) in points.iter_mut().zip(&frame.landmarks) {
            let finite = landmark.x.is_finite() && landmark.y.is_finite() && landmark.z.is_finite();
            // NaN visibility fails this comparison
            if finite && landmark.visibility >= self.min_visibility {
                *slot = Some(landmark.point());
            }
        }

        if !required.is_empty() && required.iter().all(|lm| points[lm.index()].is_none()) {
            return Err(FrameRejection::LowConfidence);
        }

        Ok(NormalizedFrame {
            timestamp_ms: frame.timestamp_ms,
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_visibility(visibility: f64) -> PoseFrame {
        PoseFrame::new(0, vec![Landmark::new(0.5, 0.5, 0.0, visibility); NUM_POSE_LANDMARKS])
    }

    #[test]
    fn test_landmark_indices() {
        assert_eq!(PoseLandmark::Nose.index(), 0);
        assert_eq!(PoseLandmark::LeftShoulder.index(), 11);
        assert_eq!(PoseLandmark::RightHip.index(), 24);
        assert_eq!(PoseLandmark::RightFootIndex.index(), 32);
    }

    #[test]
    fn test_adapt_keeps_visible_landmarks() {
        let adapter = FrameAdapter::default();
        let frame = adapter
            .adapt(&frame_with_visibility(0.9), &[PoseLandmark::LeftElbow])
            .unwrap();
        assert_eq!(frame.visible_count(), NUM_POSE_LANDMARKS);
        assert_eq!(frame.get(PoseLandmark::LeftElbow), Some(Point::new(0.5, 0.5, 0.0)));
    }

    #[test]
    fn test_adapt_low_confidence_when_all_required_hidden() {
        let adapter = FrameAdapter::default();
        let result = adapter.adapt(&frame_with_visibility(0.2), &[PoseLandmark::LeftElbow, PoseLandmark::RightElbow]);
        assert_eq!(result, Err(FrameRejection::LowConfidence));
    }

    #[test]
    fn test_adapt_partial_visibility_is_accepted() {
        let adapter = FrameAdapter::default();
        let mut raw = frame_with_visibility(0.9);
        raw.landmarks[PoseLandmark::LeftElbow.index()].visibility = 0.1;

        let frame = adapter
            .adapt(&raw, &[PoseLandmark::LeftElbow, PoseLandmark::RightElbow])
            .unwrap();
        assert!(!frame.is_visible(PoseLandmark::LeftElbow));
        assert!(frame.is_visible(PoseLandmark::RightElbow));
    }

    #[test]
    fn test_adapt_rejects_wrong_landmark_count() {
        let adapter = FrameAdapter::default();
        let raw = PoseFrame::new(0, vec![Landmark::new(0.0, 0.0, 0.0, 1.0); 17]);
        assert!(matches!(adapter.adapt(&raw, &[]), Err(FrameRejection::Malformed(_))));
    }

    #[test]
    fn test_adapt_drops_non_finite_coordinates() {
        let adapter = FrameAdapter::default();
        let mut raw = frame_with_visibility(1.0);
        raw.landmarks[PoseLandmark::Nose.index()].x = f64::NAN;
        raw.landmarks[PoseLandmark::LeftEye.index()].visibility = f64::NAN;

        let frame = adapter.adapt(&raw, &[]).unwrap();
        assert!(!frame.is_visible(PoseLandmark::Nose));
        assert!(!frame.is_visible(PoseLandmark::LeftEye));
        assert_eq!(frame.visible_count(), NUM_POSE_LANDMARKS - 2);
    }

    #[test]
    #[should_panic(expected = "Minimum visibility must be in [0, 1]")]
    fn test_invalid_min_visibility() {
        let _ = FrameAdapter::new(1.5);
    }
}
