//! Helper functions for building synthetic pose frames in tests
#![allow(dead_code)]

use workout_pose_engine::constants::NUM_POSE_LANDMARKS;
use workout_pose_engine::{Landmark, PoseFrame, PoseLandmark};

/// Frame with only `points` visible; every other landmark is hidden
pub fn frame_with(timestamp_ms: u64, points: &[(PoseLandmark, f64, f64)]) -> PoseFrame {
    let mut landmarks = vec![Landmark::new(0.0, 0.0, 0.0, 0.0); NUM_POSE_LANDMARKS];
    for &(landmark, x, y) in points {
        landmarks[landmark.index()] = Landmark::new(x, y, 0.0, 0.99);
    }
    PoseFrame::new(timestamp_ms, landmarks)
}

/// Side-on push-up with a straight body and the left elbow at `elbow_deg`
pub fn pushup_points(elbow_deg: f64) -> Vec<(PoseLandmark, f64, f64)> {
    let rad = elbow_deg.to_radians();
    vec![
        (PoseLandmark::LeftShoulder, 0.3, 0.5),
        (PoseLandmark::LeftElbow, 0.3, 0.6),
        (PoseLandmark::LeftWrist, 0.3 + 0.1 * rad.sin(), 0.6 - 0.1 * rad.cos()),
        (PoseLandmark::LeftHip, 0.55, 0.5),
        (PoseLandmark::LeftKnee, 0.7, 0.5),
        (PoseLandmark::LeftAnkle, 0.85, 0.5),
    ]
}

pub fn pushup_frame(timestamp_ms: u64, elbow_deg: f64) -> PoseFrame {
    frame_with(timestamp_ms, &pushup_points(elbow_deg))
}

/// Side-on squat, either standing tall or at the bottom with the hips at knee depth
pub fn squat_frame(timestamp_ms: u64, deep: bool) -> PoseFrame {
    let points = if deep {
        [
            (PoseLandmark::LeftShoulder, 0.45, 0.45),
            (PoseLandmark::LeftHip, 0.4, 0.71),
            (PoseLandmark::LeftKnee, 0.6, 0.7),
            (PoseLandmark::LeftAnkle, 0.6, 0.9),
        ]
    } else {
        [
            (PoseLandmark::LeftShoulder, 0.5, 0.2),
            (PoseLandmark::LeftHip, 0.5, 0.5),
            (PoseLandmark::LeftKnee, 0.5, 0.7),
            (PoseLandmark::LeftAnkle, 0.5, 0.9),
        ]
    };
    frame_with(timestamp_ms, &points)
}

/// Side-on forearm plank; `hip_y` above 0.5 sags the hips
pub fn plank_frame(timestamp_ms: u64, hip_y: f64) -> PoseFrame {
    frame_with(
        timestamp_ms,
        &[
            (PoseLandmark::LeftShoulder, 0.3, 0.5),
            (PoseLandmark::LeftElbow, 0.3, 0.6),
            (PoseLandmark::LeftWrist, 0.15, 0.6),
            (PoseLandmark::LeftHip, 0.55, hip_y),
            (PoseLandmark::LeftKnee, 0.7, 0.5),
            (PoseLandmark::LeftAnkle, 0.85, 0.5),
        ],
    )
}

/// Side plank on the right forearm seen from the front; `hip_dy` drops the hips
pub fn side_plank_frame(timestamp_ms: u64, hip_dy: f64) -> PoseFrame {
    frame_with(
        timestamp_ms,
        &[
            (PoseLandmark::RightEar, 0.98, 0.37),
            (PoseLandmark::RightShoulder, 0.9, 0.4),
            (PoseLandmark::RightElbow, 0.9, 0.55),
            (PoseLandmark::RightWrist, 0.75, 0.55),
            (PoseLandmark::RightHip, 0.5, 0.55 + hip_dy),
            (PoseLandmark::RightAnkle, 0.1, 0.7),
            (PoseLandmark::LeftAnkle, 0.1, 0.68),
            (PoseLandmark::LeftElbow, 0.8, 0.3),
        ],
    )
}

/// Every landmark present but below the visibility floor
pub fn hidden_frame(timestamp_ms: u64) -> PoseFrame {
    PoseFrame::new(
        timestamp_ms,
        vec![Landmark::new(0.5, 0.5, 0.0, 0.2); NUM_POSE_LANDMARKS],
    )
}

/// Encode frames as the JSON lines the replay tool reads
pub fn to_json_lines(frames: &[PoseFrame]) -> String {
    frames
        .iter()
        .map(|frame| serde_json::to_string(frame).unwrap() + "\n")
        .collect()
}
