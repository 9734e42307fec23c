//! Joint angles and auxiliary geometric signals computed from landmarks.
//!
//! Every function here is pure. Angles are measured in the image plane (`z`
//! ignored) and returned in degrees within [0, 180]; only
//! [`segment_cos_3d`] uses depth. A segment shorter than
//! [`EPSILON`](crate::constants::EPSILON) makes the angle undefined (`None`)
//! while other angles of the same frame are still computed.

use crate::{
    constants::{EPSILON, FULL_TURN_DEG, STRAIGHT_ANGLE_DEG},
    landmarks::{NormalizedFrame, Point, PoseLandmark, Side},
};
use std::collections::BTreeMap;

/// Angle at vertex `b` between the segments towards `a` and `c`, in degrees
#[must_use]
pub fn joint_angle(a: Point, b: Point, c: Point) -> Option<f64> {
    let (ux, uy) = (a.x - b.x, a.y - b.y);
    let (vx, vy) = (c.x - b.x, c.y - b.y);
    let norm_u = ux.hypot(uy);
    let norm_v = vx.hypot(vy);
    if norm_u < EPSILON || norm_v < EPSILON {
        return None;
    }

    let cos = (ux * vx + uy * vy) / (norm_u * norm_v);
    if !cos.is_finite() {
        return None;
    }
    Some(cos.clamp(-1.0, 1.0).acos().to_degrees())
}

/// Cosine between the segments `a -> b` and `b -> c` in 3D.
///
/// A straight chain gives 1.0, a fully folded one -1.0.
#[must_use]
pub fn segment_cos_3d(a: Point, b: Point, c: Point) -> Option<f64> {
    let u = (b.x - a.x, b.y - a.y, b.z - a.z);
    let v = (c.x - b.x, c.y - b.y, c.z - b.z);
    let norm_u = (u.0 * u.0 + u.1 * u.1 + u.2 * u.2).sqrt();
    let norm_v = (v.0 * v.0 + v.1 * v.1 + v.2 * v.2).sqrt();
    if norm_u < EPSILON || norm_v < EPSILON {
        return None;
    }

    let cos = (u.0 * v.0 + u.1 * v.1 + u.2 * v.2) / (norm_u * norm_v);
    cos.is_finite().then(|| cos.clamp(-1.0, 1.0))
}

/// Tilt of the line `a -> b` away from horizontal, in [0, 90] degrees
#[must_use]
pub fn inclination_from_horizontal(a: Point, b: Point) -> Option<f64> {
    let dx = (b.x - a.x).abs();
    let dy = (b.y - a.y).abs();
    if dx.hypot(dy) < EPSILON {
        return None;
    }
    Some(dy.atan2(dx).to_degrees())
}

/// Tilt of the line `a -> b` away from vertical, in [0, 90] degrees
#[must_use]
pub fn inclination_from_vertical(a: Point, b: Point) -> Option<f64> {
    inclination_from_horizontal(a, b).map(|deg| 90.0 - deg)
}

/// Euclidean distance in the image plane
#[must_use]
pub fn distance_2d(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

#[must_use]
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0, (a.z + b.z) / 2.0)
}

/// Vertical offset of `p` from the line through `a` and `b`, taken at `p.x`.
///
/// Positive values mean `p` lies lower in the image than the line.
#[must_use]
pub fn offset_from_line(a: Point, b: Point, p: Point) -> Option<f64> {
    let dx = b.x - a.x;
    if dx.abs() < EPSILON {
        return None;
    }
    let t = (p.x - a.x) / dx;
    Some(p.y - (a.y + t * (b.y - a.y)))
}

/// Map a threshold written on the reflex scale (past a straight joint) back
/// onto the unsigned [0, 180] range.
#[must_use]
pub fn mirror_reflex(deg: f64) -> f64 {
    if deg > STRAIGHT_ANGLE_DEG {
        FULL_TURN_DEG - deg
    } else {
        deg
    }
}

/// Inclusive angle window.
///
/// Upper bounds past 180 degrees come from tuning tables measured on the
/// reflex scale; on the unsigned scale they leave the window open up to a
/// straight joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleBand {
    pub min: f64,
    pub max: f64,
}

impl AngleBand {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, deg: f64) -> bool {
        deg >= self.min && deg <= self.max
    }
}

/// Named per-frame angle signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AngleName {
    /// shoulder - elbow - wrist
    LeftElbow,
    RightElbow,
    /// hip - shoulder - elbow (arm abduction)
    LeftShoulder,
    RightShoulder,
    /// shoulder - hip - knee
    LeftHip,
    RightHip,
    /// hip - knee - ankle
    LeftKnee,
    RightKnee,
    /// shoulder - hip - ankle
    LeftBodyLine,
    RightBodyLine,
    /// ear - shoulder - hip
    LeftNeck,
    RightNeck,
    /// shoulder centre to hip centre, away from vertical
    TorsoTilt,
    /// shoulder centre to ankle centre, away from horizontal
    BodyTilt,
    /// left ankle - hip centre - right ankle
    LegSpread,
}

impl AngleName {
    #[must_use]
    pub const fn elbow(side: Side) -> Self {
        match side {
            Side::Left => AngleName::LeftElbow,
            Side::Right => AngleName::RightElbow,
        }
    }

    #[must_use]
    pub const fn shoulder(side: Side) -> Self {
        match side {
            Side::Left => AngleName::LeftShoulder,
            Side::Right => AngleName::RightShoulder,
        }
    }

    #[must_use]
    pub const fn hip(side: Side) -> Self {
        match side {
            Side::Left => AngleName::LeftHip,
            Side::Right => AngleName::RightHip,
        }
    }

    #[must_use]
    pub const fn knee(side: Side) -> Self {
        match side {
            Side::Left => AngleName::LeftKnee,
            Side::Right => AngleName::RightKnee,
        }
    }

    #[must_use]
    pub const fn body_line(side: Side) -> Self {
        match side {
            Side::Left => AngleName::LeftBodyLine,
            Side::Right => AngleName::RightBodyLine,
        }
    }

    #[must_use]
    pub const fn neck(side: Side) -> Self {
        match side {
            Side::Left => AngleName::LeftNeck,
            Side::Right => AngleName::RightNeck,
        }
    }
}

/// Centre of a left/right landmark pair, or the visible one of the two
#[must_use]
pub fn center(frame: &NormalizedFrame, left: PoseLandmark, right: PoseLandmark) -> Option<Point> {
    match (frame.get(left), frame.get(right)) {
        (Some(l), Some(r)) => Some(midpoint(l, r)),
        (Some(p), None) | (None, Some(p)) => Some(p),
        (None, None) => None,
    }
}

fn angle_of(frame: &NormalizedFrame, a: PoseLandmark, b: PoseLandmark, c: PoseLandmark) -> Option<f64> {
    joint_angle(frame.get(a)?, frame.get(b)?, frame.get(c)?)
}

/// Angles computed for one frame; undefined angles are simply absent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AngleSet {
    values: BTreeMap<AngleName, f64>,
}

impl AngleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute every named angle the frame supports
    #[must_use]
    pub fn from_frame(frame: &NormalizedFrame) -> Self {
        let mut set = Self::new();

        for side in Side::BOTH {
            set.insert(
                AngleName::elbow(side),
                angle_of(frame, side.shoulder(), side.elbow(), side.wrist()),
            );
            set.insert(
                AngleName::shoulder(side),
                angle_of(frame, side.hip(), side.shoulder(), side.elbow()),
            );
            set.insert(
                AngleName::hip(side),
                angle_of(frame, side.shoulder(), side.hip(), side.knee()),
            );
            set.insert(
                AngleName::knee(side),
                angle_of(frame, side.hip(), side.knee(), side.ankle()),
            );
            set.insert(
                AngleName::body_line(side),
                angle_of(frame, side.shoulder(), side.hip(), side.ankle()),
            );
            set.insert(
                AngleName::neck(side),
                angle_of(frame, side.ear(), side.shoulder(), side.hip()),
            );
        }

        let shoulders = center(frame, PoseLandmark::LeftShoulder, PoseLandmark::RightShoulder);
        let hips = center(frame, PoseLandmark::LeftHip, PoseLandmark::RightHip);
        let ankles = center(frame, PoseLandmark::LeftAnkle, PoseLandmark::RightAnkle);

        if let (Some(s), Some(h)) = (shoulders, hips) {
            set.insert(AngleName::TorsoTilt, inclination_from_vertical(h, s));
        }
        if let (Some(s), Some(a)) = (shoulders, ankles) {
            set.insert(AngleName::BodyTilt, inclination_from_horizontal(s, a));
        }
        if let (Some(l), Some(r), Some(h)) = (
            frame.get(PoseLandmark::LeftAnkle),
            frame.get(PoseLandmark::RightAnkle),
            hips,
        ) {
            set.insert(AngleName::LegSpread, joint_angle(l, h, r));
        }

        set
    }

    /// Record an angle; `None` leaves it undefined
    pub fn insert(&mut self, name: AngleName, value: Option<f64>) {
        if let Some(value) = value {
            self.values.insert(name, value);
        }
    }

    #[must_use]
    pub fn get(&self, name: AngleName) -> Option<f64> {
        self.values.get(&name).copied()
    }

    /// Mean of the defined angles among `names`
    #[must_use]
    pub fn mean(&self, names: &[AngleName]) -> Option<f64> {
        let defined: Vec<f64> = names.iter().filter_map(|&n| self.get(n)).collect();
        if defined.is_empty() {
            return None;
        }
        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    }

    /// Smallest defined angle among `names`
    #[must_use]
    pub fn min(&self, names: &[AngleName]) -> Option<f64> {
        names.iter().filter_map(|&n| self.get(n)).reduce(f64::min)
    }

    /// Largest defined angle among `names`
    #[must_use]
    pub fn max(&self, names: &[AngleName]) -> Option<f64> {
        names.iter().filter_map(|&n| self.get(n)).reduce(f64::max)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AngleName, f64)> + '_ {
        self.values.iter().map(|(&name, &value)| (name, value))
    }
}
