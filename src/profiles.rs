//! Exercise catalogue and tuning tables.
//!
//! Every supported exercise resolves to one immutable [`ExerciseProfile`].
//! The per-exercise tables below are static; changing a threshold means a
//! new build, not a runtime setting.

use crate::constants::DEFAULT_WARNING_COOLDOWN_MS;
use crate::geometry::{mirror_reflex, AngleBand};
use crate::landmarks::PoseLandmark;
use crate::posture::Debounce;
use crate::rep_counter::{PhaseThresholds, Quorum, RepRules};
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

pub struct PushUpTuning {
    pub elbow_angle_down: f64,
    pub elbow_angle_up: f64,
    /// shoulder - hip - ankle
    pub back_alignment: AngleBand,
    pub min_rep_ms: u64,
    pub warning_cooldown_ms: u64,
}

pub const PUSHUP: PushUpTuning = PushUpTuning {
    elbow_angle_down: 95.0,
    elbow_angle_up: 155.0,
    back_alignment: AngleBand::new(150.0, 210.0),
    min_rep_ms: 300,
    warning_cooldown_ms: DEFAULT_WARNING_COOLDOWN_MS,
};

/// Wrist span relative to shoulder span, for the push-up width variants
pub struct HandPlacementTuning {
    pub wide_min_ratio: f64,
    pub narrow_max_ratio: f64,
    pub diamond_max_ratio: f64,
    /// Below this shoulder span the body is side-on and widths are meaningless
    pub min_shoulder_span: f64,
}

pub const HAND_PLACEMENT: HandPlacementTuning = HandPlacementTuning {
    wide_min_ratio: 1.5,
    narrow_max_ratio: 1.1,
    diamond_max_ratio: 0.5,
    min_shoulder_span: 0.05,
};

pub struct PlankTuning {
    pub back_alignment: AngleBand,
    /// |cos| of the 3D shoulder -> hip -> ankle chain
    pub straight_abs_cos_min: f64,
    /// Tilt of the shoulder -> ankle line from horizontal
    pub horiz_max_deg: f64,
    pub knee_min_deg: f64,
    /// Elbow lock for the straight-arm variants
    pub straight_arm_elbow_min_deg: f64,
    pub warning_cooldown_ms: u64,
}

pub const PLANK: PlankTuning = PlankTuning {
    back_alignment: AngleBand::new(120.0, 260.0),
    straight_abs_cos_min: 0.90,
    horiz_max_deg: 35.0,
    knee_min_deg: 150.0,
    straight_arm_elbow_min_deg: 150.0,
    warning_cooldown_ms: DEFAULT_WARNING_COOLDOWN_MS,
};

pub struct SidePlankTuning {
    /// Supporting elbow, shoulder - elbow - wrist
    pub elbow_support: AngleBand,
    /// shoulder - hip - ankle
    pub torso: AngleBand,
    pub hip_sag_threshold: f64,
    pub hip_hike_threshold: f64,
    pub elbow_alignment_threshold: f64,
    pub feet_stacking_threshold: f64,
    /// ear - shoulder - hip
    pub head_neck: AngleBand,
    pub debounce: Debounce,
    pub warning_cooldown_ms: u64,
}

pub const SIDE_PLANK: SidePlankTuning = SidePlankTuning {
    elbow_support: AngleBand::new(80.0, 100.0),
    torso: AngleBand::new(160.0, 200.0),
    hip_sag_threshold: 0.05,
    hip_hike_threshold: 0.05,
    elbow_alignment_threshold: 0.08,
    feet_stacking_threshold: 0.1,
    head_neck: AngleBand::new(160.0, 200.0),
    debounce: Debounce {
        good_frames: 3,
        bad_frames: 4,
    },
    warning_cooldown_ms: DEFAULT_WARNING_COOLDOWN_MS,
};

pub struct SquatTuning {
    pub knee_angle_down: f64,
    /// Reflex-scale value; read through [`mirror_reflex`]
    pub knee_angle_up: f64,
    /// Hip centre must sit this far below the knee centre to enter `Down`
    pub hip_below_knee_min: f64,
    /// Hip extension required once standing
    pub hip_angle_min: f64,
    pub torso_tilt: AngleBand,
    pub min_rep_ms: u64,
    pub warning_cooldown_ms: u64,
}

pub const SQUAT: SquatTuning = SquatTuning {
    knee_angle_down: 120.0,
    knee_angle_up: 200.0,
    hip_below_knee_min: 0.001,
    hip_angle_min: 135.0,
    torso_tilt: AngleBand::new(0.0, 65.0),
    min_rep_ms: 400,
    warning_cooldown_ms: DEFAULT_WARNING_COOLDOWN_MS,
};

pub struct LungeTuning {
    pub front_knee_angle_down: f64,
    pub front_knee_angle_up: f64,
    pub back_knee_angle_down: f64,
    pub back_knee_angle_up: f64,
    pub hip_below_front_knee_min: f64,
    pub torso_tilt_max: f64,
    pub min_rep_ms: u64,
    pub warning_cooldown_ms: u64,
}

pub const LUNGES: LungeTuning = LungeTuning {
    front_knee_angle_down: 100.0,
    front_knee_angle_up: 170.0,
    back_knee_angle_down: 110.0,
    back_knee_angle_up: 160.0,
    hip_below_front_knee_min: 0.001,
    torso_tilt_max: 60.0,
    min_rep_ms: 400,
    warning_cooldown_ms: DEFAULT_WARNING_COOLDOWN_MS,
};

pub struct JumpingJackTuning {
    /// hip - shoulder - elbow
    pub shoulder_abduction_down: f64,
    pub shoulder_abduction_up: f64,
    /// left ankle - hip centre - right ankle
    pub hip_abduction_down: f64,
    pub hip_abduction_up: f64,
    pub min_rep_ms: u64,
    /// Largest left/right arm difference still counted as symmetric
    pub arm_symmetry_max_deg: f64,
    pub warning_cooldown_ms: u64,
}

pub const JUMPING_JACKS: JumpingJackTuning = JumpingJackTuning {
    shoulder_abduction_down: 60.0,
    shoulder_abduction_up: 120.0,
    hip_abduction_down: 25.0,
    hip_abduction_up: 30.0,
    min_rep_ms: 1000,
    arm_symmetry_max_deg: 45.0,
    warning_cooldown_ms: DEFAULT_WARNING_COOLDOWN_MS,
};

pub struct BurpeeTuning {
    /// Torso tilt from vertical at or above which the body is in the plank
    pub torso_tilt_down: f64,
    /// Torso tilt at or below which the user is standing again
    pub torso_tilt_up: f64,
    pub plank_body_line_min: f64,
    pub min_rep_ms: u64,
    pub warning_cooldown_ms: u64,
}

pub const BURPEES: BurpeeTuning = BurpeeTuning {
    torso_tilt_down: 60.0,
    torso_tilt_up: 30.0,
    plank_body_line_min: 140.0,
    min_rep_ms: 500,
    warning_cooldown_ms: DEFAULT_WARNING_COOLDOWN_MS,
};

pub struct SitUpTuning {
    /// shoulder - hip - knee when lying back
    pub hip_angle_down: f64,
    /// shoulder - hip - knee when sitting up
    pub hip_angle_up: f64,
    pub knee_bend: AngleBand,
    pub min_rep_ms: u64,
    pub warning_cooldown_ms: u64,
}

pub const SITUPS: SitUpTuning = SitUpTuning {
    hip_angle_down: 130.0,
    hip_angle_up: 70.0,
    knee_bend: AngleBand::new(40.0, 120.0),
    min_rep_ms: 400,
    warning_cooldown_ms: DEFAULT_WARNING_COOLDOWN_MS,
};

pub struct HighKneesTuning {
    /// shoulder - hip - knee of a raised leg
    pub hip_angle_up: f64,
    /// shoulder - hip - knee of a planted leg
    pub hip_angle_down: f64,
    pub torso_tilt_max: f64,
    pub min_rep_ms: u64,
    pub warning_cooldown_ms: u64,
}

pub const HIGH_KNEES: HighKneesTuning = HighKneesTuning {
    hip_angle_up: 110.0,
    hip_angle_down: 150.0,
    torso_tilt_max: 30.0,
    min_rep_ms: 150,
    warning_cooldown_ms: DEFAULT_WARNING_COOLDOWN_MS,
};

/// Supported exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExerciseKind {
    PushUps,
    WidePushUps,
    NarrowPushUps,
    DiamondPushUps,
    KneePushUps,
    Plank,
    StraightArmPlank,
    KneePlank,
    ReverseStraightArmPlank,
    SidePlank,
    Squats,
    Lunges,
    JumpingJacks,
    Burpees,
    SitUps,
    HighKnees,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 16] = [
        ExerciseKind::PushUps,
        ExerciseKind::WidePushUps,
        ExerciseKind::NarrowPushUps,
        ExerciseKind::DiamondPushUps,
        ExerciseKind::KneePushUps,
        ExerciseKind::Plank,
        ExerciseKind::StraightArmPlank,
        ExerciseKind::KneePlank,
        ExerciseKind::ReverseStraightArmPlank,
        ExerciseKind::SidePlank,
        ExerciseKind::Squats,
        ExerciseKind::Lunges,
        ExerciseKind::JumpingJacks,
        ExerciseKind::Burpees,
        ExerciseKind::SitUps,
        ExerciseKind::HighKnees,
    ];

    /// Canonical identifier
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            ExerciseKind::PushUps => "pushups",
            ExerciseKind::WidePushUps => "widepushups",
            ExerciseKind::NarrowPushUps => "narrowpushups",
            ExerciseKind::DiamondPushUps => "diamondpushups",
            ExerciseKind::KneePushUps => "kneepushups",
            ExerciseKind::Plank => "plank",
            ExerciseKind::StraightArmPlank => "straightarmplank",
            ExerciseKind::KneePlank => "kneeplank",
            ExerciseKind::ReverseStraightArmPlank => "reversestraightarmplank",
            ExerciseKind::SidePlank => "sideplank",
            ExerciseKind::Squats => "squats",
            ExerciseKind::Lunges => "lunges",
            ExerciseKind::JumpingJacks => "jumpingjacks",
            ExerciseKind::Burpees => "burpees",
            ExerciseKind::SitUps => "situps",
            ExerciseKind::HighKnees => "highknees",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            ExerciseKind::PushUps => "Push-Ups",
            ExerciseKind::WidePushUps => "Wide Push-Ups",
            ExerciseKind::NarrowPushUps => "Narrow Push-Ups",
            ExerciseKind::DiamondPushUps => "Diamond Push-Ups",
            ExerciseKind::KneePushUps => "Knee Push-Ups",
            ExerciseKind::Plank => "Plank",
            ExerciseKind::StraightArmPlank => "Straight-Arm Plank",
            ExerciseKind::KneePlank => "Knee Plank",
            ExerciseKind::ReverseStraightArmPlank => "Reverse Straight-Arm Plank",
            ExerciseKind::SidePlank => "Side Plank",
            ExerciseKind::Squats => "Squats",
            ExerciseKind::Lunges => "Lunges",
            ExerciseKind::JumpingJacks => "Jumping Jacks",
            ExerciseKind::Burpees => "Burpees",
            ExerciseKind::SitUps => "Sit-Ups",
            ExerciseKind::HighKnees => "High Knees",
        }
    }

    /// Held for time rather than counted
    #[must_use]
    pub const fn is_isometric(self) -> bool {
        matches!(
            self,
            ExerciseKind::Plank
                | ExerciseKind::StraightArmPlank
                | ExerciseKind::KneePlank
                | ExerciseKind::ReverseStraightArmPlank
                | ExerciseKind::SidePlank
        )
    }

    /// Resolve an identifier: case and non-letters are ignored, and the
    /// singular form of a plural name is accepted
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for an unknown identifier
    pub fn from_id(id: &str) -> Result<Self> {
        let normalized: String = id
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let plural = format!("{normalized}s");

        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == normalized || (!normalized.is_empty() && kind.id() == plural))
            .ok_or_else(|| Error::Configuration(format!("Unknown exercise: '{id}'")))
    }

    #[must_use]
    pub fn profile(self) -> ExerciseProfile {
        ExerciseProfile::for_kind(self)
    }
}

impl FromStr for ExerciseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_id(s)
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Parameters the generic session machinery needs for one exercise
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseProfile {
    pub kind: ExerciseKind,
    /// Empty channels for isometric exercises
    pub rep_rules: RepRules,
    pub debounce: Debounce,
    pub warning_cooldown_ms: u64,
    /// The frame is low-confidence when none of these is visible
    pub required_landmarks: Vec<PoseLandmark>,
}

use PoseLandmark as L;

const ARMS: [PoseLandmark; 6] = [
    L::LeftShoulder,
    L::RightShoulder,
    L::LeftElbow,
    L::RightElbow,
    L::LeftWrist,
    L::RightWrist,
];
const BODY_LINE: [PoseLandmark; 6] = [
    L::LeftShoulder,
    L::RightShoulder,
    L::LeftHip,
    L::RightHip,
    L::LeftAnkle,
    L::RightAnkle,
];
const KNEELING_LINE: [PoseLandmark; 6] = [
    L::LeftShoulder,
    L::RightShoulder,
    L::LeftHip,
    L::RightHip,
    L::LeftKnee,
    L::RightKnee,
];
const LEGS: [PoseLandmark; 6] = [L::LeftHip, L::RightHip, L::LeftKnee, L::RightKnee, L::LeftAnkle, L::RightAnkle];

impl ExerciseProfile {
    #[must_use]
    pub fn for_kind(kind: ExerciseKind) -> Self {
        let mut debounce = Debounce::default();
        let (rep_rules, warning_cooldown_ms, required_landmarks) = match kind {
            ExerciseKind::PushUps
            | ExerciseKind::WidePushUps
            | ExerciseKind::NarrowPushUps
            | ExerciseKind::DiamondPushUps
            | ExerciseKind::KneePushUps => (
                RepRules::single(PhaseThresholds::closing(PUSHUP.elbow_angle_down, PUSHUP.elbow_angle_up))
                    .with_min_rep_ms(PUSHUP.min_rep_ms),
                PUSHUP.warning_cooldown_ms,
                ARMS.to_vec(),
            ),
            ExerciseKind::Plank | ExerciseKind::StraightArmPlank | ExerciseKind::ReverseStraightArmPlank => {
                (RepRules::default(), PLANK.warning_cooldown_ms, BODY_LINE.to_vec())
            }
            ExerciseKind::KneePlank => (RepRules::default(), PLANK.warning_cooldown_ms, KNEELING_LINE.to_vec()),
            ExerciseKind::SidePlank => {
                debounce = SIDE_PLANK.debounce;
                let mut required = BODY_LINE.to_vec();
                required.extend([L::LeftElbow, L::RightElbow]);
                (RepRules::default(), SIDE_PLANK.warning_cooldown_ms, required)
            }
            ExerciseKind::Squats => (
                RepRules::single(PhaseThresholds::closing(
                    SQUAT.knee_angle_down,
                    mirror_reflex(SQUAT.knee_angle_up),
                ))
                .with_min_rep_ms(SQUAT.min_rep_ms),
                SQUAT.warning_cooldown_ms,
                LEGS.to_vec(),
            ),
            ExerciseKind::Lunges => (
                RepRules::multi(vec![
                    PhaseThresholds::closing(LUNGES.front_knee_angle_down, LUNGES.front_knee_angle_up),
                    PhaseThresholds::closing(LUNGES.back_knee_angle_down, LUNGES.back_knee_angle_up),
                ])
                .with_min_rep_ms(LUNGES.min_rep_ms),
                LUNGES.warning_cooldown_ms,
                LEGS.to_vec(),
            ),
            ExerciseKind::JumpingJacks => {
                let arm = PhaseThresholds::closing(
                    JUMPING_JACKS.shoulder_abduction_down,
                    JUMPING_JACKS.shoulder_abduction_up,
                );
                let legs =
                    PhaseThresholds::closing(JUMPING_JACKS.hip_abduction_down, JUMPING_JACKS.hip_abduction_up);
                let mut required = BODY_LINE.to_vec();
                required.extend([L::LeftElbow, L::RightElbow]);
                (
                    RepRules::multi(vec![arm, arm, legs]).with_min_interval_ms(JUMPING_JACKS.min_rep_ms),
                    JUMPING_JACKS.warning_cooldown_ms,
                    required,
                )
            }
            ExerciseKind::Burpees => (
                RepRules::single(PhaseThresholds::opening(BURPEES.torso_tilt_down, BURPEES.torso_tilt_up))
                    .with_min_rep_ms(BURPEES.min_rep_ms),
                BURPEES.warning_cooldown_ms,
                BODY_LINE.to_vec(),
            ),
            ExerciseKind::SitUps => (
                RepRules::single(PhaseThresholds::opening(SITUPS.hip_angle_down, SITUPS.hip_angle_up))
                    .with_min_rep_ms(SITUPS.min_rep_ms),
                SITUPS.warning_cooldown_ms,
                KNEELING_LINE.to_vec(),
            ),
            ExerciseKind::HighKnees => {
                let leg = PhaseThresholds::opening(HIGH_KNEES.hip_angle_down, HIGH_KNEES.hip_angle_up);
                (
                    RepRules::multi(vec![leg, leg])
                        .with_quorum(Quorum::All, Quorum::Any)
                        .with_min_rep_ms(HIGH_KNEES.min_rep_ms),
                    HIGH_KNEES.warning_cooldown_ms,
                    KNEELING_LINE.to_vec(),
                )
            }
        };

        Self {
            kind,
            rep_rules,
            debounce,
            warning_cooldown_ms,
            required_landmarks,
        }
    }

    #[must_use]
    pub fn is_isometric(&self) -> bool {
        self.kind.is_isometric()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_normalisation() {
        assert_eq!(ExerciseKind::from_id("pushups").unwrap(), ExerciseKind::PushUps);
        assert_eq!(ExerciseKind::from_id("Push-Ups").unwrap(), ExerciseKind::PushUps);
        assert_eq!(ExerciseKind::from_id("push up").unwrap(), ExerciseKind::PushUps);
        assert_eq!(ExerciseKind::from_id("Side Plank").unwrap(), ExerciseKind::SidePlank);
        assert_eq!(ExerciseKind::from_id("squat").unwrap(), ExerciseKind::Squats);
        assert_eq!("JUMPING_JACKS".parse::<ExerciseKind>().unwrap(), ExerciseKind::JumpingJacks);
    }

    #[test]
    fn test_unknown_identifier_is_configuration_error() {
        for id in ["", "yoga", "plankss", "s"] {
            assert!(
                matches!(ExerciseKind::from_id(id), Err(Error::Configuration(_))),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_ids_round_trip() {
        for kind in ExerciseKind::ALL {
            assert_eq!(ExerciseKind::from_id(kind.id()).unwrap(), kind);
            assert_eq!(kind.to_string().parse::<ExerciseKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_isometric_profiles_do_not_count() {
        for kind in ExerciseKind::ALL {
            let profile = kind.profile();
            assert_eq!(profile.is_isometric(), !profile.rep_rules.is_counting(), "{kind}");
            assert!(!profile.required_landmarks.is_empty());
            assert_eq!(profile.warning_cooldown_ms, 2000);
        }
    }

    #[test]
    fn test_squat_up_threshold_is_mirrored() {
        let profile = ExerciseKind::Squats.profile();
        assert_eq!(profile.rep_rules.channels[0], PhaseThresholds::closing(120.0, 160.0));
    }

    #[test]
    fn test_side_plank_debounce() {
        assert_eq!(
            ExerciseKind::SidePlank.profile().debounce,
            Debounce {
                good_frames: 3,
                bad_frames: 4
            }
        );
        assert_eq!(ExerciseKind::Plank.profile().debounce, Debounce::default());
    }

    #[test]
    fn test_jumping_jacks_rules() {
        let rules = ExerciseKind::JumpingJacks.profile().rep_rules;
        assert_eq!(rules.channels.len(), 3);
        assert_eq!(rules.min_interval_ms, 1000);
        assert_eq!((rules.down_quorum, rules.up_quorum), (Quorum::All, Quorum::All));
    }
}
