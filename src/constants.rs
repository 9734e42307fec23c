//! Constants used throughout the engine

/// Number of landmarks in the body pose schema (0 = nose ... 32 = right foot index)
pub const NUM_POSE_LANDMARKS: usize = 33;

/// Default minimum landmark visibility accepted by the frame adapter
pub const DEFAULT_MIN_VISIBILITY: f64 = 0.5;

/// Largest single frame delta credited to the isometric timer
pub const DEFAULT_MAX_FRAME_GAP_MS: u64 = 1000;

/// Default minimum time between two feedback messages
pub const DEFAULT_WARNING_COOLDOWN_MS: u64 = 2000;

/// Default consecutive aligned frames before posture is confirmed correct
pub const DEFAULT_POSTURE_GOOD_FRAMES: u32 = 2;

/// Default consecutive faulty frames before posture is confirmed incorrect
pub const DEFAULT_POSTURE_BAD_FRAMES: u32 = 3;

/// Default minimum dwell in the down phase before an up crossing counts
pub const DEFAULT_MIN_REP_MS: u64 = 250;

/// Default exercise identifier for a new session
pub const DEFAULT_EXERCISE: &str = "pushups";

/// A straight joint, in degrees
pub const STRAIGHT_ANGLE_DEG: f64 = 180.0;

/// Full turn, in degrees
pub const FULL_TURN_DEG: f64 = 360.0;

/// Vector length below which a segment is treated as degenerate
pub const EPSILON: f64 = 1e-10;

/// Default window sizes for filters
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 3;
pub const DEFAULT_MEDIAN_WINDOW: usize = 3;
pub const DEFAULT_HAMPEL_WINDOW: usize = 5;

/// Largest accepted smoothing window, in frames
pub const MAX_FILTER_WINDOW: usize = 101;

/// Default filter parameters
pub const DEFAULT_EXPONENTIAL_ALPHA: f64 = 0.5;
pub const DEFAULT_HAMPEL_THRESHOLD: f64 = 3.0;

/// Scale factor turning a median absolute deviation into a standard deviation estimate
pub const MAD_SCALE: f64 = 1.4826;
