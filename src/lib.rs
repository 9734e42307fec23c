//! Workout pose engine: repetition counting and posture classification from
//! streamed human-pose landmarks.
//!
//! The engine consumes frames of 33 normalized body landmarks (the layout
//! produced by common pose-estimation models, with `y` growing downward) and
//! turns them into exercise events:
//! 1. Landmarks below the visibility floor are treated as missing
//! 2. Joint angles and body-line measures are derived from the visible points
//! 3. An exercise analyzer maps them to rep channels and a posture verdict
//! 4. A hysteresis state machine counts reps, a debounced validator tracks
//!    posture, and isometric exercises accumulate hold time
//! 5. Changes are delivered as [`EngineEvent`]s and to subscribed listeners
//!
//! # Examples
//!
//! ```
//! use workout_pose_engine::{Callbacks, ExerciseKind, Landmark, PoseFrame, WorkoutSession};
//!
//! let mut session = WorkoutSession::new(ExerciseKind::PushUps);
//! session.subscribe(Box::new(Callbacks::new().on_rep_count(|count| println!("reps: {count}"))));
//!
//! // A frame where every landmark is hidden is skipped without events
//! let frame = PoseFrame::new(0, vec![Landmark::new(0.5, 0.5, 0.0, 0.1); 33]);
//! assert!(session.process_frame(&frame).is_empty());
//! assert_eq!(session.stats().count, 0);
//! ```
//!
//! ## Smoothing rep channels
//!
//! ```
//! use workout_pose_engine::filters::create_filter;
//!
//! # fn main() -> workout_pose_engine::Result<()> {
//! let mut filter = create_filter("median:3")?;
//! filter.apply(170.0);
//! filter.apply(20.0);
//! // A single-frame dip does not pass through
//! assert_eq!(filter.apply(168.0), 168.0);
//! # Ok(())
//! # }
//! ```

/// Exercise-specific frame analysis
pub mod analyzers;

/// Recording replay application
pub mod app;

/// Configuration management
pub mod config;

/// Constants used throughout the engine
pub mod constants;

/// Error types and result handling
pub mod error;

/// Session events and listener delivery
pub mod events;

/// Signal filtering algorithms for smoothing rep channels
pub mod filters;

/// Angle and line geometry over landmark positions
pub mod geometry;

/// Hold-time accumulation for isometric exercises
pub mod isometric_timer;

/// Pose landmark model and visibility filtering
pub mod landmarks;

/// Debounced posture classification
pub mod posture;

/// Exercise catalog and per-exercise tuning
pub mod profiles;

/// Multi-channel repetition state machine
pub mod rep_counter;

/// Workout session pipeline
pub mod session;

/// Numeric helpers
pub mod utils;

pub use error::{Error, Result};
pub use events::{Callbacks, EngineEvent, EventListener, Feedback, Severity};
pub use landmarks::{Landmark, PoseFrame, PoseLandmark};
pub use posture::{PostureFault, PostureStatus};
pub use profiles::ExerciseKind;
pub use rep_counter::Phase;
pub use session::{SessionStats, WorkoutSession};
