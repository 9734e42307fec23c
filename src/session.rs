//! One workout session: the frame pipeline and its owned state.
//!
//! Frames flow adapter -> angles -> analyzer -> {rep counter, posture
//! validator, isometric timer} -> event dispatcher. All state is owned by the
//! session and mutated only from [`WorkoutSession::process_frame`] and the
//! control methods, so a host running capture on another thread must hand
//! frames to the session through a single consumer.

use crate::analyzers::{create_analyzer, ExerciseAnalyzer};
use crate::config::Config;
use crate::events::{EngineEvent, EventDispatcher, EventListener};
use crate::filters::{ChannelSmoother, FilterSpec};
use crate::geometry::AngleSet;
use crate::isometric_timer::IsometricTimer;
use crate::landmarks::{FrameAdapter, FrameRejection, PoseFrame};
use crate::posture::{PostureStatus, PostureValidator};
use crate::profiles::{ExerciseKind, ExerciseProfile};
use crate::rep_counter::{Phase, RepCounter};
use crate::Result;
use log::{debug, info, trace};
use serde::Serialize;

/// Snapshot of the session counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub count: u32,
    pub time_sec: u32,
    pub posture_correct: bool,
}

/// Settings that survive exercise switches
#[derive(Debug, Clone)]
struct SessionSettings {
    filter: FilterSpec,
    max_frame_gap_ms: u64,
    feedback_enabled: bool,
}

/// Per-exercise state, rebuilt as a unit on every switch or reset
struct ExerciseState {
    profile: ExerciseProfile,
    analyzer: Box<dyn ExerciseAnalyzer>,
    smoother: ChannelSmoother,
    reps: RepCounter,
    posture: PostureValidator,
    timer: IsometricTimer,
}

impl ExerciseState {
    fn new(kind: ExerciseKind, settings: &SessionSettings) -> Self {
        let profile = kind.profile();
        Self {
            analyzer: create_analyzer(kind),
            smoother: ChannelSmoother::new(settings.filter, profile.rep_rules.channels.len()),
            reps: RepCounter::new(profile.rep_rules.clone()),
            posture: PostureValidator::new(profile.debounce, profile.warning_cooldown_ms)
                .with_warnings(settings.feedback_enabled),
            timer: IsometricTimer::new(settings.max_frame_gap_ms),
            profile,
        }
    }
}

/// Exercise session driven by pose frames
pub struct WorkoutSession {
    adapter: FrameAdapter,
    settings: SessionSettings,
    state: ExerciseState,
    dispatcher: EventDispatcher,
    last_timestamp: Option<u64>,
}

impl WorkoutSession {
    /// Session with default configuration
    #[must_use]
    pub fn new(kind: ExerciseKind) -> Self {
        let settings = SessionSettings {
            filter: FilterSpec::None,
            max_frame_gap_ms: crate::constants::DEFAULT_MAX_FRAME_GAP_MS,
            feedback_enabled: true,
        };
        Self::build(kind, FrameAdapter::default(), settings)
    }

    /// Session configured from `config`, starting on its default exercise
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate
    pub fn from_config(config: &Config) -> Result<Self> {
        let kind = config.default_exercise()?;
        Self::with_config(kind, config)
    }

    /// Session configured from `config`, starting on `kind`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate
    pub fn with_config(kind: ExerciseKind, config: &Config) -> Result<Self> {
        config.validate()?;
        let settings = SessionSettings {
            filter: config.filter_spec()?,
            max_frame_gap_ms: config.frame.max_frame_gap_ms,
            feedback_enabled: config.session.feedback_enabled,
        };
        Ok(Self::build(kind, FrameAdapter::new(config.frame.min_visibility), settings))
    }

    fn build(kind: ExerciseKind, adapter: FrameAdapter, settings: SessionSettings) -> Self {
        info!("Starting {} session", kind.display_name());
        Self {
            adapter,
            state: ExerciseState::new(kind, &settings),
            settings,
            dispatcher: EventDispatcher::new(),
            last_timestamp: None,
        }
    }

    /// Switch exercise by identifier.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for an unknown identifier; the session
    /// then stays on its previous exercise with its state untouched.
    pub fn set_exercise_mode(&mut self, id: &str) -> Result<()> {
        let kind = ExerciseKind::from_id(id)?;
        self.set_exercise(kind);
        Ok(())
    }

    /// Switch exercise; all counters restart even for the same exercise
    pub fn set_exercise(&mut self, kind: ExerciseKind) {
        info!("Switching exercise to {}", kind.display_name());
        self.restart(kind);
    }

    /// Zero the count, posture and timer of the current exercise
    pub fn reset_counter(&mut self) {
        info!("Resetting {} session", self.state.profile.kind.display_name());
        self.restart(self.state.profile.kind);
    }

    fn restart(&mut self, kind: ExerciseKind) {
        self.state = ExerciseState::new(kind, &self.settings);
        self.dispatcher.reset();
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            count: self.state.reps.count(),
            time_sec: self.state.timer.whole_seconds(),
            posture_correct: self.state.posture.is_correct(),
        }
    }

    #[must_use]
    pub fn exercise(&self) -> ExerciseKind {
        self.state.profile.kind
    }

    #[must_use]
    pub fn profile(&self) -> &ExerciseProfile {
        &self.state.profile
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.reps.phase()
    }

    #[must_use]
    pub fn posture_status(&self) -> PostureStatus {
        self.state.posture.status()
    }

    /// Held time in seconds, unrounded
    #[must_use]
    pub fn held_secs(&self) -> f64 {
        self.state.timer.accumulated_secs()
    }

    /// Register a listener for every following event
    pub fn subscribe(&mut self, listener: Box<dyn EventListener>) {
        self.dispatcher.subscribe(listener);
    }

    /// Feed one frame and collect the events it caused
    pub fn process_frame(&mut self, frame: &PoseFrame) -> Vec<EngineEvent> {
        let timestamp = frame.timestamp_ms;
        if self.last_timestamp.is_some_and(|last| timestamp <= last) {
            trace!("Frame {} dropped: timestamp not increasing", timestamp);
            return Vec::new();
        }
        self.last_timestamp = Some(timestamp);

        let normalized = match self.adapter.adapt(frame, &self.state.profile.required_landmarks) {
            Ok(normalized) => normalized,
            Err(FrameRejection::LowConfidence) => {
                trace!("Frame {} skipped: low confidence", timestamp);
                return Vec::new();
            }
            Err(FrameRejection::Malformed(reason)) => {
                debug!("Frame {} skipped: {}", timestamp, reason);
                return Vec::new();
            }
        };

        let angles = AngleSet::from_frame(&normalized);
        let mut signals = self.state.analyzer.analyze(&normalized, angles);
        if signals.is_empty() {
            trace!("Frame {} skipped: no usable signal for {}", timestamp, self.state.analyzer.name());
            return Vec::new();
        }

        let state = &mut self.state;
        state.smoother.apply(&mut signals.channels);

        if let Some(count) = state.reps.update(timestamp, &signals.channels, signals.down_allowed) {
            self.dispatcher.rep_count(count);
        }

        if let Some(check) = signals.posture {
            let update = state.posture.update(timestamp, check);
            if let Some(correct) = update.changed_to {
                self.dispatcher.posture(correct);
            }
            if let Some(feedback) = update.warning {
                self.dispatcher.feedback(feedback);
            }
        }

        if state.profile.is_isometric() {
            state.timer.advance(timestamp, state.posture.is_correct());
            self.dispatcher.time(state.timer.whole_seconds());
        }

        self.dispatcher.flush(frame)
    }
}
