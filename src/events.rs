//! Engine events and their delivery to subscribers.
//!
//! A session emits at most one event of each kind per frame, and only when
//! the observed value changed. Events are returned from
//! [`WorkoutSession::process_frame`](crate::session::WorkoutSession::process_frame)
//! and also pushed, in the same order, to every subscribed
//! [`EventListener`].

use crate::landmarks::PoseFrame;
use log::trace;
use serde::Serialize;

/// How urgent a form message is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Danger,
}

/// Form feedback shown or spoken to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub message: String,
    pub severity: Severity,
}

impl Feedback {
    #[must_use]
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// Observable session change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    RepCountChanged { count: u32 },
    PostureChanged { correct: bool },
    Feedback(Feedback),
    TimeUpdated { seconds: u32 },
}

/// Receives session events; every method defaults to doing nothing
pub trait EventListener: Send {
    fn on_rep_count(&mut self, _count: u32) {}

    /// Called with the frame that completed the posture debounce
    fn on_posture_change(&mut self, _correct: bool, _frame: &PoseFrame) {}

    fn on_form_feedback(&mut self, _feedback: &Feedback) {}

    fn on_time_update(&mut self, _seconds: u32) {}
}

type CountCallback = Box<dyn FnMut(u32) + Send>;
type PostureCallback = Box<dyn FnMut(bool, &PoseFrame) + Send>;
type FeedbackCallback = Box<dyn FnMut(&Feedback) + Send>;

/// Closure-based listener
///
/// ```
/// use workout_pose_engine::events::Callbacks;
///
/// let callbacks = Callbacks::new()
///     .on_rep_count(|count| println!("reps: {count}"))
///     .on_time_update(|seconds| println!("held for {seconds}s"));
/// # drop(callbacks);
/// ```
#[derive(Default)]
pub struct Callbacks {
    rep_count: Option<CountCallback>,
    posture_change: Option<PostureCallback>,
    form_feedback: Option<FeedbackCallback>,
    time_update: Option<CountCallback>,
}

impl Callbacks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_rep_count(mut self, f: impl FnMut(u32) + Send + 'static) -> Self {
        self.rep_count = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_posture_change(mut self, f: impl FnMut(bool, &PoseFrame) + Send + 'static) -> Self {
        self.posture_change = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_form_feedback(mut self, f: impl FnMut(&Feedback) + Send + 'static) -> Self {
        self.form_feedback = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_time_update(mut self, f: impl FnMut(u32) + Send + 'static) -> Self {
        self.time_update = Some(Box::new(f));
        self
    }
}

impl EventListener for Callbacks {
    fn on_rep_count(&mut self, count: u32) {
        if let Some(f) = self.rep_count.as_mut() {
            f(count);
        }
    }

    fn on_posture_change(&mut self, correct: bool, frame: &PoseFrame) {
        if let Some(f) = self.posture_change.as_mut() {
            f(correct, frame);
        }
    }

    fn on_form_feedback(&mut self, feedback: &Feedback) {
        if let Some(f) = self.form_feedback.as_mut() {
            f(feedback);
        }
    }

    fn on_time_update(&mut self, seconds: u32) {
        if let Some(f) = self.time_update.as_mut() {
            f(seconds);
        }
    }
}

/// Collects one frame's events, drops unchanged values and fans out to listeners
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Box<dyn EventListener>>,
    pending: Vec<EngineEvent>,
    last_count: u32,
    last_posture: Option<bool>,
    last_seconds: u32,
}

impl EventDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<dyn EventListener>) {
        self.listeners.push(listener);
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn rep_count(&mut self, count: u32) {
        if count != self.last_count {
            self.last_count = count;
            self.pending.push(EngineEvent::RepCountChanged { count });
        }
    }

    pub fn posture(&mut self, correct: bool) {
        if self.last_posture != Some(correct) {
            self.last_posture = Some(correct);
            self.pending.push(EngineEvent::PostureChanged { correct });
        }
    }

    /// Feedback is rate limited upstream and always queued
    pub fn feedback(&mut self, feedback: Feedback) {
        self.pending.push(EngineEvent::Feedback(feedback));
    }

    pub fn time(&mut self, seconds: u32) {
        if seconds != self.last_seconds {
            self.last_seconds = seconds;
            self.pending.push(EngineEvent::TimeUpdated { seconds });
        }
    }

    /// Deliver queued events for `frame` and hand them back
    pub fn flush(&mut self, frame: &PoseFrame) -> Vec<EngineEvent> {
        let events = std::mem::take(&mut self.pending);
        for event in &events {
            trace!("Frame {} event {:?}", frame.timestamp_ms, event);
            for listener in &mut self.listeners {
                match event {
                    EngineEvent::RepCountChanged { count } => listener.on_rep_count(*count),
                    EngineEvent::PostureChanged { correct } => listener.on_posture_change(*correct, frame),
                    EngineEvent::Feedback(feedback) => listener.on_form_feedback(feedback),
                    EngineEvent::TimeUpdated { seconds } => listener.on_time_update(*seconds),
                }
            }
        }
        events
    }

    /// Forget the last delivered values; listeners stay subscribed
    pub fn reset(&mut self) {
        self.pending.clear();
        self.last_count = 0;
        self.last_posture = None;
        self.last_seconds = 0;
    }
}
