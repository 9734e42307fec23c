//! Repetition state machine.
//!
//! Each rep channel (one monitored angle, e.g. an elbow or one leg) is
//! classified against its own down/up triggers. The gap between the two
//! triggers is a hysteresis band: a value inside it leaves the channel where
//! it was. The overall phase moves to `Down` once the down quorum of channels
//! is down, and back to `Up` once the up quorum is up; only that
//! `Down -> Up` move counts a repetition.

use crate::constants::DEFAULT_MIN_REP_MS;
use log::debug;

/// Half-cycle of a repeated movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Unknown,
    Down,
    Up,
}

/// Condition that puts a channel into a phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    /// Value at or below the threshold
    AtOrBelow(f64),
    /// Value at or above the threshold
    AtOrAbove(f64),
}

impl Trigger {
    #[must_use]
    pub fn is_met(&self, value: f64) -> bool {
        match *self {
            Trigger::AtOrBelow(threshold) => value <= threshold,
            Trigger::AtOrAbove(threshold) => value >= threshold,
        }
    }
}

/// Down and up triggers of one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseThresholds {
    pub down: Trigger,
    pub up: Trigger,
}

impl PhaseThresholds {
    /// Channel that goes down when the angle closes and up when it opens
    #[must_use]
    pub const fn closing(down_at_or_below: f64, up_at_or_above: f64) -> Self {
        Self {
            down: Trigger::AtOrBelow(down_at_or_below),
            up: Trigger::AtOrAbove(up_at_or_above),
        }
    }

    /// Channel that goes down when the angle opens and up when it closes
    #[must_use]
    pub const fn opening(down_at_or_above: f64, up_at_or_below: f64) -> Self {
        Self {
            down: Trigger::AtOrAbove(down_at_or_above),
            up: Trigger::AtOrBelow(up_at_or_below),
        }
    }

    fn classify(&self, value: f64) -> Option<Phase> {
        if self.down.is_met(value) {
            Some(Phase::Down)
        } else if self.up.is_met(value) {
            Some(Phase::Up)
        } else {
            None
        }
    }
}

/// How many channels must agree before the overall phase changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quorum {
    All,
    Any,
}

impl Quorum {
    fn is_reached(self, states: &[Phase], wanted: Phase) -> bool {
        match self {
            Quorum::All => !states.is_empty() && states.iter().all(|&s| s == wanted),
            Quorum::Any => states.iter().any(|&s| s == wanted),
        }
    }
}

/// Counting rules of an exercise
#[derive(Debug, Clone, PartialEq)]
pub struct RepRules {
    pub channels: Vec<PhaseThresholds>,
    pub down_quorum: Quorum,
    pub up_quorum: Quorum,
    /// Minimum time spent after entering `Down` before the up move counts
    pub min_rep_ms: u64,
    /// Minimum time between two counted repetitions
    pub min_interval_ms: u64,
}

impl Default for RepRules {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            down_quorum: Quorum::All,
            up_quorum: Quorum::All,
            min_rep_ms: DEFAULT_MIN_REP_MS,
            min_interval_ms: 0,
        }
    }
}

impl RepRules {
    /// Rules for one monitored angle
    #[must_use]
    pub fn single(thresholds: PhaseThresholds) -> Self {
        Self::multi(vec![thresholds])
    }

    /// Rules for several limbs that must all agree
    #[must_use]
    pub fn multi(channels: Vec<PhaseThresholds>) -> Self {
        Self {
            channels,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_quorum(mut self, down: Quorum, up: Quorum) -> Self {
        self.down_quorum = down;
        self.up_quorum = up;
        self
    }

    #[must_use]
    pub fn with_min_rep_ms(mut self, min_rep_ms: u64) -> Self {
        self.min_rep_ms = min_rep_ms;
        self
    }

    #[must_use]
    pub fn with_min_interval_ms(mut self, min_interval_ms: u64) -> Self {
        self.min_interval_ms = min_interval_ms;
        self
    }

    /// Whether this exercise counts repetitions at all
    #[must_use]
    pub fn is_counting(&self) -> bool {
        !self.channels.is_empty()
    }
}

/// Mutable counter state, reset as a whole
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepCounterState {
    pub phase: Phase,
    pub count: u32,
    pub last_transition_at: Option<u64>,
    pub last_rep_at: Option<u64>,
}

/// Phase tracker and repetition counter for one session
#[derive(Debug, Clone)]
pub struct RepCounter {
    rules: RepRules,
    channel_states: Vec<Phase>,
    state: RepCounterState,
}

impl RepCounter {
    #[must_use]
    pub fn new(rules: RepRules) -> Self {
        let channel_states = vec![Phase::Unknown; rules.channels.len()];
        Self {
            rules,
            channel_states,
            state: RepCounterState::default(),
        }
    }

    #[must_use]
    pub fn rules(&self) -> &RepRules {
        &self.rules
    }

    #[must_use]
    pub fn state(&self) -> &RepCounterState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    #[must_use]
    pub fn count(&self) -> u32 {
        self.state.count
    }

    /// Per-channel phases after the last update
    #[must_use]
    pub fn channel_phases(&self) -> &[Phase] {
        &self.channel_states
    }

    /// Feed one frame of channel values.
    ///
    /// `values` lines up with the rule channels; an undefined value leaves its
    /// channel unchanged. `down_allowed` gates the move into `Down` (depth
    /// requirements). Returns the new count when a repetition completed.
    pub fn update(&mut self, timestamp_ms: u64, values: &[Option<f64>], down_allowed: bool) -> Option<u32> {
        if !values.iter().any(Option::is_some) {
            return None;
        }

        for (state, (thresholds, value)) in self
            .channel_states
            .iter_mut()
            .zip(self.rules.channels.iter().zip(values))
        {
            if let Some(phase) = value.and_then(|v| thresholds.classify(v)) {
                *state = phase;
            }
        }

        let down = self.rules.down_quorum.is_reached(&self.channel_states, Phase::Down);
        let up = self.rules.up_quorum.is_reached(&self.channel_states, Phase::Up);

        match self.state.phase {
            Phase::Unknown | Phase::Up if down && down_allowed => {
                self.transition(Phase::Down, timestamp_ms);
                None
            }
            Phase::Unknown if up => {
                self.transition(Phase::Up, timestamp_ms);
                None
            }
            Phase::Down if up => {
                if !self.timing_allows_rep(timestamp_ms) {
                    debug!("Up crossing at {} ms ignored: repetition too fast", timestamp_ms);
                    return None;
                }
                self.transition(Phase::Up, timestamp_ms);
                self.state.count += 1;
                self.state.last_rep_at = Some(timestamp_ms);
                debug!("Repetition {} completed at {} ms", self.state.count, timestamp_ms);
                Some(self.state.count)
            }
            _ => None,
        }
    }

    /// Forget all progress
    pub fn reset(&mut self) {
        self.channel_states.fill(Phase::Unknown);
        self.state = RepCounterState::default();
    }

    fn transition(&mut self, phase: Phase, timestamp_ms: u64) {
        debug!("Phase {:?} -> {:?} at {} ms", self.state.phase, phase, timestamp_ms);
        self.state.phase = phase;
        self.state.last_transition_at = Some(timestamp_ms);
    }

    fn timing_allows_rep(&self, timestamp_ms: u64) -> bool {
        let dwell_ok = self
            .state
            .last_transition_at
            .map_or(true, |t| timestamp_ms.saturating_sub(t) >= self.rules.min_rep_ms);
        let interval_ok = self
            .state
            .last_rep_at
            .map_or(true, |t| timestamp_ms.saturating_sub(t) >= self.rules.min_interval_ms);
        dwell_ok && interval_ok
    }
}
