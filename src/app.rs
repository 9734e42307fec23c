//! Recording replay: drives a [`WorkoutSession`] from JSON-lines input.
//!
//! Each input line is one of
//!
//! - a pose frame: `{"timestamp_ms": 0, "landmarks": [{"x": .., "y": .., "z": .., "visibility": ..}, ..]}`
//! - an exercise switch: `{"set_exercise": "squats"}`
//! - a counter reset: `{"reset": true}`
//!
//! Every emitted event is written as one JSON line, followed by a final
//! `{"stats": {..}}` line once the input is exhausted.

use crate::config::Config;
use crate::landmarks::PoseFrame;
use crate::profiles::ExerciseKind;
use crate::session::{SessionStats, WorkoutSession};
use crate::{Error, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Where recorded frames come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `-` selects standard input
    #[must_use]
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }
}

/// Replay configuration
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    pub input: InputSource,
    /// Overrides the configured default exercise
    pub exercise: Option<String>,
    pub engine: Config,
}

impl ReplayConfig {
    #[must_use]
    pub fn new(input: InputSource, engine: Config) -> Self {
        Self {
            input,
            exercise: None,
            engine,
        }
    }

    #[must_use]
    pub fn with_exercise(mut self, exercise: impl Into<String>) -> Self {
        self.exercise = Some(exercise.into());
        self
    }
}

/// Totals for one replay run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub frames: usize,
    pub skipped_lines: usize,
    pub events: usize,
    pub stats: SessionStats,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplayLine {
    Frame(PoseFrame),
    SetExercise { set_exercise: String },
    Reset { reset: bool },
}

#[derive(Serialize)]
struct StatsLine {
    stats: SessionStats,
}

/// Replays a frame recording through one session
pub struct ReplayApp {
    config: ReplayConfig,
    session: WorkoutSession,
}

impl ReplayApp {
    /// Create a replay application
    ///
    /// # Errors
    ///
    /// Returns an error if the engine configuration is invalid or the
    /// exercise override is unknown
    pub fn new(config: ReplayConfig) -> Result<Self> {
        info!("Initializing replay");
        let kind = match &config.exercise {
            Some(id) => ExerciseKind::from_id(id)?,
            None => config.engine.default_exercise()?,
        };
        let session = WorkoutSession::with_config(kind, &config.engine)?;
        Ok(Self { config, session })
    }

    #[must_use]
    pub fn session(&self) -> &WorkoutSession {
        &self.session
    }

    /// Replay the configured input to standard output
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be opened or output cannot be written
    pub fn run(&mut self) -> Result<ReplaySummary> {
        let stdout = io::stdout();
        let writer = stdout.lock();
        match self.config.input.clone() {
            InputSource::Stdin => {
                info!("Reading frames from standard input");
                let stdin = io::stdin();
                self.replay(stdin.lock(), writer)
            }
            InputSource::File(path) => {
                info!("Reading frames from {}", path.display());
                let file = File::open(&path)?;
                self.replay(BufReader::new(file), writer)
            }
        }
    }

    /// Replay `reader` line by line, writing events to `writer`.
    ///
    /// Lines that fail to decode are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input or writing the output fails
    pub fn replay<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<ReplaySummary> {
        let start_time = Instant::now();
        let mut frames = 0;
        let mut skipped_lines = 0;
        let mut events = 0;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<ReplayLine>(&line) {
                Ok(ReplayLine::Frame(frame)) => {
                    frames += 1;
                    for event in self.session.process_frame(&frame) {
                        write_json_line(&mut writer, &event)?;
                        events += 1;
                    }
                }
                Ok(ReplayLine::SetExercise { set_exercise }) => {
                    if let Err(e) = self.session.set_exercise_mode(&set_exercise) {
                        warn!("Line {}: {}", line_no, e);
                    }
                }
                Ok(ReplayLine::Reset { reset }) => {
                    if reset {
                        self.session.reset_counter();
                    }
                }
                Err(e) => {
                    warn!("Line {}: skipping malformed input: {}", line_no, e);
                    skipped_lines += 1;
                }
            }
        }

        let stats = self.session.stats();
        write_json_line(&mut writer, &StatsLine { stats })?;
        writer.flush()?;

        debug!(
            "Replayed {} frames in {:.3}s",
            frames,
            start_time.elapsed().as_secs_f64()
        );
        info!(
            "Replay finished: {} frames, {} events, {} reps, {}s held",
            frames, events, stats.count, stats.time_sec
        );

        Ok(ReplaySummary {
            frames,
            skipped_lines,
            events,
            stats,
        })
    }
}

fn write_json_line<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<()> {
    let line = serde_json::to_string(value).map_err(|e| Error::Parse(format!("Failed to encode output: {e}")))?;
    writeln!(writer, "{line}")?;
    Ok(())
}
