//! Configuration management for the workout pose engine

use crate::constants::{DEFAULT_EXERCISE, DEFAULT_MAX_FRAME_GAP_MS, DEFAULT_MIN_VISIBILITY};
use crate::filters::FilterSpec;
use crate::profiles::ExerciseKind;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Frame intake configuration
    pub frame: FrameConfig,

    /// Rep-channel smoothing configuration
    pub smoothing: SmoothingConfig,

    /// Session defaults
    pub session: SessionConfig,
}

/// Frame intake parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Minimum landmark visibility (0.0-1.0)
    pub min_visibility: f64,

    /// Largest frame delta credited to the hold timer, in milliseconds
    pub max_frame_gap_ms: u64,
}

/// Smoothing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Filter spec, e.g. "none", "median:5", "hampel:5:3.0"
    pub filter: String,
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Exercise selected when a session starts
    pub default_exercise: String,

    /// Emit form feedback messages
    pub feedback_enabled: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            min_visibility: DEFAULT_MIN_VISIBILITY,
            max_frame_gap_ms: DEFAULT_MAX_FRAME_GAP_MS,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            filter: "none".to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_exercise: DEFAULT_EXERCISE.to_string(),
            feedback_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` on malformed YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::Parse(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_yaml()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Serialize configuration to YAML text
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` if serialization fails
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Parse(format!("Failed to serialize config: {e}")))
    }

    /// Parsed smoothing filter
    ///
    /// # Errors
    ///
    /// Returns `Error::FilterError` for an invalid filter spec
    pub fn filter_spec(&self) -> Result<FilterSpec> {
        self.smoothing.filter.parse()
    }

    /// Resolved default exercise
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for an unknown identifier
    pub fn default_exercise(&self) -> Result<ExerciseKind> {
        self.session.default_exercise.parse()
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.frame.min_visibility) {
            return Err(Error::Configuration(
                "Minimum visibility must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.frame.max_frame_gap_ms == 0 {
            return Err(Error::Configuration(
                "Maximum frame gap must be greater than 0".to_string(),
            ));
        }

        self.default_exercise()?;
        self.filter_spec()
            .map_err(|e| Error::Configuration(format!("Invalid smoothing filter: {e}")))?;

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Workout Pose Engine Configuration

# Frame intake
frame:
  # Landmarks below this visibility are treated as missing
  min_visibility: 0.5
  # A single frame never adds more than this to the hold timer
  max_frame_gap_ms: 1000

# Rep-channel smoothing: none, moving_average[:N], median[:N],
# exponential[:alpha], hampel[:N[:threshold]]
smoothing:
  filter: "none"

# Session defaults
session:
  default_exercise: "pushups"
  feedback_enabled: true
"#;
