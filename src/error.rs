//! Error types for the workout pose engine.
//!
//! Low landmark confidence and degenerate geometry are expected, frequent
//! conditions and are not represented here: they surface as
//! [`FrameRejection`](crate::landmarks::FrameRejection) and undefined angles.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown exercise identifier or invalid configuration value
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Filter specification or parameter error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Configuration file or frame recording could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
