//! Error handling module for cutsplit

use thiserror::Error;

/// Main error type for cutsplit operations
#[derive(Error, Debug)]
pub enum CutSplitError {
    /// Malformed timestamp text
    #[error("Invalid timestamp: {text}. Expected HH:MM:SS:FF or HH:MM:SS.mmm")]
    InvalidTimestamp { text: String },

    /// EDL yielded zero usable cut ranges
    #[error("No cut ranges found in {path}")]
    NoSegments { path: String },

    /// Cut range with its stop before its start
    #[error("Cut range runs backwards: {start} -> {stop}")]
    InvalidRange { start: String, stop: String },

    /// External media tool invocation failed or is unavailable
    #[error("{tool} failed during {stage}: {message}")]
    ExternalTool {
        tool: String,
        stage: String,
        message: String,
    },

    /// Invalid keyframe configuration
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    /// Tool diagnostics could not be parsed
    #[error("Could not parse duration from tool output for {path}")]
    DurationParse { path: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for cutsplit operations
pub type CutSplitResult<T> = std::result::Result<T, CutSplitError>;
