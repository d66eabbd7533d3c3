//! Error types for the flow-field core.

use thiserror::Error;

/// Errors produced while building or exporting a sketch.
///
/// Nothing inside a frame can fail; these cover construction-time validation
/// and the I/O at the edges of the system.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero, overflowed, or the canvas is smaller than one grid cell.
    #[error("invalid dimensions: width and height must be non-zero and at least one cell on each side")]
    InvalidDimensions,

    /// A parameter had a value the sketch cannot run with.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The registry has no engine under the requested name.
    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    /// A seed file was read but is not a valid seed description.
    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Writing a snapshot or seed file failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidParameter`].
    pub fn invalid_param(name: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
