//! Error types for edmsweep.

use thiserror::Error;

/// Result type alias for edmsweep operations.
pub type Result<T> = std::result::Result<T, EdmSweepError>;

/// Errors that can occur while running sweep diagnostics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EdmSweepError {
    /// A required configuration field is missing or contradictory.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// The sweep specification contains no candidate values.
    #[error("Sweep specification contains no candidate values")]
    EmptySweep,
    /// Multiview cannot form combinations of size E from the candidate columns.
    #[error("Multiview requires at least {needed} candidate columns, got {available}")]
    InsufficientColumns { available: usize, needed: usize },
    /// The Multiview combination count exceeds the configured bound.
    #[error("Combination count {count} exceeds the limit of {limit}")]
    TooManyCombinations { count: u64, limit: u64 },
    /// Observed and predicted sequences are not aligned.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
    /// A failure propagated from the external prediction primitive.
    #[error("Prediction error: {0}")]
    Prediction(String),
}
