//! Error types for kge-nn.

use thiserror::Error;

/// The main error type for model construction and scoring.
#[derive(Debug, Error)]
pub enum KgeError {
    /// Candle tensor operation failed
    #[error("tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    /// Invalid configuration value
    #[error("config error: {0}")]
    Config(String),

    /// Shape mismatch
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// An entity or relation id outside the table
    #[error("{kind} id {index} out of range (table has {bound} rows)")]
    IndexOutOfRange {
        kind: &'static str,
        index: i64,
        bound: usize,
    },

    /// A parameter name registered twice
    #[error("duplicate parameter: {0}")]
    DuplicateParameter(String),

    /// Random initialisation failed
    #[error("init error: {0}")]
    Init(String),
}

/// Result type for kge-nn operations.
pub type Result<T> = std::result::Result<T, KgeError>;
