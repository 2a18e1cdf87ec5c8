//! Error types for benchmark generation.
//!
//! An operator returning an unspecified result is not an error; it is an
//! `eval::Outcome::Unspecified` and every operator family decides what to do
//! with it. Everything here aborts the run.

use std::io;

/// Type alias for generator results
pub type GenResult<T> = Result<T, GenError>;

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Configuration file error: {0}")]
    Json(#[from] serde_json::Error),

    /// The evaluator was handed something it cannot give a verdict on. This
    /// means an operand escaped its class or the catalog is inconsistent.
    #[error("Evaluation failed: {0}")]
    Evaluation(String),

    #[error("Construction failed: {0}")]
    Construction(String),
}

impl GenError {
    pub fn evaluation(msg: impl Into<String>) -> Self {
        GenError::Evaluation(msg.into())
    }

    pub fn construction(msg: impl Into<String>) -> Self {
        GenError::Construction(msg.into())
    }
}
