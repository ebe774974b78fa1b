//! Error types for Kollect

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KollectError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Length mismatch: {keys} keys but {values} values")]
    LengthMismatch { keys: usize, values: usize },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KollectError>;
