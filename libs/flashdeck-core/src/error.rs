//! Error types for flashdeck-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised when input from outside the core is malformed.
///
/// The scheduling functions themselves are total; these only surface at the
/// boundary where strings and numbers become core types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid rating: {0}")]
    InvalidRating(String),

    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("quiz score {score} exceeds total questions {total}")]
    InvalidQuizAttempt { score: u32, total: u32 },
}
