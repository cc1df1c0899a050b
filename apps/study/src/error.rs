//! Error handling for the study service.

use thiserror::Error;

use crate::db::DbError;
use crate::generate::GenerateError;
use flashdeck_core::CoreError;

#[derive(Debug, Error)]
pub enum StudyError {
    #[error("database error: {0}")]
    Database(#[from] DbError),

    /// The rating was applied to the session but could not be stored.
    #[error("failed to persist review of card {card_id}: {source}")]
    Persist {
        card_id: String,
        #[source]
        source: DbError,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("card count must be between {min} and {max}, got {count}")]
    InvalidCardCount { count: u32, min: u32, max: u32 },
}

/// Result type alias for study operations.
pub type Result<T> = std::result::Result<T, StudyError>;
