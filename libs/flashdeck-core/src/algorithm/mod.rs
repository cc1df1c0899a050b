//! Spaced repetition algorithm implementations.

pub mod ladder;

use crate::error::{CoreError, Result};
use crate::types::{Rating, ReviewState};
use chrono::{DateTime, Utc};

pub use ladder::FixedLadder;

/// Result of scheduling a card after review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewTransition {
    pub new_srs_level: u32,
    pub new_next_review_date: DateTime<Utc>,
    pub interval_days: u32,
}

impl ReviewTransition {
    pub fn review_state(&self) -> ReviewState {
        ReviewState {
            srs_level: self.new_srs_level,
            next_review_date: self.new_next_review_date,
        }
    }
}

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate next review state after a review.
    fn schedule(&self, srs_level: u32, rating: Rating, now: DateTime<Utc>) -> ReviewTransition;

    /// Initial state for a new card.
    fn initial_state(&self, now: DateTime<Utc>) -> ReviewState {
        ReviewState::new(now)
    }
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Result<Box<dyn SpacedRepetitionAlgorithm>> {
    match name {
        "ladder" => Ok(Box::new(FixedLadder::default())),
        other => Err(CoreError::UnknownAlgorithm(other.to_string())),
    }
}

/// Compute the next review state with the default ladder.
pub fn compute_review_transition(
    srs_level: u32,
    rating: Rating,
    now: DateTime<Utc>,
) -> ReviewTransition {
    FixedLadder::default().schedule(srs_level, rating, now)
}
