//! Fixed-ladder interval scheduling.
//!
//! Each passing rating looks its interval up in a short table indexed by the
//! card's level before the review. The index clamps at the last rung, so
//! intervals plateau for mature cards instead of growing without bound.

use super::{ReviewTransition, SpacedRepetitionAlgorithm};
use crate::types::Rating;
use chrono::{DateTime, Duration, Utc};

/// Number of rungs in each ladder.
pub const LADDER_LEN: usize = 6;

/// Fixed-ladder algorithm with one interval table per passing rating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLadder {
    pub hard: [u32; LADDER_LEN],
    pub good: [u32; LADDER_LEN],
    pub easy: [u32; LADDER_LEN],
}

impl Default for FixedLadder {
    fn default() -> Self {
        Self {
            hard: [0, 1, 2, 3, 5, 8],
            good: [1, 2, 4, 8, 16, 32],
            easy: [2, 4, 8, 16, 32, 64],
        }
    }
}

impl SpacedRepetitionAlgorithm for FixedLadder {
    fn name(&self) -> &'static str {
        "ladder"
    }

    fn schedule(&self, srs_level: u32, rating: Rating, now: DateTime<Utc>) -> ReviewTransition {
        let interval_days = self.interval_days(srs_level, rating);
        ReviewTransition {
            new_srs_level: Self::next_level(srs_level, rating),
            new_next_review_date: now + Duration::days(i64::from(interval_days)),
            interval_days,
        }
    }
}

impl FixedLadder {
    /// Days until the next review, computed from the level before the review.
    pub fn interval_days(&self, srs_level: u32, rating: Rating) -> u32 {
        let ladder = match rating {
            Rating::Again => return 0,
            Rating::Hard => &self.hard,
            Rating::Good => &self.good,
            Rating::Easy => &self.easy,
        };
        let index = usize::try_from(srs_level)
            .unwrap_or(usize::MAX)
            .min(LADDER_LEN - 1);
        ladder[index]
    }

    fn next_level(srs_level: u32, rating: Rating) -> u32 {
        match rating {
            Rating::Again => 0,
            Rating::Hard => srs_level,
            Rating::Good | Rating::Easy => srs_level.saturating_add(1),
        }
    }
}
