//! Core scheduling library for flashdeck.
//!
//! Provides:
//! - Fixed-ladder review scheduling (level and next due date per rating)
//! - Due-card selection and the in-session review queue
//! - Quiz history retention
//! - Shared types (Flashcard, Deck, Rating, ReviewState, etc.)
//!
//! Nothing here performs I/O. Callers pass the current instant in.

pub mod algorithm;
pub mod error;
pub mod quiz;
pub mod session;
pub mod types;

pub use algorithm::{
    compute_review_transition, get_algorithm, FixedLadder, ReviewTransition,
    SpacedRepetitionAlgorithm,
};
pub use error::{CoreError, Result};
pub use quiz::{most_missed, record_attempt, QuizAttempt, MAX_QUIZ_HISTORY};
pub use session::{
    advance_session, is_due_on, select_due_cards, select_due_cards_on, study_day, Advance,
    DayBoundary, StudySession,
};
pub use types::{CardContentUpdate, Deck, Flashcard, Language, NewFlashcard, Rating, ReviewState};
