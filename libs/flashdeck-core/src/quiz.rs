//! Quiz attempt history kept per deck.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Number of attempts a deck retains.
pub const MAX_QUIZ_HISTORY: usize = 5;

/// One completed quiz over a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub date: DateTime<Utc>,
    pub score: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub incorrect_flashcard_ids: Vec<String>,
}

impl QuizAttempt {
    /// Build an attempt, rejecting a score above the question count.
    pub fn new(
        date: DateTime<Utc>,
        score: u32,
        total_questions: u32,
        incorrect_flashcard_ids: Vec<String>,
    ) -> Result<Self> {
        let attempt = Self {
            date,
            score,
            total_questions,
            incorrect_flashcard_ids,
        };
        attempt.validate()?;
        Ok(attempt)
    }

    pub fn validate(&self) -> Result<()> {
        if self.score > self.total_questions {
            return Err(CoreError::InvalidQuizAttempt {
                score: self.score,
                total: self.total_questions,
            });
        }
        Ok(())
    }

    /// Fraction answered correctly. An empty quiz scores 0.0.
    pub fn accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.total_questions)
    }
}

/// History with `attempt` prepended, truncated to the newest five.
pub fn record_attempt(history: &[QuizAttempt], attempt: QuizAttempt) -> Vec<QuizAttempt> {
    std::iter::once(attempt)
        .chain(history.iter().cloned())
        .take(MAX_QUIZ_HISTORY)
        .collect()
}

/// Card ids missed in the retained history, most often missed first.
///
/// Ties keep the order in which the ids first appear, newest attempt first.
pub fn most_missed(history: &[QuizAttempt]) -> Vec<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut order = 0;
    for id in history
        .iter()
        .flat_map(|attempt| attempt.incorrect_flashcard_ids.iter())
    {
        let entry = counts.entry(id.as_str()).or_insert_with(|| {
            order += 1;
            (0, order)
        });
        entry.0 += 1;
    }

    let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ranked.into_iter().map(|(id, _)| id.to_string()).collect()
}
