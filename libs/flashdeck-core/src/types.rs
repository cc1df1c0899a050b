//! Core types for the flashdeck study application.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::quiz::QuizAttempt;

/// Rating for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// All ratings, weakest recall first.
    pub const ALL: [Rating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    /// Convert to 4-point numeric value (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Create from 4-point numeric value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Again),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }

    /// Whether the rating finishes the card for the current session.
    pub fn is_pass(self) -> bool {
        !matches!(self, Self::Again)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "again" => Ok(Self::Again),
            "hard" => Ok(Self::Hard),
            "good" => Ok(Self::Good),
            "easy" => Ok(Self::Easy),
            other => Err(CoreError::InvalidRating(other.to_string())),
        }
    }
}

/// Review-relevant state of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewState {
    pub srs_level: u32,
    pub next_review_date: DateTime<Utc>,
}

impl ReviewState {
    /// State of a freshly created card: level 0, due immediately.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            srs_level: 0,
            next_review_date: now,
        }
    }
}

/// Card content before an id and review state are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFlashcard {
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewFlashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            image_url: None,
        }
    }
}

/// Partial update of a card's content. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardContentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CardContentUpdate {
    pub fn is_empty(&self) -> bool {
        self.front.is_none() && self.back.is_none() && self.image_url.is_none()
    }
}

/// A flashcard with its review state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub srs_level: u32,
    pub next_review_date: DateTime<Utc>,
}

impl Flashcard {
    /// Create a card from new content, due `now` at level 0.
    pub fn new(id: impl Into<String>, content: NewFlashcard, now: DateTime<Utc>) -> Self {
        let state = ReviewState::new(now);
        Self {
            id: id.into(),
            front: content.front,
            back: content.back,
            image_url: content.image_url,
            srs_level: state.srs_level,
            next_review_date: state.next_review_date,
        }
    }

    pub fn review_state(&self) -> ReviewState {
        ReviewState {
            srs_level: self.srs_level,
            next_review_date: self.next_review_date,
        }
    }

    /// Overwrite the review fields, leaving content untouched.
    pub fn apply(&mut self, state: &ReviewState) {
        self.srs_level = state.srs_level;
        self.next_review_date = state.next_review_date;
    }
}

/// Deck content language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    German,
}

impl Default for Language {
    fn default() -> Self {
        Self::English
    }
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::German => "German",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "English" => Some(Self::English),
            "German" => Some(Self::German),
            _ => None,
        }
    }
}

/// A deck of cards. Cards are stored separately and fetched by deck id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub title: String,
    pub language: Language,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub quiz_history: Vec<QuizAttempt>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap()
    }

    #[test]
    fn rating_parses_lowercase_names() {
        for rating in Rating::ALL {
            assert_eq!(rating.as_str().parse::<Rating>(), Ok(rating));
        }
    }

    #[test]
    fn rating_rejects_unknown_names() {
        assert_eq!(
            "Good".parse::<Rating>(),
            Err(CoreError::InvalidRating("Good".to_string()))
        );
        assert!("".parse::<Rating>().is_err());
    }

    #[test]
    fn rating_numeric_values() {
        assert_eq!(Rating::from_value(1), Some(Rating::Again));
        assert_eq!(Rating::from_value(4), Some(Rating::Easy));
        assert_eq!(Rating::from_value(0), None);
        assert_eq!(Rating::from_value(5), None);
        assert_eq!(Rating::Hard.to_value(), 2);
    }

    #[test]
    fn rating_serializes_snake_case() {
        let json = serde_json::to_string(&Rating::Again).unwrap();
        assert_eq!(json, "\"again\"");
    }

    #[test]
    fn new_card_is_due_immediately_at_level_zero() {
        let card = Flashcard::new("c1", NewFlashcard::new("Q", "A"), now());
        assert_eq!(card.srs_level, 0);
        assert_eq!(card.next_review_date, now());
        assert_eq!(card.review_state(), ReviewState::new(now()));
    }

    #[test]
    fn apply_only_touches_review_fields() {
        let mut card = Flashcard::new("c1", NewFlashcard::new("Q", "A"), now());
        let later = now() + chrono::Duration::days(4);
        card.apply(&ReviewState {
            srs_level: 3,
            next_review_date: later,
        });
        assert_eq!(card.srs_level, 3);
        assert_eq!(card.next_review_date, later);
        assert_eq!(card.front, "Q");
        assert_eq!(card.back, "A");
    }
}
