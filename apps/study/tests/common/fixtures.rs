//! Test fixtures and stand-in collaborators.

use std::cell::{Cell, RefCell};

use flashdeck_core::{
    CardContentUpdate, Deck, Flashcard, Language, NewFlashcard, QuizAttempt, ReviewState,
};
use flashdeck_study::db::{
    CardRepository, DbError, DeckRepository, SqliteRepository, StateRepository,
};
use flashdeck_study::generate::{CardGenerator, GenerateError};

use super::start_time;

/// Card content numbered from zero.
pub fn numbered_card(i: usize) -> NewFlashcard {
    NewFlashcard::new(format!("Question {}?", i), format!("Answer {}.", i))
}

/// Quiz attempt with the given score out of ten.
pub fn quiz_attempt(score: u32, missed: &[&str]) -> QuizAttempt {
    QuizAttempt {
        date: start_time(),
        score,
        total_questions: 10,
        incorrect_flashcard_ids: missed.iter().map(|s| s.to_string()).collect(),
    }
}

/// Generator that returns numbered cards and remembers what it was asked.
#[derive(Default)]
pub struct StubGenerator {
    pub calls: RefCell<Vec<(String, u32, Language)>>,
}

impl CardGenerator for StubGenerator {
    fn generate_cards(
        &self,
        topic: &str,
        count: u32,
        language: Language,
    ) -> Result<Vec<NewFlashcard>, GenerateError> {
        self.calls
            .borrow_mut()
            .push((topic.to_string(), count, language));
        Ok((0..count as usize).map(numbered_card).collect())
    }
}

/// Generator that always fails.
pub struct FailingGenerator;

impl CardGenerator for FailingGenerator {
    fn generate_cards(
        &self,
        _topic: &str,
        _count: u32,
        _language: Language,
    ) -> Result<Vec<NewFlashcard>, GenerateError> {
        Err(GenerateError::Failed("model unavailable".to_string()))
    }
}

/// Repository whose review-state writes can be switched to fail.
pub struct FlakyStateRepository {
    pub inner: SqliteRepository,
    pub fail_writes: Cell<bool>,
}

impl FlakyStateRepository {
    pub fn new() -> Self {
        Self {
            inner: SqliteRepository::open_in_memory().expect("open in-memory database"),
            fail_writes: Cell::new(false),
        }
    }
}

impl StateRepository for FlakyStateRepository {
    fn save_review_state(
        &self,
        deck_id: &str,
        card_id: &str,
        state: &ReviewState,
    ) -> Result<bool, DbError> {
        if self.fail_writes.get() {
            return Err(DbError::InvalidData("store offline".to_string()));
        }
        self.inner.save_review_state(deck_id, card_id, state)
    }
}

impl DeckRepository for FlakyStateRepository {
    fn create_deck(&self, deck: &Deck) -> Result<(), DbError> {
        self.inner.create_deck(deck)
    }

    fn get_deck(&self, id: &str) -> Result<Option<Deck>, DbError> {
        self.inner.get_deck(id)
    }

    fn list_decks(&self) -> Result<Vec<Deck>, DbError> {
        self.inner.list_decks()
    }

    fn update_deck_title(&self, id: &str, title: &str) -> Result<bool, DbError> {
        self.inner.update_deck_title(id, title)
    }

    fn save_quiz_history(&self, id: &str, history: &[QuizAttempt]) -> Result<bool, DbError> {
        self.inner.save_quiz_history(id, history)
    }

    fn delete_deck(&self, id: &str) -> Result<bool, DbError> {
        self.inner.delete_deck(id)
    }
}

impl CardRepository for FlakyStateRepository {
    fn insert_cards(&self, deck_id: &str, cards: &[Flashcard]) -> Result<(), DbError> {
        self.inner.insert_cards(deck_id, cards)
    }

    fn get_card(&self, deck_id: &str, card_id: &str) -> Result<Option<Flashcard>, DbError> {
        self.inner.get_card(deck_id, card_id)
    }

    fn get_cards_by_deck(&self, deck_id: &str) -> Result<Vec<Flashcard>, DbError> {
        self.inner.get_cards_by_deck(deck_id)
    }

    fn update_card_content(
        &self,
        deck_id: &str,
        card_id: &str,
        update: &CardContentUpdate,
    ) -> Result<bool, DbError> {
        self.inner.update_card_content(deck_id, card_id, update)
    }

    fn delete_card(&self, deck_id: &str, card_id: &str) -> Result<bool, DbError> {
        self.inner.delete_card(deck_id, card_id)
    }
}
