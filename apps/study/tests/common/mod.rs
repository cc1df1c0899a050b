//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wiring an in-memory database to a fixed clock
//! - Helpers for seeding decks with cards at chosen review states
//!
//! No external services are needed; every test gets a fresh database.

#![allow(dead_code)]

pub mod fixtures;

use chrono::{DateTime, Duration, TimeZone, Utc};

use flashdeck_core::{Deck, Flashcard, Language, ReviewState};
use flashdeck_study::clock::FixedClock;
use flashdeck_study::db::{CardRepository, SqliteRepository, StateRepository};
use flashdeck_study::service::StudyService;

/// Instant every test starts at.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 12, 9, 15, 0).unwrap()
}

/// Study service over an in-memory database and a controllable clock.
pub struct TestContext {
    pub clock: FixedClock,
    pub service: StudyService<SqliteRepository, FixedClock>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_clock(FixedClock::new(start_time()))
    }

    pub fn with_clock(clock: FixedClock) -> Self {
        let repo = SqliteRepository::open_in_memory().expect("open in-memory database");
        let service = StudyService::new(repo, clock.clone());
        Self { clock, service }
    }

    pub fn with_daily_reset_hour(self, hour: u32) -> Self {
        Self {
            clock: self.clock,
            service: self.service.with_daily_reset_hour(hour),
        }
    }

    /// Create a deck whose cards are at the given levels, all due now.
    pub fn deck_with_levels(&self, levels: &[u32]) -> (Deck, Vec<Flashcard>) {
        let contents = (0..levels.len()).map(fixtures::numbered_card).collect();
        let deck = self
            .service
            .create_deck("Levels", Language::English, contents)
            .expect("create deck");
        let mut cards = self.cards(&deck.id);
        for (card, level) in cards.iter_mut().zip(levels) {
            self.set_state(&deck.id, card, *level, start_time());
        }
        (deck, cards)
    }

    /// Overwrite a card's stored review state.
    pub fn set_state(&self, deck_id: &str, card: &mut Flashcard, level: u32, due: DateTime<Utc>) {
        let state = ReviewState {
            srs_level: level,
            next_review_date: due,
        };
        self.service
            .repository()
            .save_review_state(deck_id, &card.id, &state)
            .expect("save state");
        card.apply(&state);
    }

    pub fn cards(&self, deck_id: &str) -> Vec<Flashcard> {
        self.service
            .repository()
            .get_cards_by_deck(deck_id)
            .expect("load cards")
    }

    pub fn card(&self, deck_id: &str, card_id: &str) -> Option<Flashcard> {
        self.service
            .repository()
            .get_card(deck_id, card_id)
            .expect("load card")
    }

    pub fn advance_days(&self, days: i64) {
        self.clock.advance(Duration::days(days));
    }
}
