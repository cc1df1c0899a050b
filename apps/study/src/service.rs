//! Study service: decks, cards, sessions and ratings over a repository.

use chrono::NaiveDate;
use flashdeck_core::{
    get_algorithm, record_attempt, select_due_cards_on, Advance, CardContentUpdate, DayBoundary,
    Deck, FixedLadder, Flashcard, Language, NewFlashcard, QuizAttempt, Rating, ReviewTransition,
    SpacedRepetitionAlgorithm, StudySession,
};
use serde::Serialize;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::Config;
use crate::db::{CardRepository, DeckRepository, StateRepository};
use crate::error::{Result, StudyError};
use crate::generate::{CardGenerator, GenerateError, MAX_GENERATED_CARDS, MIN_GENERATED_CARDS};

/// What happened when a card was rated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOutcome {
    /// Rated `again` and moved to the back of the session queue.
    Requeued(ReviewTransition),
    /// Passed and done for this session.
    Completed(ReviewTransition),
    /// Card or deck no longer present; nothing was stored.
    Skipped,
}

/// Card counts for one deck.
#[derive(Debug, Clone, Serialize)]
pub struct DeckSummary {
    pub deck: Deck,
    pub total_cards: usize,
    pub due_cards: usize,
}

pub struct StudyService<R, C> {
    repo: R,
    clock: C,
    algorithm: Box<dyn SpacedRepetitionAlgorithm>,
    daily_reset_hour: u32,
}

impl<R, C> StudyService<R, C>
where
    R: DeckRepository + CardRepository + StateRepository,
    C: Clock,
{
    /// Service with the default ladder and study days starting at midnight.
    pub fn new(repo: R, clock: C) -> Self {
        Self {
            repo,
            clock,
            algorithm: Box::new(FixedLadder::default()),
            daily_reset_hour: 0,
        }
    }

    pub fn with_config(repo: R, clock: C, config: &Config) -> Result<Self> {
        Ok(Self {
            repo,
            clock,
            algorithm: get_algorithm(&config.algorithm)?,
            daily_reset_hour: config.daily_reset_hour,
        })
    }

    pub fn with_daily_reset_hour(mut self, hour: u32) -> Self {
        self.daily_reset_hour = hour;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Day boundary in the clock's timezone.
    pub fn day_boundary(&self) -> DayBoundary {
        DayBoundary::new(self.clock.offset(), self.daily_reset_hour)
    }

    /// Current study day.
    pub fn today(&self) -> NaiveDate {
        self.day_boundary().study_day(self.clock.now())
    }

    /// Create a deck, optionally with initial cards.
    pub fn create_deck(
        &self,
        title: &str,
        language: Language,
        cards: Vec<NewFlashcard>,
    ) -> Result<Deck> {
        let deck = Deck {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            language,
            created_at: self.clock.now(),
            quiz_history: Vec::new(),
        };
        self.repo.create_deck(&deck)?;
        tracing::info!(deck_id = %deck.id, title = %deck.title, "deck created");

        if !cards.is_empty() {
            self.insert_new_cards(&deck.id, cards)?;
        }
        Ok(deck)
    }

    /// Create a deck filled by a card generator.
    pub fn generate_deck<G: CardGenerator>(
        &self,
        generator: &G,
        title: &str,
        topic: &str,
        count: u32,
        language: Language,
    ) -> Result<Deck> {
        let cards = Self::generate(generator, topic, count, language)?;
        self.create_deck(title, language, cards)
    }

    /// Add cards to an existing deck. A missing deck adds nothing.
    pub fn add_cards(&self, deck_id: &str, cards: Vec<NewFlashcard>) -> Result<Vec<Flashcard>> {
        if self.repo.get_deck(deck_id)?.is_none() {
            tracing::warn!(deck_id, "add_cards on missing deck ignored");
            return Ok(Vec::new());
        }
        self.insert_new_cards(deck_id, cards)
    }

    /// Generate cards in the deck's language and add them.
    pub fn add_generated_cards<G: CardGenerator>(
        &self,
        generator: &G,
        deck_id: &str,
        topic: &str,
        count: u32,
    ) -> Result<Vec<Flashcard>> {
        let Some(deck) = self.repo.get_deck(deck_id)? else {
            tracing::warn!(deck_id, "add_generated_cards on missing deck ignored");
            return Ok(Vec::new());
        };
        let cards = Self::generate(generator, topic, count, deck.language)?;
        self.insert_new_cards(deck_id, cards)
    }

    pub fn edit_card(&self, deck_id: &str, card_id: &str, update: &CardContentUpdate) -> Result<bool> {
        if update.is_empty() {
            return Ok(false);
        }
        Ok(self.repo.update_card_content(deck_id, card_id, update)?)
    }

    pub fn delete_card(&self, deck_id: &str, card_id: &str) -> Result<bool> {
        let deleted = self.repo.delete_card(deck_id, card_id)?;
        if deleted {
            tracing::info!(deck_id, card_id, "card deleted");
        }
        Ok(deleted)
    }

    pub fn rename_deck(&self, deck_id: &str, title: &str) -> Result<bool> {
        Ok(self.repo.update_deck_title(deck_id, title)?)
    }

    /// Delete a deck and all of its cards.
    pub fn delete_deck(&self, deck_id: &str) -> Result<bool> {
        let deleted = self.repo.delete_deck(deck_id)?;
        if deleted {
            tracing::info!(deck_id, "deck deleted");
        }
        Ok(deleted)
    }

    /// Every deck with its total and due card counts.
    pub fn deck_summaries(&self) -> Result<Vec<DeckSummary>> {
        let boundary = self.day_boundary();
        let today = boundary.study_day(self.clock.now());
        self.repo
            .list_decks()?
            .into_iter()
            .map(|deck| -> Result<DeckSummary> {
                let cards = self.repo.get_cards_by_deck(&deck.id)?;
                let due_cards = select_due_cards_on(&cards, today, &boundary).len();
                Ok(DeckSummary {
                    total_cards: cards.len(),
                    due_cards,
                    deck,
                })
            })
            .collect()
    }

    /// Cards due today in presentation order.
    pub fn due_cards(&self, deck_id: &str) -> Result<Vec<Flashcard>> {
        let cards = self.repo.get_cards_by_deck(deck_id)?;
        let boundary = self.day_boundary();
        Ok(select_due_cards_on(
            &cards,
            boundary.study_day(self.clock.now()),
            &boundary,
        ))
    }

    /// Start a session over a deck's due cards.
    ///
    /// Returns `None` if the deck is missing or nothing is due.
    pub fn start_session(&self, deck_id: &str) -> Result<Option<StudySession>> {
        if self.repo.get_deck(deck_id)?.is_none() {
            return Ok(None);
        }
        let session = StudySession::start(self.due_cards(deck_id)?);
        match &session {
            Some(s) => tracing::info!(deck_id, due = s.total_due(), "study session started"),
            None => tracing::debug!(deck_id, "nothing due"),
        }
        Ok(session)
    }

    /// Rate a card in a running session and store its new review state.
    ///
    /// The queue advances before the state is written. If the write fails the
    /// error is returned and the queue stays advanced.
    pub fn rate_card(
        &self,
        deck_id: &str,
        session: &mut StudySession,
        card_id: &str,
        rating: Rating,
    ) -> Result<RateOutcome> {
        if !session.contains(card_id) {
            tracing::warn!(deck_id, card_id, "rated card is not queued");
            return Ok(RateOutcome::Skipped);
        }
        if self.repo.get_deck(deck_id)?.is_none() {
            tracing::warn!(deck_id, "deck vanished during session");
            return Ok(RateOutcome::Skipped);
        }
        let Some(mut card) = self.repo.get_card(deck_id, card_id)? else {
            tracing::warn!(deck_id, card_id, "card vanished during session");
            session.discard(card_id);
            return Ok(RateOutcome::Skipped);
        };

        let transition = self.algorithm.schedule(card.srs_level, rating, self.clock.now());
        card.apply(&transition.review_state());

        let outcome = match session.advance(card_id, rating) {
            Advance::Requeued => {
                session.refresh(&card);
                RateOutcome::Requeued(transition)
            }
            Advance::Completed => RateOutcome::Completed(transition),
            Advance::NotQueued => return Ok(RateOutcome::Skipped),
        };
        tracing::debug!(
            card_id,
            %rating,
            level = transition.new_srs_level,
            interval_days = transition.interval_days,
            "card rated"
        );

        match self
            .repo
            .save_review_state(deck_id, card_id, &transition.review_state())
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(deck_id, card_id, "card deleted before review was stored");
            }
            Err(source) => {
                tracing::warn!(deck_id, card_id, error = %source, "failed to store review");
                return Err(StudyError::Persist {
                    card_id: card_id.to_string(),
                    source,
                });
            }
        }

        if session.is_finished() {
            tracing::info!(
                deck_id,
                completed = session.completed_count(),
                reviews = session.reviews_recorded(),
                "study session finished"
            );
        }
        Ok(outcome)
    }

    /// Prepend a quiz attempt to the deck's history, keeping the newest five.
    ///
    /// Returns the stored history, or `None` if the deck is missing.
    pub fn record_quiz_attempt(
        &self,
        deck_id: &str,
        attempt: QuizAttempt,
    ) -> Result<Option<Vec<QuizAttempt>>> {
        attempt.validate()?;
        let Some(deck) = self.repo.get_deck(deck_id)? else {
            return Ok(None);
        };
        let history = record_attempt(&deck.quiz_history, attempt);
        self.repo.save_quiz_history(deck_id, &history)?;
        Ok(Some(history))
    }

    fn insert_new_cards(&self, deck_id: &str, cards: Vec<NewFlashcard>) -> Result<Vec<Flashcard>> {
        let now = self.clock.now();
        let initial = self.algorithm.initial_state(now);
        let cards: Vec<Flashcard> = cards
            .into_iter()
            .map(|content| {
                let mut card = Flashcard::new(Uuid::new_v4().to_string(), content, now);
                card.apply(&initial);
                card
            })
            .collect();
        self.repo.insert_cards(deck_id, &cards)?;
        tracing::info!(deck_id, count = cards.len(), "cards added");
        Ok(cards)
    }

    fn generate<G: CardGenerator>(
        generator: &G,
        topic: &str,
        count: u32,
        language: Language,
    ) -> Result<Vec<NewFlashcard>> {
        if !(MIN_GENERATED_CARDS..=MAX_GENERATED_CARDS).contains(&count) {
            return Err(StudyError::InvalidCardCount {
                count,
                min: MIN_GENERATED_CARDS,
                max: MAX_GENERATED_CARDS,
            });
        }
        let cards = generator.generate_cards(topic, count, language)?;
        if cards.is_empty() {
            return Err(GenerateError::Empty.into());
        }
        tracing::debug!(topic, requested = count, received = cards.len(), "cards generated");
        Ok(cards)
    }
}
