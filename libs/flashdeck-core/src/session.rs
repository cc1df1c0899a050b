//! Due-card selection and the in-session review queue.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};

use crate::types::{Flashcard, Rating};

/// Where one study day ends and the next begins.
///
/// Days are calendar dates in `offset`, starting at `reset_hour`. Before the
/// reset hour the previous day is still current, so late-night study counts
/// toward it. Due dates are bucketed the same way as "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    pub offset: FixedOffset,
    pub reset_hour: u32,
}

impl DayBoundary {
    pub fn new(offset: FixedOffset, reset_hour: u32) -> Self {
        Self { offset, reset_hour }
    }

    /// UTC days starting at midnight.
    pub fn utc() -> Self {
        Self::new(Utc.fix(), 0)
    }

    /// Study day an instant belongs to.
    pub fn study_day(&self, instant: DateTime<Utc>) -> NaiveDate {
        (instant.with_timezone(&self.offset) - Duration::hours(i64::from(self.reset_hour)))
            .date_naive()
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::utc()
    }
}

/// Study day of `now` under `boundary`.
pub fn study_day(now: DateTime<Utc>, boundary: &DayBoundary) -> NaiveDate {
    boundary.study_day(now)
}

/// Whether a card is due on study day `day`. Time of day is ignored.
pub fn is_due_on(card: &Flashcard, day: NaiveDate, boundary: &DayBoundary) -> bool {
    boundary.study_day(card.next_review_date) <= day
}

/// Cards due at `now` on UTC calendar days, least mature first.
pub fn select_due_cards(cards: &[Flashcard], now: DateTime<Utc>) -> Vec<Flashcard> {
    let boundary = DayBoundary::utc();
    select_due_cards_on(cards, boundary.study_day(now), &boundary)
}

/// Cards due on `day`, least mature first. Ties keep their input order.
pub fn select_due_cards_on(
    cards: &[Flashcard],
    day: NaiveDate,
    boundary: &DayBoundary,
) -> Vec<Flashcard> {
    let mut due: Vec<Flashcard> = cards
        .iter()
        .filter(|card| is_due_on(card, day, boundary))
        .cloned()
        .collect();
    // sort_by_key is stable
    due.sort_by_key(|card| card.srs_level);
    due
}

/// Outcome of rating a card within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Rated `again`: moved to the back of the queue.
    Requeued,
    /// Passed: removed from the queue for this session.
    Completed,
    /// The card was not in the queue; nothing changed.
    NotQueued,
}

/// Pure queue transition: the queue after rating `card_id`.
pub fn advance_session(
    queue: &VecDeque<Flashcard>,
    card_id: &str,
    rating: Rating,
) -> VecDeque<Flashcard> {
    let mut next = queue.clone();
    advance_queue(&mut next, card_id, rating);
    next
}

fn advance_queue(queue: &mut VecDeque<Flashcard>, card_id: &str, rating: Rating) -> Advance {
    let Some(position) = queue.iter().position(|card| card.id == card_id) else {
        return Advance::NotQueued;
    };
    let Some(card) = queue.remove(position) else {
        return Advance::NotQueued;
    };
    if rating.is_pass() {
        Advance::Completed
    } else {
        queue.push_back(card);
        Advance::Requeued
    }
}

/// An in-memory study session over one deck's due cards.
///
/// Each due card sits in the queue exactly once until it is passed, so
/// `completed_count` counts distinct cards passed. Every rating, including
/// requeues, is counted in `reviews_recorded`.
#[derive(Debug, Clone)]
pub struct StudySession {
    queue: VecDeque<Flashcard>,
    total_due: usize,
    reviews_recorded: usize,
}

impl StudySession {
    /// Start a session over already-selected due cards.
    ///
    /// Returns `None` when nothing is due.
    pub fn start(due: Vec<Flashcard>) -> Option<Self> {
        if due.is_empty() {
            return None;
        }
        Some(Self {
            total_due: due.len(),
            queue: due.into(),
            reviews_recorded: 0,
        })
    }

    /// Select the due cards of a deck at `now` and start a session.
    pub fn for_deck(
        cards: &[Flashcard],
        now: DateTime<Utc>,
        boundary: &DayBoundary,
    ) -> Option<Self> {
        Self::start(select_due_cards_on(cards, boundary.study_day(now), boundary))
    }

    /// Card awaiting a rating.
    pub fn current(&self) -> Option<&Flashcard> {
        self.queue.front()
    }

    pub fn queue(&self) -> &VecDeque<Flashcard> {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn contains(&self, card_id: &str) -> bool {
        self.queue.iter().any(|card| card.id == card_id)
    }

    /// Number of cards due when the session started.
    pub fn total_due(&self) -> usize {
        self.total_due
    }

    /// Distinct cards passed so far.
    pub fn completed_count(&self) -> usize {
        self.total_due - self.queue.len()
    }

    /// Ratings applied so far, requeues included.
    pub fn reviews_recorded(&self) -> usize {
        self.reviews_recorded
    }

    /// Fraction of due cards passed, from 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        self.completed_count() as f64 / self.total_due as f64
    }

    /// Apply a rating to a queued card.
    pub fn advance(&mut self, card_id: &str, rating: Rating) -> Advance {
        let advance = advance_queue(&mut self.queue, card_id, rating);
        if advance != Advance::NotQueued {
            self.reviews_recorded += 1;
        }
        advance
    }

    /// Replace the queued copy of a card with fresher state.
    pub fn refresh(&mut self, card: &Flashcard) -> bool {
        match self.queue.iter_mut().find(|queued| queued.id == card.id) {
            Some(queued) => {
                *queued = card.clone();
                true
            }
            None => false,
        }
    }

    /// Drop a card that no longer exists. It counts as resolved.
    pub fn discard(&mut self, card_id: &str) -> bool {
        match self.queue.iter().position(|card| card.id == card_id) {
            Some(position) => {
                self.queue.remove(position);
                true
            }
            None => false,
        }
    }
}
