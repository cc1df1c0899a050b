//! Repository pattern for database access.

use crate::db::date_utils::{invalid_text, parse_db_timestamp, to_db_timestamp};
use crate::db::error::DbError;
use flashdeck_core::{CardContentUpdate, Deck, Flashcard, Language, QuizAttempt, ReviewState};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

/// Repository for deck operations.
pub trait DeckRepository {
    fn create_deck(&self, deck: &Deck) -> Result<()>;
    fn get_deck(&self, id: &str) -> Result<Option<Deck>>;
    fn list_decks(&self) -> Result<Vec<Deck>>;
    fn update_deck_title(&self, id: &str, title: &str) -> Result<bool>;
    fn save_quiz_history(&self, id: &str, history: &[QuizAttempt]) -> Result<bool>;
    fn delete_deck(&self, id: &str) -> Result<bool>;
}

/// Repository for card content operations.
pub trait CardRepository {
    fn insert_cards(&self, deck_id: &str, cards: &[Flashcard]) -> Result<()>;
    fn get_card(&self, deck_id: &str, card_id: &str) -> Result<Option<Flashcard>>;
    fn get_cards_by_deck(&self, deck_id: &str) -> Result<Vec<Flashcard>>;
    fn update_card_content(
        &self,
        deck_id: &str,
        card_id: &str,
        update: &CardContentUpdate,
    ) -> Result<bool>;
    fn delete_card(&self, deck_id: &str, card_id: &str) -> Result<bool>;
}

/// Repository for card review state.
pub trait StateRepository {
    /// Merge a review state into a stored card. Returns false if the card is gone.
    fn save_review_state(&self, deck_id: &str, card_id: &str, state: &ReviewState) -> Result<bool>;
}

const CARD_COLUMNS: &str = "id, front, back, image_url, srs_level, next_review_date";

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![super::schema::SCHEMA_VERSION],
        )?;
        Ok(())
    }

    /// Highest schema version recorded in the database.
    pub fn schema_version(&self) -> Result<i32> {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .map_err(Into::into)
    }

    fn row_to_card(row: &rusqlite::Row) -> rusqlite::Result<Flashcard> {
        let next_review: String = row.get(5)?;
        Ok(Flashcard {
            id: row.get(0)?,
            front: row.get(1)?,
            back: row.get(2)?,
            image_url: row.get(3)?,
            srs_level: row.get(4)?,
            next_review_date: parse_db_timestamp(5, &next_review)?,
        })
    }

    fn row_to_deck(row: &rusqlite::Row) -> rusqlite::Result<Deck> {
        let language_str: String = row.get(2)?;
        let language = Language::from_str(&language_str)
            .ok_or_else(|| invalid_text(2, format!("unknown language: {}", language_str)))?;
        let created_at: String = row.get(3)?;
        let history_json: String = row.get(4)?;
        let quiz_history: Vec<QuizAttempt> = serde_json::from_str(&history_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Deck {
            id: row.get(0)?,
            title: row.get(1)?,
            language,
            created_at: parse_db_timestamp(3, &created_at)?,
            quiz_history,
        })
    }
}

impl DeckRepository for SqliteRepository {
    fn create_deck(&self, deck: &Deck) -> Result<()> {
        let history = serde_json::to_string(&deck.quiz_history)?;
        self.conn.execute(
            "INSERT INTO decks (id, title, language, created_at, quiz_history) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                deck.id,
                deck.title,
                deck.language.as_str(),
                to_db_timestamp(&deck.created_at),
                history
            ],
        )?;
        Ok(())
    }

    fn get_deck(&self, id: &str) -> Result<Option<Deck>> {
        self.conn
            .query_row(
                "SELECT id, title, language, created_at, quiz_history FROM decks WHERE id = ?1",
                params![id],
                Self::row_to_deck,
            )
            .optional()
            .map_err(Into::into)
    }

    fn list_decks(&self) -> Result<Vec<Deck>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, language, created_at, quiz_history FROM decks ORDER BY rowid",
        )?;

        let decks = stmt
            .query_map([], Self::row_to_deck)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(decks)
    }

    fn update_deck_title(&self, id: &str, title: &str) -> Result<bool> {
        let count = self.conn.execute(
            "UPDATE decks SET title = ?1 WHERE id = ?2",
            params![title, id],
        )?;
        Ok(count > 0)
    }

    fn save_quiz_history(&self, id: &str, history: &[QuizAttempt]) -> Result<bool> {
        let json = serde_json::to_string(history)?;
        let count = self.conn.execute(
            "UPDATE decks SET quiz_history = ?1 WHERE id = ?2",
            params![json, id],
        )?;
        Ok(count > 0)
    }

    fn delete_deck(&self, id: &str) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM flashcards WHERE deck_id = ?1", params![id])?;
        let count = tx.execute("DELETE FROM decks WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(count > 0)
    }
}

impl CardRepository for SqliteRepository {
    fn insert_cards(&self, deck_id: &str, cards: &[Flashcard]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO flashcards (id, deck_id, front, back, image_url, srs_level, next_review_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for card in cards {
                stmt.execute(params![
                    card.id,
                    deck_id,
                    card.front,
                    card.back,
                    card.image_url,
                    card.srs_level,
                    to_db_timestamp(&card.next_review_date),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn get_card(&self, deck_id: &str, card_id: &str) -> Result<Option<Flashcard>> {
        let sql = format!(
            "SELECT {} FROM flashcards WHERE deck_id = ?1 AND id = ?2",
            CARD_COLUMNS
        );
        self.conn
            .query_row(&sql, params![deck_id, card_id], Self::row_to_card)
            .optional()
            .map_err(Into::into)
    }

    fn get_cards_by_deck(&self, deck_id: &str) -> Result<Vec<Flashcard>> {
        let sql = format!(
            "SELECT {} FROM flashcards WHERE deck_id = ?1 ORDER BY rowid",
            CARD_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let cards = stmt
            .query_map(params![deck_id], Self::row_to_card)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(cards)
    }

    fn update_card_content(
        &self,
        deck_id: &str,
        card_id: &str,
        update: &CardContentUpdate,
    ) -> Result<bool> {
        let count = self.conn.execute(
            "UPDATE flashcards SET
                front = COALESCE(?3, front),
                back = COALESCE(?4, back),
                image_url = COALESCE(?5, image_url)
             WHERE deck_id = ?1 AND id = ?2",
            params![deck_id, card_id, update.front, update.back, update.image_url],
        )?;
        Ok(count > 0)
    }

    fn delete_card(&self, deck_id: &str, card_id: &str) -> Result<bool> {
        let count = self.conn.execute(
            "DELETE FROM flashcards WHERE deck_id = ?1 AND id = ?2",
            params![deck_id, card_id],
        )?;
        Ok(count > 0)
    }
}

impl StateRepository for SqliteRepository {
    fn save_review_state(&self, deck_id: &str, card_id: &str, state: &ReviewState) -> Result<bool> {
        let count = self.conn.execute(
            "UPDATE flashcards SET srs_level = ?3, next_review_date = ?4 WHERE deck_id = ?1 AND id = ?2",
            params![
                deck_id,
                card_id,
                state.srs_level,
                to_db_timestamp(&state.next_review_date)
            ],
        )?;
        Ok(count > 0)
    }
}
