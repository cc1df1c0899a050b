//! Local SQLite persistence for decks and cards.

pub mod date_utils;
pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{CardRepository, DeckRepository, SqliteRepository, StateRepository};
