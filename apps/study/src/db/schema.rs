//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the local SQLite database.
pub const SCHEMA: &str = r#"
-- Decks
CREATE TABLE IF NOT EXISTS decks (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    language TEXT NOT NULL,
    created_at TEXT NOT NULL,
    quiz_history TEXT NOT NULL DEFAULT '[]'
);

-- Flashcards with their review state
CREATE TABLE IF NOT EXISTS flashcards (
    id TEXT PRIMARY KEY,
    deck_id TEXT NOT NULL REFERENCES decks(id),
    front TEXT NOT NULL,
    back TEXT NOT NULL,
    image_url TEXT,
    srs_level INTEGER NOT NULL DEFAULT 0 CHECK (srs_level >= 0),
    next_review_date TEXT NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_flashcards_deck ON flashcards(deck_id);
"#;

