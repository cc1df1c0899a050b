//! Seam for bulk card generation by an external content model.

use flashdeck_core::{Language, NewFlashcard};
use thiserror::Error;

/// Smallest batch a generator may be asked for.
pub const MIN_GENERATED_CARDS: u32 = 1;
/// Largest batch a generator may be asked for.
pub const MAX_GENERATED_CARDS: u32 = 50;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generation failed: {0}")]
    Failed(String),

    #[error("generator returned no cards")]
    Empty,
}

/// Produces card content for a topic.
///
/// Implementations wrap a hosted generative model; the study service only
/// sees the returned content and assigns ids and review state itself.
pub trait CardGenerator {
    fn generate_cards(
        &self,
        topic: &str,
        count: u32,
        language: Language,
    ) -> Result<Vec<NewFlashcard>, GenerateError>;
}
