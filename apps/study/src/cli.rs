//! Command-line interface: deck overview and interactive review.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use flashdeck_core::{CoreError, Rating};

use crate::clock::Clock;
use crate::db::{CardRepository, DeckRepository, StateRepository};
use crate::service::{DeckSummary, StudyService};

#[derive(Debug, Parser)]
#[command(name = "flashdeck", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show due and total cards per deck.
    Decks,
    /// Review the cards due today in a deck.
    Study {
        /// Id of the deck to study.
        deck_id: String,
    },
}

/// Parse a typed rating: its number (1-4) or its name.
pub fn parse_rating(input: &str) -> Result<Rating, CoreError> {
    let input = input.trim();
    match input.parse::<u8>() {
        Ok(value) => {
            Rating::from_value(value).ok_or_else(|| CoreError::InvalidRating(input.to_string()))
        }
        Err(_) => input.to_ascii_lowercase().parse(),
    }
}

fn rating_prompt() -> String {
    let options: Vec<String> = Rating::ALL
        .iter()
        .map(|rating| format!("{} = {}", rating.to_value(), rating))
        .collect();
    format!("Rating: ({})", options.join(", "))
}

pub fn print_summaries<O: Write>(summaries: &[DeckSummary], mut out: O) -> io::Result<()> {
    if summaries.is_empty() {
        return writeln!(out, "No decks yet.");
    }
    for summary in summaries {
        writeln!(
            out,
            "{:>4} due / {:>4} total  {} ({})  {}",
            summary.due_cards,
            summary.total_cards,
            summary.deck.title,
            summary.deck.language.as_str(),
            summary.deck.id
        )?;
    }
    Ok(())
}

/// Review a deck's due cards, reading answers from `input`.
///
/// End of input abandons the session; ratings already given stay stored.
pub fn study<R, C, I, O>(
    service: &StudyService<R, C>,
    deck_id: &str,
    mut input: I,
    mut out: O,
) -> anyhow::Result<()>
where
    R: DeckRepository + CardRepository + StateRepository,
    C: Clock,
    I: BufRead,
    O: Write,
{
    let Some(mut session) = service.start_session(deck_id)? else {
        writeln!(out, "Nothing due.")?;
        return Ok(());
    };

    while let Some(card) = session.current().cloned() {
        writeln!(
            out,
            "[{}/{}] Q: {}",
            session.completed_count() + 1,
            session.total_due(),
            card.front
        )?;
        writeln!(out, "[press enter to reveal]")?;
        if read_line(&mut input)?.is_none() {
            return Ok(());
        }
        writeln!(out, "A: {}", card.back)?;

        let rating = loop {
            writeln!(out, "{}", rating_prompt())?;
            let Some(line) = read_line(&mut input)? else {
                return Ok(());
            };
            match parse_rating(&line) {
                Ok(rating) => break rating,
                Err(err) => writeln!(out, "{err}")?,
            }
        };
        service.rate_card(deck_id, &mut session, &card.id, rating)?;
    }

    writeln!(
        out,
        "Session complete: {} cards, {} reviews.",
        session.completed_count(),
        session.reviews_recorded()
    )?;
    Ok(())
}

fn read_line<I: BufRead>(input: &mut I) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::db::SqliteRepository;
    use chrono::{TimeZone, Utc};
    use flashdeck_core::{Language, NewFlashcard};
    use pretty_assertions::assert_eq;

    fn service() -> StudyService<SqliteRepository, FixedClock> {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 4, 12, 9, 0, 0).unwrap());
        StudyService::new(SqliteRepository::open_in_memory().unwrap(), clock)
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("1\n"), Ok(Rating::Again));
        assert_eq!(parse_rating(" 4 "), Ok(Rating::Easy));
        assert_eq!(parse_rating("Good"), Ok(Rating::Good));
        assert_eq!(parse_rating("hard"), Ok(Rating::Hard));
        assert_eq!(parse_rating("5"), Err(CoreError::InvalidRating("5".to_string())));
        assert_eq!(parse_rating("meh"), Err(CoreError::InvalidRating("meh".to_string())));
    }

    #[test]
    fn test_rating_prompt_lists_every_rating() {
        assert_eq!(
            rating_prompt(),
            "Rating: (1 = again, 2 = hard, 3 = good, 4 = easy)"
        );
    }

    #[test]
    fn test_cli_parses_study_command() {
        let cli = Cli::try_parse_from(["flashdeck", "study", "deck-1"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Study { deck_id }) if deck_id == "deck-1"));
        assert!(Cli::try_parse_from(["flashdeck"]).unwrap().command.is_none());
    }

    #[test]
    fn test_study_session_from_input() {
        let service = service();
        let deck = service
            .create_deck(
                "Capitals",
                Language::English,
                vec![
                    NewFlashcard::new("France?", "Paris"),
                    NewFlashcard::new("Spain?", "Madrid"),
                ],
            )
            .unwrap();

        // again, good, then a typo before easy
        let input = "\n1\n\ngood\n\nsoon\n4\n";
        let mut out = Vec::new();
        study(&service, &deck.id, input.as_bytes(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("invalid rating: soon"));
        assert!(out.ends_with("Session complete: 2 cards, 3 reviews.\n"));
        assert_eq!(service.due_cards(&deck.id).unwrap().len(), 0);
    }

    #[test]
    fn test_study_stops_at_end_of_input() {
        let service = service();
        let deck = service
            .create_deck(
                "Capitals",
                Language::English,
                vec![NewFlashcard::new("France?", "Paris")],
            )
            .unwrap();

        let mut out = Vec::new();
        study(&service, &deck.id, "\n".as_bytes(), &mut out).unwrap();
        assert_eq!(service.due_cards(&deck.id).unwrap().len(), 1);

        let mut out = Vec::new();
        study(&service, "missing", "".as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Nothing due.\n");
    }
}
