//! Deal command handler for single hand dealing and display.
//!
//! Deals two hole cards to each of two players and a five-card board from a
//! seeded deck, then names the best hand. The same seed always deals the same
//! cards.

use crate::error::CliError;
use crate::ui::format_cards;
use holdem_engine::deck::Deck;
use holdem_engine::hand::{evaluate_hand, find_winner};
use std::io::Write;

/// Handle the deal command.
///
/// # Errors
///
/// Returns `CliError::Io` on output failures and `CliError::Game` if the deck
/// cannot supply the cards.
pub fn handle_deal_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let seed = seed.unwrap_or_else(rand::random);
    let mut deck = Deck::new_with_seed(seed);
    deck.shuffle();

    let p1 = deck.deal(2)?;
    let p2 = deck.deal(2)?;
    let board = deck.deal(5)?;

    let h1 = evaluate_hand(&p1, &board)?;
    let h2 = evaluate_hand(&p2, &board)?;
    writeln!(out, "Hole P1: {} ({})", format_cards(&p1), h1.name())?;
    writeln!(out, "Hole P2: {} ({})", format_cards(&p2), h2.name())?;
    writeln!(out, "Board: {}", format_cards(&board))?;

    let winners = find_winner(&[("P1", p1.as_slice()), ("P2", p2.as_slice())], &board)?;
    let names: Vec<&str> = winners.iter().map(|w| w.player_id.as_str()).collect();
    if names.len() > 1 {
        writeln!(out, "Result: split pot")?;
    } else {
        writeln!(out, "Result: {} wins", names.join(""))?;
    }
    Ok(())
}
