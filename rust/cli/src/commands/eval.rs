//! Hand evaluation command.
//!
//! Takes two hole cards followed by three to five board cards and prints the
//! best five-card hand with its category and comparable strength.

use crate::error::CliError;
use crate::ui::format_cards;
use holdem_engine::cards::parse_cards;
use holdem_engine::hand::evaluate_hand;
use std::io::Write;

/// Handle the eval command.
///
/// `tokens` may hold one card per entry or comma/space separated lists.
///
/// # Errors
///
/// `CliError::Game` for unknown card tokens, duplicates, or a card count
/// outside 5..=7.
pub fn handle_eval_command(tokens: &[String], out: &mut dyn Write) -> Result<(), CliError> {
    let cards = parse_cards(&tokens.join(" "))?;
    if cards.len() < 2 {
        return Err(CliError::InvalidInput(
            "expected two hole cards followed by the board".to_string(),
        ));
    }
    let (hole, board) = cards.split_at(2);
    let hand = evaluate_hand(hole, board)?;

    writeln!(out, "Hole: {}", format_cards(hole))?;
    writeln!(out, "Board: {}", format_cards(board))?;
    writeln!(out, "Hand: {}", hand.name())?;
    writeln!(out, "Best: {}", format_cards(&hand.cards))?;
    writeln!(out, "Strength: {}", hand.strength)?;
    Ok(())
}
