//! Passive rule-based opponent.
//!
//! Checks when nothing is owed, calls whenever the stack covers the bet and
//! folds otherwise. It never raises, which makes it a predictable filler seat
//! for tests and simulations.

use crate::AIOpponent;
use holdem_engine::player::{Player, PlayerAction};

/// Check if free, call if affordable, else fold.
///
/// # Example
///
/// ```rust
/// use holdem_ai::AIOpponent;
/// use holdem_ai::check_call::CheckCallFold;
/// use holdem_engine::player::{Player, PlayerAction};
///
/// let ai = CheckCallFold::new();
/// let bot = Player::ai("ai-1", "AI Player 1", 100, 1);
///
/// assert_eq!(ai.decide(&bot, 0), PlayerAction::Check);
/// assert_eq!(ai.decide(&bot, 40), PlayerAction::Call);
/// assert_eq!(ai.decide(&bot, 500), PlayerAction::Fold);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckCallFold;

impl CheckCallFold {
    pub fn new() -> Self {
        Self
    }
}

impl AIOpponent for CheckCallFold {
    fn decide(&self, player: &Player, current_bet: u32) -> PlayerAction {
        let to_call = player.to_call(current_bet);
        if to_call == 0 {
            PlayerAction::Check
        } else if player.stack >= to_call {
            PlayerAction::Call
        } else {
            PlayerAction::Fold
        }
    }

    fn name(&self) -> &str {
        "CheckCallFold"
    }
}
