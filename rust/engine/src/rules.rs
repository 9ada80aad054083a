use crate::errors::GameError;
use crate::player::{Player, PlayerAction as A, PlayerStatus};

/// An action that passed validation, with the chips it will move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    /// Chips moved from stack to pot
    Call(u32),
    /// New street total and the chips moved to reach it
    Raise { to: u32, delta: u32 },
    /// Whole remaining stack
    AllIn(u32),
}

/// Validates a player action against the table's current bet.
///
/// Validation never mutates anything; the caller applies the returned
/// [`ValidatedAction`] only on success.
///
/// # Errors
///
/// - [`GameError::PlayerCannotAct`] - player is folded, all-in or sitting out
/// - [`GameError::CannotCheck`] - checking while facing a bet
/// - [`GameError::InsufficientStack`] - call or raise the stack cannot cover, or all-in with no chips
/// - [`GameError::RaiseTooSmall`] - raise total not above the current bet
///
/// # Examples
///
/// ```
/// use holdem_engine::player::{Player, PlayerAction};
/// use holdem_engine::rules::{validate_action, ValidatedAction};
/// use holdem_engine::errors::GameError;
///
/// let mut p = Player::human("u1", "Ann", 1000, 0);
/// p.current_bet = 10;
///
/// assert_eq!(validate_action(&p, 50, PlayerAction::Call), Ok(ValidatedAction::Call(40)));
/// assert_eq!(
///     validate_action(&p, 50, PlayerAction::Raise(120)),
///     Ok(ValidatedAction::Raise { to: 120, delta: 110 })
/// );
/// assert!(matches!(
///     validate_action(&p, 50, PlayerAction::Check),
///     Err(GameError::CannotCheck { to_call: 40 })
/// ));
/// ```
pub fn validate_action(player: &Player, table_bet: u32, action: A) -> Result<ValidatedAction, GameError> {
    if player.status != PlayerStatus::Active {
        return Err(GameError::PlayerCannotAct(player.id.clone()));
    }
    let to_call = player.to_call(table_bet);
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => {
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(GameError::CannotCheck { to_call })
            }
        }
        A::Call => {
            if player.stack < to_call {
                Err(GameError::InsufficientStack {
                    required: to_call,
                    available: player.stack,
                })
            } else {
                Ok(ValidatedAction::Call(to_call))
            }
        }
        A::Raise(amount) => {
            if amount <= table_bet {
                return Err(GameError::RaiseTooSmall {
                    amount,
                    current_bet: table_bet,
                });
            }
            let delta = amount - player.current_bet;
            if delta > player.stack {
                return Err(GameError::InsufficientStack {
                    required: delta,
                    available: player.stack,
                });
            }
            Ok(ValidatedAction::Raise { to: amount, delta })
        }
        A::AllIn => {
            if player.stack == 0 {
                Err(GameError::InsufficientStack {
                    required: 1,
                    available: 0,
                })
            } else {
                Ok(ValidatedAction::AllIn(player.stack))
            }
        }
    }
}
