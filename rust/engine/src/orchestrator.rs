//! Turn order and AI seats.
//!
//! The orchestrator drives a table between human decisions: it applies an
//! action, moves the turn on, advances streets when a betting round closes and
//! lets AI seats act until a human must decide or the hand is over.

use rand::Rng;
use tracing::{debug, warn};

use crate::betting::{
    advance_to_next_phase, initialize_game, is_betting_closed, is_round_complete, process_action,
    rotate_dealer,
};
use crate::errors::GameError;
use crate::player::{Player, PlayerAction, PlayerStatus};
use crate::table::{next_actor_index, Table};

pub use crate::table::get_next_active_player_index;

/// Decision maker for AI-controlled seats.
///
/// Implementations see only the acting player and the street's call target.
///
/// # Example Implementation
///
/// ```rust
/// use holdem_engine::orchestrator::AIOpponent;
/// use holdem_engine::player::{Player, PlayerAction};
///
/// struct AlwaysFold;
///
/// impl AIOpponent for AlwaysFold {
///     fn decide(&self, _player: &Player, _current_bet: u32) -> PlayerAction {
///         PlayerAction::Fold
///     }
///
///     fn name(&self) -> &str {
///         "AlwaysFold"
///     }
/// }
/// ```
pub trait AIOpponent: Send + Sync {
    /// Choose an action for `player` given the table's current bet.
    fn decide(&self, player: &Player, current_bet: u32) -> PlayerAction;

    /// Return the name/identifier of this AI implementation.
    fn name(&self) -> &str;
}

/// Starts the next hand on `table` and plays AI seats until a human must act.
///
/// The button moves one funded seat clockwise before every hand except the first.
///
/// # Errors
///
/// [`GameError::HandInProgress`] while a street is open, plus any error from
/// [`initialize_game`].
pub fn start_hand<R: Rng + ?Sized>(table: &mut Table, rng: &mut R, ai: &dyn AIOpponent) -> Result<(), GameError> {
    if table.phase.is_betting() {
        return Err(GameError::HandInProgress);
    }
    if table.hand_number > 0 {
        rotate_dealer(table);
    }
    initialize_game(table, rng)?;
    run_out(table)?;
    process_ai_turns(table, ai)
}

/// Applies a human (or externally driven) action for the seat whose turn it is,
/// then moves the hand forward.
///
/// # Errors
///
/// - [`GameError::PlayerNotFound`] for an id not seated at the table
/// - [`GameError::NotPlayersTurn`] when another seat is to act
/// - any error from [`process_action`]; the table is unchanged in that case
pub fn player_action(
    table: &mut Table,
    player_id: &str,
    action: PlayerAction,
    ai: &dyn AIOpponent,
) -> Result<(), GameError> {
    if !table.phase.is_betting() {
        return Err(GameError::HandNotInProgress);
    }
    let seat = table.player_index(player_id)?;
    let expected = table
        .current_player()
        .ok_or_else(|| GameError::CorruptedTable("turn index out of range".to_string()))?;
    if seat != table.current_player_index {
        return Err(GameError::NotPlayersTurn {
            expected: expected.id.clone(),
            actual: player_id.to_string(),
        });
    }

    process_action(table, player_id, action)?;
    move_on(table, seat)?;
    process_ai_turns(table, ai)
}

/// Lets AI seats act while the turn sits with one of them.
///
/// Stops at a human seat or when the hand is finished. A decision the rules
/// reject is replaced by a fold so the hand keeps moving.
pub fn process_ai_turns(table: &mut Table, ai: &dyn AIOpponent) -> Result<(), GameError> {
    while table.phase.is_betting() {
        let seat = table.current_player_index;
        let Some(player) = table.players.get(seat) else {
            return Err(GameError::CorruptedTable("turn index out of range".to_string()));
        };
        if !player.is_ai() {
            break;
        }
        if player.status != PlayerStatus::Active {
            let next = next_actor_index(seat, &table.players);
            if next == seat {
                break;
            }
            table.current_player_index = next;
            continue;
        }

        let decision = ai.decide(player, table.current_bet);
        let player_id = player.id.clone();
        debug!(table_id = %table.id, %player_id, ai = ai.name(), ?decision, "ai decision");

        if let Err(e) = process_action(table, &player_id, decision) {
            if !e.is_validation() {
                return Err(e);
            }
            warn!(table_id = %table.id, %player_id, error = %e, "ai decision rejected, folding");
            process_action(table, &player_id, PlayerAction::Fold)?;
        }
        move_on(table, seat)?;
    }
    Ok(())
}

/// After `actor` has acted: either pass the turn or close the street.
fn move_on(table: &mut Table, actor: usize) -> Result<(), GameError> {
    if is_round_complete(table) || is_betting_closed(table) {
        run_out(table)
    } else {
        table.current_player_index = next_actor_index(actor, &table.players);
        Ok(())
    }
}

/// Advances streets for as long as no betting is possible, then points the
/// turn at a seat that can act.
fn run_out(table: &mut Table) -> Result<(), GameError> {
    while table.phase.is_betting() && (is_round_complete(table) || is_betting_closed(table)) {
        advance_to_next_phase(table)?;
    }
    if table.phase.is_betting() {
        let idx = table.current_player_index;
        if table.players[idx].status != PlayerStatus::Active {
            table.current_player_index = next_actor_index(idx, &table.players);
        }
    }
    Ok(())
}
