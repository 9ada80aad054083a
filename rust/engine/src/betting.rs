//! Betting state machine: hand setup, action application, round completion,
//! street advancement and pot settlement.
//!
//! Every function takes the table aggregate by `&mut` and either applies the
//! whole transition or returns an error before touching it.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::cards::Card;
use crate::deck::{create_deck, deal_cards, shuffle_deck};
use crate::errors::GameError;
use crate::hand::find_winner;
use crate::logger::ActionRecord;
use crate::player::{PlayerAction, PlayerStatus};
use crate::rules::{validate_action, ValidatedAction};
use crate::table::{
    calculate_blind_positions, next_actor_index, next_funded_index, OddChipPolicy, Phase, Settlement, Table,
    MAX_TABLE_CHIPS,
};

/// Starts a new hand: resets players, shuffles, marks the dealer, posts blinds,
/// deals two hole cards to everyone with chips and opens pre-flop betting.
///
/// Players without chips sit the hand out. Blinds go to the next two funded
/// seats after the dealer; a player short of the blind posts what they have and
/// is all-in.
///
/// # Errors
///
/// - [`GameError::NotEnoughPlayers`] when fewer than two players hold chips
/// - [`GameError::ChipOverflow`] when the seated stacks exceed [`MAX_TABLE_CHIPS`]
pub fn initialize_game<R: Rng + ?Sized>(table: &mut Table, rng: &mut R) -> Result<(), GameError> {
    let n = table.players.len();
    let funded = table.players.iter().filter(|p| p.stack > 0).count();
    if n < 2 || funded < 2 {
        return Err(GameError::NotEnoughPlayers(funded.min(n)));
    }
    // Bounds the pot and every stack for the whole hand.
    let total = table.total_chips();
    if total > MAX_TABLE_CHIPS {
        return Err(GameError::ChipOverflow {
            total,
            limit: MAX_TABLE_CHIPS,
        });
    }

    // Deal into locals first so a failure leaves the table untouched.
    let mut deck = shuffle_deck(&create_deck(), rng);
    let mut hands = Vec::with_capacity(n);
    for p in &table.players {
        if p.stack > 0 {
            let (cards, rest) = deal_cards(&deck, 2)?;
            deck = rest;
            hands.push(cards);
        } else {
            hands.push(Vec::new());
        }
    }

    for (player, cards) in table.players.iter_mut().zip(hands) {
        player.reset_for_hand();
        player.hole_cards = cards;
    }

    let mut dealer = table.dealer_position % n;
    if table.players[dealer].stack == 0 {
        dealer = next_funded_index(dealer, &table.players);
    }
    table.dealer_position = dealer;
    table.players[dealer].is_dealer = true;

    let (sb, bb) = if table.players.iter().all(|p| p.stack > 0) {
        calculate_blind_positions(dealer, n)
    } else {
        let sb = next_funded_index(dealer, &table.players);
        (sb, next_funded_index(sb, &table.players))
    };

    table.pot = 0;
    for (seat, blind) in [(sb, table.small_blind), (bb, table.big_blind)] {
        let p = &mut table.players[seat];
        table.pot += p.commit(blind);
        if p.stack == 0 {
            p.status = PlayerStatus::AllIn;
        }
    }
    table.current_bet = table.players.iter().map(|p| p.current_bet).max().unwrap_or(0);

    table.deck = deck;
    table.community_cards.clear();
    table.actions.clear();
    table.last_result = None;
    table.hand_number += 1;
    table.phase = Phase::PreFlop;
    table.current_player_index = next_actor_index(bb, &table.players);

    info!(
        table_id = %table.id,
        hand = table.hand_number,
        dealer,
        small_blind_seat = sb,
        big_blind_seat = bb,
        pot = table.pot,
        "hand started"
    );
    Ok(())
}

/// Applies one action for `player_id`.
///
/// Turn order is not checked here; see [`crate::orchestrator::player_action`].
///
/// # Errors
///
/// - [`GameError::HandNotInProgress`] outside a betting street
/// - [`GameError::RoundComplete`] once only one player is left in the hand
/// - [`GameError::PlayerNotFound`] for an unknown id
/// - [`GameError::ChipOverflow`] if the pot could not hold the chips
/// - any validation error from [`validate_action`]
pub fn process_action(table: &mut Table, player_id: &str, action: PlayerAction) -> Result<(), GameError> {
    if !table.phase.is_betting() {
        return Err(GameError::HandNotInProgress);
    }
    if table.live_players().count() <= 1 {
        return Err(GameError::RoundComplete);
    }
    let seat = table.player_index(player_id)?;
    let validated = validate_action(&table.players[seat], table.current_bet, action).inspect_err(|e| {
        warn!(table_id = %table.id, player_id, ?action, error = %e, "action rejected");
    })?;
    let moved = match validated {
        ValidatedAction::Call(chips) | ValidatedAction::AllIn(chips) => chips,
        ValidatedAction::Raise { delta, .. } => delta,
        ValidatedAction::Fold | ValidatedAction::Check => 0,
    };
    chips_fit(table.pot, moved)?;

    let mut reopened = false;
    let player = &mut table.players[seat];
    match validated {
        ValidatedAction::Fold => player.status = PlayerStatus::Folded,
        ValidatedAction::Check => {}
        ValidatedAction::Call(chips) => {
            table.pot += player.commit(chips);
        }
        ValidatedAction::Raise { to, delta } => {
            table.pot += player.commit(delta);
            table.current_bet = to;
            reopened = true;
        }
        ValidatedAction::AllIn(chips) => {
            table.pot += player.commit(chips);
            player.status = PlayerStatus::AllIn;
            if player.current_bet > table.current_bet {
                table.current_bet = player.current_bet;
                reopened = true;
            }
        }
    }
    if player.stack == 0 && player.status == PlayerStatus::Active {
        player.status = PlayerStatus::AllIn;
    }
    player.has_acted = true;

    if reopened {
        for (i, other) in table.players.iter_mut().enumerate() {
            if i != seat && other.status == PlayerStatus::Active {
                other.has_acted = false;
            }
        }
    }

    table.actions.push(ActionRecord {
        player_id: player_id.to_string(),
        phase: table.phase,
        action,
    });
    debug!(
        table_id = %table.id,
        player_id,
        ?action,
        pot = table.pot,
        current_bet = table.current_bet,
        "action applied"
    );
    Ok(())
}

/// True when at most one player is left in the hand, or every Active player
/// has acted and matched the current bet.
pub fn is_round_complete(table: &Table) -> bool {
    if table.live_players().count() <= 1 {
        return true;
    }
    table
        .players
        .iter()
        .filter(|p| p.status == PlayerStatus::Active)
        .all(|p| p.has_acted && p.current_bet == table.current_bet)
}

/// No further betting is possible this hand: at most one player can still put
/// chips in and that player owes nothing.
pub fn is_betting_closed(table: &Table) -> bool {
    let mut active = table.players.iter().filter(|p| p.status == PlayerStatus::Active);
    let can_bet = active.clone().count();
    can_bet <= 1 && active.all(|p| p.current_bet >= table.current_bet)
}

/// Moves to the next phase, dealing the flop (3), turn (1) or river (1).
///
/// Street fields are reset on every player still in the hand. Leaving the
/// river settles the pot and finishes the hand; so does any advance once only
/// one player remains.
///
/// # Errors
///
/// [`GameError::HandNotInProgress`] outside a betting street and
/// [`GameError::DeckExhausted`] if the deck cannot supply the cards.
pub fn advance_to_next_phase(table: &mut Table) -> Result<(), GameError> {
    if !table.phase.is_betting() {
        return Err(GameError::HandNotInProgress);
    }
    if table.live_players().count() <= 1 {
        table.phase = Phase::Showdown;
        return settle(table);
    }

    let (next, count) = match table.phase {
        Phase::PreFlop => (Phase::Flop, 3),
        Phase::Flop => (Phase::Turn, 1),
        Phase::Turn => (Phase::River, 1),
        _ => (Phase::Showdown, 0),
    };
    let (cards, rest) = deal_cards(&table.deck, count)?;

    for p in table.players.iter_mut().filter(|p| p.status.is_live()) {
        p.has_acted = false;
        p.current_bet = 0;
    }
    table.current_bet = 0;
    table.deck = rest;
    table.community_cards.extend(cards);
    table.phase = next;

    if next == Phase::Showdown {
        return settle(table);
    }
    table.current_player_index = (table.dealer_position + 1) % table.players.len();
    info!(
        table_id = %table.id,
        phase = ?next,
        board = ?table.community_cards.iter().map(|c| c.token()).collect::<Vec<_>>(),
        "phase advanced"
    );
    Ok(())
}

/// Pays the pot out and marks the hand finished.
///
/// A lone remaining player takes everything. Otherwise the best hands split
/// the pot in equal integer shares; the remainder follows the table's
/// [`OddChipPolicy`].
pub fn determine_winner(table: &mut Table) -> Result<Settlement, GameError> {
    let live: Vec<usize> = (0..table.players.len())
        .filter(|&i| table.players[i].status.is_live())
        .collect();
    let pot = table.pot;

    let settlement = match live.as_slice() {
        [] => {
            return Err(GameError::CorruptedTable(
                "no players left to award the pot".to_string(),
            ))
        }
        [only] => {
            let winner = &mut table.players[*only];
            chips_fit(winner.stack, pot)?;
            winner.stack += pot;
            Settlement {
                pot,
                share: pot,
                winners: Vec::new(),
                uncontested: Some(winner.id.clone()),
                unawarded: 0,
            }
        }
        _ => {
            let contenders: Vec<(&str, &[Card])> = live
                .iter()
                .map(|&i| (table.players[i].id.as_str(), table.players[i].hole_cards.as_slice()))
                .collect();
            let winners = find_winner(&contenders, &table.community_cards)?;
            let count = winners.len() as u32;
            let share = pot / count;
            let mut unawarded = pot % count;

            let seats = winners
                .iter()
                .map(|w| table.player_index(&w.player_id))
                .collect::<Result<Vec<_>, _>>()?;
            for &i in &seats {
                chips_fit(table.players[i].stack, pot)?;
            }
            for &i in &seats {
                table.players[i].stack += share;
            }
            if unawarded > 0 {
                match table.odd_chip {
                    OddChipPolicy::Discard => {
                        warn!(table_id = %table.id, pot, unawarded, "odd chips not awarded");
                    }
                    OddChipPolicy::LeftOfDealer => {
                        let n = table.players.len();
                        let seat = (1..=n)
                            .map(|step| (table.dealer_position + step) % n)
                            .find(|&i| winners.iter().any(|w| w.player_id == table.players[i].id));
                        if let Some(seat) = seat {
                            table.players[seat].stack += unawarded;
                            unawarded = 0;
                        }
                    }
                }
            }
            Settlement {
                pot,
                share,
                winners,
                uncontested: None,
                unawarded,
            }
        }
    };
    Ok(settlement)
}

fn chips_fit(held: u32, added: u32) -> Result<(), GameError> {
    let total = u64::from(held) + u64::from(added);
    if total > MAX_TABLE_CHIPS {
        return Err(GameError::ChipOverflow {
            total,
            limit: MAX_TABLE_CHIPS,
        });
    }
    Ok(())
}

fn settle(table: &mut Table) -> Result<(), GameError> {
    let settlement = determine_winner(table)?;
    info!(
        table_id = %table.id,
        pot = settlement.pot,
        share = settlement.share,
        winners = ?settlement
            .winners
            .iter()
            .map(|w| w.player_id.as_str())
            .chain(settlement.uncontested.as_deref())
            .collect::<Vec<_>>(),
        "pot settled"
    );
    table.pot = 0;
    table.current_bet = 0;
    table.last_result = Some(settlement);
    table.phase = Phase::Finished;
    Ok(())
}

/// Moves the button to the next seat holding chips.
pub fn rotate_dealer(table: &mut Table) {
    if table.players.is_empty() {
        return;
    }
    let from = table.dealer_position % table.players.len();
    table.dealer_position = next_funded_index(from, &table.players);
}
