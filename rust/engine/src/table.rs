use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;
use crate::hand::Winner;
use crate::logger::ActionRecord;
use crate::player::{Player, PlayerStatus};

/// Phases of a hand, in order. Only early termination skips ahead.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Waiting,
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
    Finished,
}

impl Phase {
    /// A betting street is open.
    pub fn is_betting(self) -> bool {
        matches!(self, Phase::PreFlop | Phase::Flop | Phase::Turn | Phase::River)
    }
}

/// What happens to chips left over when a split pot does not divide evenly.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddChipPolicy {
    /// Remainder is not awarded to anyone.
    #[default]
    Discard,
    /// Remainder goes to the first winner clockwise from the dealer.
    LeftOfDealer,
}

/// Table parameters chosen at creation.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct TableSettings {
    pub small_blind: u32,
    pub big_blind: u32,
    pub max_players: usize,
    #[serde(default)]
    pub odd_chip: OddChipPolicy,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            small_blind: 5,
            big_blind: 10,
            max_players: 6,
            odd_chip: OddChipPolicy::Discard,
        }
    }
}

/// Outcome of the last finished hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub pot: u32,
    /// Chips paid to each winner
    pub share: u32,
    /// Showdown winners; empty when the hand ended uncontested
    pub winners: Vec<Winner>,
    /// Set when everyone else folded
    pub uncontested: Option<String>,
    /// Chips from the pot that no one received
    pub unawarded: u32,
}

/// The round aggregate handed to the betting state machine by its owner.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub players: Vec<Player>,
    pub community_cards: Vec<Card>,
    pub dealer_position: usize,
    pub current_player_index: usize,
    pub small_blind: u32,
    pub big_blind: u32,
    pub max_players: usize,
    pub pot: u32,
    /// The street's call target
    pub current_bet: u32,
    pub deck: Vec<Card>,
    pub phase: Phase,
    #[serde(default)]
    pub odd_chip: OddChipPolicy,
    /// Hands started on this table
    #[serde(default)]
    pub hand_number: u32,
    /// Actions taken in the current hand
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
    #[serde(default)]
    pub last_result: Option<Settlement>,
}

impl Table {
    pub fn new(id: impl Into<String>, settings: TableSettings) -> Self {
        Self {
            id: id.into(),
            players: Vec::new(),
            community_cards: Vec::with_capacity(5),
            dealer_position: 0,
            current_player_index: 0,
            small_blind: settings.small_blind,
            big_blind: settings.big_blind,
            max_players: settings.max_players,
            pot: 0,
            current_bet: 0,
            deck: Vec::new(),
            phase: Phase::Waiting,
            odd_chip: settings.odd_chip,
            hand_number: 0,
            actions: Vec::new(),
            last_result: None,
        }
    }

    pub fn player_index(&self, player_id: &str) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or_else(|| GameError::PlayerNotFound(player_id.to_string()))
    }

    pub fn player(&self, player_id: &str) -> Result<&Player, GameError> {
        self.player_index(player_id).map(|i| &self.players[i])
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// Players not folded (Active or AllIn).
    pub fn live_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.status.is_live())
    }

    pub fn total_chips(&self) -> u64 {
        self.players.iter().map(|p| u64::from(p.stack)).sum::<u64>() + u64::from(self.pot)
    }

    /// Checks the card-conservation invariant: deck, hole cards and board
    /// together hold each card at most once (exactly 52 while a hand is live).
    pub fn verify_cards(&self) -> Result<(), GameError> {
        let mut all: Vec<Card> = self.deck.clone();
        all.extend(self.community_cards.iter().copied());
        for p in &self.players {
            all.extend(p.hole_cards.iter().copied());
        }
        crate::cards::ensure_unique(&all)?;
        if self.phase.is_betting() && all.len() != 52 {
            return Err(GameError::CorruptedTable(format!(
                "{} cards accounted for during {:?}",
                all.len(),
                self.phase
            )));
        }
        Ok(())
    }
}

/// Most chips a table may hold across stacks and pot; every stack and the pot
/// are `u32`.
pub const MAX_TABLE_CHIPS: u64 = u32::MAX as u64;

/// Small and big blind seats for a dealer position, ignoring seat eligibility.
pub fn calculate_blind_positions(dealer_position: usize, player_count: usize) -> (usize, usize) {
    (
        (dealer_position + 1) % player_count,
        (dealer_position + 2) % player_count,
    )
}

/// Next seat after `current` whose player is Active or AllIn, scanning at
/// most one lap. Returns `current` unchanged when there is none.
pub fn get_next_active_player_index(current: usize, players: &[Player]) -> usize {
    let n = players.len();
    if n == 0 {
        return current;
    }
    (1..=n)
        .map(|step| (current + step) % n)
        .find(|&i| players[i].status.is_live())
        .unwrap_or(current)
}

/// Next seat after `current` that can still put chips in (status Active).
/// Returns `current` unchanged when there is none.
pub fn next_actor_index(current: usize, players: &[Player]) -> usize {
    let mut i = current;
    for _ in 0..players.len() {
        i = get_next_active_player_index(i, players);
        if players[i].status == PlayerStatus::Active {
            return i;
        }
    }
    current
}

/// Next seat after `current` holding chips, used for button and blind placement.
pub(crate) fn next_funded_index(current: usize, players: &[Player]) -> usize {
    let n = players.len();
    if n == 0 {
        return current;
    }
    (1..=n)
        .map(|step| (current + step) % n)
        .find(|&i| players[i].stack > 0)
        .unwrap_or(current)
}
