//! Table use cases over a store that serializes access per table.
//!
//! Every call is one read-apply-write cycle: the store hands out exclusive
//! access to a working copy of the table and commits it only when the whole
//! transition succeeded.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::info;

use crate::errors::GameError;
use crate::orchestrator::{self, AIOpponent};
use crate::player::{Player, PlayerAction, PlayerStatus, SeatType};
use crate::table::{Phase, Table, TableSettings};

pub type TableId = String;

/// Load/save boundary for table aggregates.
pub trait TableStore: Send + Sync {
    fn insert(&self, table: Table) -> Result<(), GameError>;

    /// Runs `f` with exclusive access to the table. Changes are kept only if
    /// `f` returns `Ok`.
    fn with_table<T, F>(&self, id: &str, f: F) -> Result<T, GameError>
    where
        F: FnOnce(&mut Table) -> Result<T, GameError>;

    fn ids(&self) -> Result<Vec<TableId>, GameError>;
}

/// Process-local store: one mutex per table, so different tables never contend.
#[derive(Debug, Default)]
pub struct InMemoryTableStore {
    tables: RwLock<HashMap<TableId, Arc<Mutex<Table>>>>,
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableStore for InMemoryTableStore {
    fn insert(&self, table: Table) -> Result<(), GameError> {
        let mut guard = self.tables.write().map_err(|_| GameError::StorePoisoned)?;
        guard.insert(table.id.clone(), Arc::new(Mutex::new(table)));
        Ok(())
    }

    fn with_table<T, F>(&self, id: &str, f: F) -> Result<T, GameError>
    where
        F: FnOnce(&mut Table) -> Result<T, GameError>,
    {
        let slot = {
            let guard = self.tables.read().map_err(|_| GameError::StorePoisoned)?;
            guard
                .get(id)
                .cloned()
                .ok_or_else(|| GameError::TableNotFound(id.to_string()))?
        };
        let mut table = slot.lock().map_err(|_| GameError::StorePoisoned)?;
        let mut working = table.clone();
        let out = f(&mut working)?;
        *table = working;
        Ok(out)
    }

    fn ids(&self) -> Result<Vec<TableId>, GameError> {
        let guard = self.tables.read().map_err(|_| GameError::StorePoisoned)?;
        let mut ids: Vec<TableId> = guard.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

/// Minimum number of seated players; AI seats fill up to it on join.
pub const MIN_PLAYERS: usize = 2;

pub struct TableService<S: TableStore> {
    store: S,
    ai: Box<dyn AIOpponent>,
    rng: Mutex<ChaCha20Rng>,
    starting_stack: u32,
    next_id: AtomicU64,
}

impl<S: TableStore> TableService<S> {
    /// `seed` makes shuffles reproducible; `None` seeds from the OS.
    pub fn new(store: S, ai: Box<dyn AIOpponent>, starting_stack: u32, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        Self {
            store,
            ai,
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
            starting_stack,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create_table(&self, settings: TableSettings) -> Result<TableId, GameError> {
        let id = format!("table-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        self.store.insert(Table::new(id.clone(), settings))?;
        info!(table_id = %id, small_blind = settings.small_blind, big_blind = settings.big_blind, "table created");
        Ok(id)
    }

    pub fn snapshot(&self, table_id: &str) -> Result<Table, GameError> {
        self.store.with_table(table_id, |t| Ok(t.clone()))
    }

    /// Seats a human player, then fills empty seats with AI players until at
    /// least [`MIN_PLAYERS`] are seated. A player joining mid-hand sits out
    /// until the next deal.
    pub fn join_table(&self, table_id: &str, user_id: &str, name: &str) -> Result<Table, GameError> {
        let stack = self.starting_stack;
        self.store.with_table(table_id, |table| {
            if table.players.len() >= table.max_players {
                return Err(GameError::TableFull);
            }
            if table.players.iter().any(|p| p.id == user_id) {
                return Err(GameError::AlreadySeated(user_id.to_string()));
            }
            let in_hand = table.phase.is_betting();
            let mut player = Player::human(user_id, name, stack, table.players.len());
            if in_hand {
                player.status = PlayerStatus::SittingOut;
            }
            table.players.push(player);
            let missing = MIN_PLAYERS.saturating_sub(table.players.len());
            seat_ai_players(table, missing, stack);
            info!(table_id = %table.id, user_id, seated = table.players.len(), "player joined");
            Ok(table.clone())
        })
    }

    /// Seats up to `count` more AI players; returns the table once no seat is left.
    ///
    /// # Errors
    ///
    /// [`GameError::TableFull`] when not a single seat is free.
    pub fn add_ai_players(&self, table_id: &str, count: usize) -> Result<Table, GameError> {
        let stack = self.starting_stack;
        self.store.with_table(table_id, |table| {
            if table.players.len() >= table.max_players {
                return Err(GameError::TableFull);
            }
            let added = seat_ai_players(table, count, stack);
            info!(table_id = %table.id, added, seated = table.players.len(), "ai players seated");
            Ok(table.clone())
        })
    }

    /// Removes a player between hands. When no human is left the table is
    /// emptied and returns to Waiting.
    pub fn leave_table(&self, table_id: &str, user_id: &str) -> Result<Table, GameError> {
        self.store.with_table(table_id, |table| {
            if table.phase.is_betting() {
                return Err(GameError::HandInProgress);
            }
            let idx = table.player_index(user_id)?;
            table.players.remove(idx);
            for (seat, p) in table.players.iter_mut().enumerate() {
                p.seat = seat;
            }
            if !table.players.iter().any(|p| p.seat_type == SeatType::Human) {
                table.players.clear();
                table.phase = Phase::Waiting;
                table.pot = 0;
                table.current_bet = 0;
                table.community_cards.clear();
                table.deck.clear();
                table.dealer_position = 0;
                table.current_player_index = 0;
            } else {
                // Keep the button on the same player; if the dealer left, park it
                // on the seat before so the next rotation reaches the following player.
                let len = table.players.len();
                if idx < table.dealer_position {
                    table.dealer_position -= 1;
                } else if idx == table.dealer_position {
                    table.dealer_position = (idx + len - 1) % len;
                }
                table.dealer_position %= len;
                table.current_player_index %= len;
            }
            info!(table_id = %table.id, user_id, seated = table.players.len(), "player left");
            Ok(table.clone())
        })
    }

    /// Deals the next hand and plays AI seats up to the first human decision.
    pub fn start_table(&self, table_id: &str) -> Result<Table, GameError> {
        // Draw a per-hand seed so the shared generator is not held while dealing.
        let hand_seed: u64 = self.rng.lock().map_err(|_| GameError::StorePoisoned)?.random();
        let mut rng = ChaCha20Rng::seed_from_u64(hand_seed);
        let ai = self.ai.as_ref();
        self.store.with_table(table_id, |table| {
            if table.players.len() < MIN_PLAYERS {
                return Err(GameError::NotEnoughPlayers(table.players.len()));
            }
            orchestrator::start_hand(table, &mut rng, ai)?;
            Ok(table.clone())
        })
    }

    pub fn player_action(&self, table_id: &str, player_id: &str, action: PlayerAction) -> Result<Table, GameError> {
        let ai = self.ai.as_ref();
        self.store.with_table(table_id, |table| {
            orchestrator::player_action(table, player_id, action, ai)?;
            Ok(table.clone())
        })
    }
}

/// Appends up to `count` AI players in free seats and returns how many were seated.
/// Players seated mid-hand sit out until the next deal.
fn seat_ai_players(table: &mut Table, count: usize, stack: u32) -> usize {
    let free = table.max_players.saturating_sub(table.players.len());
    let count = count.min(free);
    let in_hand = table.phase.is_betting();
    let mut bot = table.players.iter().filter(|p| p.is_ai()).count();
    for _ in 0..count {
        let seat = table.players.len();
        bot += 1;
        let mut n = seat;
        let mut id = format!("ai-{}-{}", table.id, n);
        while table.players.iter().any(|p| p.id == id) {
            n += 1;
            id = format!("ai-{}-{}", table.id, n);
        }
        let mut ai = Player::ai(id, format!("AI Player {}", bot), stack, seat);
        if in_hand {
            ai.status = PlayerStatus::SittingOut;
        }
        table.players.push(ai);
    }
    count
}
