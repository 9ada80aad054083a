use thiserror::Error;

use crate::cards::Card;

/// Broad class of a [`GameError`], used by callers to decide how to surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Illegal request for the current state; nothing was mutated.
    Validation,
    /// Referenced table or player does not exist.
    NotFound,
    /// Corrupted state detected. Not retryable.
    Invariant,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cannot check, must call or raise (to call: {to_call})")]
    CannotCheck { to_call: u32 },
    #[error("Insufficient stack: required {required}, available {available}")]
    InsufficientStack { required: u32, available: u32 },
    #[error("Raise amount must be greater than current bet: {amount} <= {current_bet}")]
    RaiseTooSmall { amount: u32, current_bet: u32 },
    #[error("Raise requires an amount")]
    MissingRaiseAmount,
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Not your turn (expected player {expected}, got {actual})")]
    NotPlayersTurn { expected: String, actual: String },
    #[error("Player {0} cannot act")]
    PlayerCannotAct(String),
    #[error("No hand in progress")]
    HandNotInProgress,
    #[error("Betting round is already complete")]
    RoundComplete,
    #[error("Hand already in progress")]
    HandInProgress,
    #[error("Need at least 2 players to start (have {0})")]
    NotEnoughPlayers(usize),
    #[error("Chips on the table would exceed {limit}: {total}")]
    ChipOverflow { total: u64, limit: u64 },
    #[error("Table is full")]
    TableFull,
    #[error("Player {0} has already joined this table")]
    AlreadySeated(String),
    #[error("Invalid card token: {0}")]
    InvalidCard(String),
    #[error("Not enough cards to evaluate: {0} (need at least 5)")]
    NotEnoughCards(usize),
    #[error("Too many cards to evaluate: {0} (at most 7)")]
    TooManyCards(usize),
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Player not found: {0}")]
    PlayerNotFound(String),
    #[error("Deck exhausted: requested {requested}, remaining {remaining}")]
    DeckExhausted { requested: usize, remaining: usize },
    #[error("Duplicate card detected: {0}")]
    DuplicateCard(Card),
    #[error("Corrupted table state: {0}")]
    CorruptedTable(String),
    #[error("Table storage poisoned")]
    StorePoisoned,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::TableNotFound(_) | GameError::PlayerNotFound(_) => ErrorKind::NotFound,
            GameError::DeckExhausted { .. }
            | GameError::DuplicateCard(_)
            | GameError::CorruptedTable(_)
            | GameError::StorePoisoned => ErrorKind::Invariant,
            _ => ErrorKind::Validation,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}
