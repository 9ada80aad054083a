use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;

/// Who decides for a seat.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatType {
    Human,
    Ai,
}

/// Participation of a player in the current hand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// Still in the hand and able to act
    Active,
    /// Gave up the hand
    Folded,
    /// Whole stack committed; stays in the hand without acting
    AllIn,
    /// Not dealt in
    SittingOut,
}

impl PlayerStatus {
    /// Still contesting the pot.
    pub fn is_live(self) -> bool {
        matches!(self, PlayerStatus::Active | PlayerStatus::AllIn)
    }
}

/// Represents a player action during a betting round.
///
/// `Raise` carries the new street total the player is raising *to*.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "amount", rename_all = "snake_case")]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check (only valid when nothing is owed)
    Check,
    /// Match the table's current bet
    Call,
    /// Raise the table's current bet to the given total
    Raise(u32),
    /// Commit all remaining chips
    AllIn,
}

/// Action kind as received from the API layer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
}

/// An action request: kind plus an optional amount (required for raises).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
}

impl TryFrom<ActionRequest> for PlayerAction {
    type Error = GameError;

    fn try_from(req: ActionRequest) -> Result<Self, Self::Error> {
        Ok(match req.action {
            ActionKind::Fold => PlayerAction::Fold,
            ActionKind::Check => PlayerAction::Check,
            ActionKind::Call => PlayerAction::Call,
            ActionKind::Raise => PlayerAction::Raise(req.amount.ok_or(GameError::MissingRaiseAmount)?),
            ActionKind::AllIn => PlayerAction::AllIn,
        })
    }
}

impl std::str::FromStr for PlayerAction {
    type Err = GameError;

    /// Parses `fold`, `check`, `call`, `raise <amount>` or `all_in`/`allin`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
        let action = match verb.as_str() {
            "fold" | "f" => PlayerAction::Fold,
            "check" | "x" => PlayerAction::Check,
            "call" | "c" => PlayerAction::Call,
            "allin" | "all_in" | "all-in" => PlayerAction::AllIn,
            "raise" | "r" => {
                let amount = parts.next().ok_or(GameError::MissingRaiseAmount)?;
                let amount = amount
                    .parse()
                    .map_err(|_| GameError::UnknownAction(s.to_string()))?;
                PlayerAction::Raise(amount)
            }
            _ => return Err(GameError::UnknownAction(s.to_string())),
        };
        Ok(action)
    }
}

/// A seated player. Street-scoped fields (`current_bet`, `has_acted`) are reset
/// by the betting state machine at each phase change.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub seat_type: SeatType,
    pub stack: u32,
    /// Chips committed on the current street
    pub current_bet: u32,
    pub hole_cards: Vec<Card>,
    pub seat: usize,
    pub status: PlayerStatus,
    pub is_dealer: bool,
    pub has_acted: bool,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>, seat_type: SeatType, stack: u32, seat: usize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            seat_type,
            stack,
            current_bet: 0,
            hole_cards: Vec::with_capacity(2),
            seat,
            status: PlayerStatus::Active,
            is_dealer: false,
            has_acted: false,
        }
    }

    pub fn human(id: impl Into<String>, name: impl Into<String>, stack: u32, seat: usize) -> Self {
        Self::new(id, name, SeatType::Human, stack, seat)
    }

    pub fn ai(id: impl Into<String>, name: impl Into<String>, stack: u32, seat: usize) -> Self {
        Self::new(id, name, SeatType::Ai, stack, seat)
    }

    pub fn is_ai(&self) -> bool {
        self.seat_type == SeatType::Ai
    }

    /// Chips still needed to match `table_bet`.
    pub fn to_call(&self, table_bet: u32) -> u32 {
        table_bet.saturating_sub(self.current_bet)
    }

    /// Moves up to `amount` chips from stack into the street commitment and
    /// returns how many actually moved.
    pub(crate) fn commit(&mut self, amount: u32) -> u32 {
        let moved = amount.min(self.stack);
        self.stack -= moved;
        self.current_bet += moved;
        moved
    }

    pub(crate) fn reset_for_hand(&mut self) {
        self.hole_cards.clear();
        self.current_bet = 0;
        self.has_acted = false;
        self.is_dealer = false;
        self.status = if self.stack > 0 {
            PlayerStatus::Active
        } else {
            PlayerStatus::SittingOut
        };
    }
}
