//! # holdem-ai: AI Opponents for the Hold'em Table
//!
//! Decision makers for AI-controlled seats. Every opponent implements the
//! engine's [`AIOpponent`] trait, so the orchestrator can drive any of them.
//!
//! ## Core Components
//!
//! - [`AIOpponent`] - Decision interface (re-exported from the engine)
//! - [`check_call`] - Check/call/fold opponent
//! - [`create_ai`] - Factory for opponents by name
//! - [`generate_ai_players`] - Fresh AI seats for filling a table
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_ai::{create_ai, generate_ai_players};
//! use holdem_engine::orchestrator::start_hand;
//! use holdem_engine::table::{Table, TableSettings};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let ai = create_ai("baseline").unwrap();
//! let mut table = Table::new("demo", TableSettings::default());
//! table.players = generate_ai_players(3, 1000, 0);
//!
//! // with only AI seats the whole hand plays out
//! start_hand(&mut table, &mut ChaCha20Rng::seed_from_u64(42), ai.as_ref()).unwrap();
//! assert!(!table.phase.is_betting());
//! ```
//!
//! ## AI Types
//!
//! - `"baseline"` / `"check-call"` - [`check_call::CheckCallFold`]

use holdem_engine::player::Player;
use thiserror::Error;

pub use holdem_engine::orchestrator::AIOpponent;

pub mod check_call;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AiError {
    #[error("Unknown AI type: {0}")]
    UnknownType(String),
}

/// Names accepted by [`create_ai`].
pub const AI_TYPES: &[&str] = &["baseline", "check-call"];

/// Creates an opponent by type name.
///
/// # Errors
///
/// [`AiError::UnknownType`] for a name not listed in [`AI_TYPES`].
///
/// # Example
///
/// ```rust
/// use holdem_ai::create_ai;
///
/// let ai = create_ai("baseline").unwrap();
/// assert_eq!(ai.name(), "CheckCallFold");
/// assert!(create_ai("shark").is_err());
/// ```
pub fn create_ai(ai_type: &str) -> Result<Box<dyn AIOpponent>, AiError> {
    match ai_type {
        "baseline" | "check-call" => {
            tracing::debug!(ai_type, "creating check/call opponent");
            Ok(Box::new(check_call::CheckCallFold::new()))
        }
        other => Err(AiError::UnknownType(other.to_string())),
    }
}

/// Builds `count` AI players with `starting_stack` chips, seated from
/// `first_seat` onward and named "AI Player 1", "AI Player 2", ...
pub fn generate_ai_players(count: usize, starting_stack: u32, first_seat: usize) -> Vec<Player> {
    (0..count)
        .map(|i| {
            let seat = first_seat + i;
            Player::ai(format!("ai-{seat}"), format!("AI Player {}", i + 1), starting_stack, seat)
        })
        .collect()
}
