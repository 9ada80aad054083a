//! # holdem-engine: Texas Hold'em Table Core
//!
//! A multi-seat Texas Hold'em table engine. It owns no I/O: callers load a
//! [`table::Table`] aggregate, pass it by `&mut` into the transition functions
//! here, and persist the result.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and the `<rank>_<suit>` token format
//! - [`deck`] - Deck construction, shuffling and fail-fast dealing
//! - [`hand`] - Best-of-seven hand evaluation with a single comparable strength
//! - [`rules`] - Action legality against the current bet
//! - [`betting`] - Hand setup, action application, street advancement and settlement
//! - [`orchestrator`] - Turn order and AI seats
//! - [`service`] - Join/leave/start/act use cases over a per-table locked store
//! - [`table`] - The table aggregate, phases and seat scanning
//! - [`player`] - Players, seat types, statuses and actions
//! - [`logger`] - Action records and JSONL hand histories
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::cards::parse_cards;
//! use holdem_engine::hand::evaluate_hand;
//!
//! let hole = parse_cards("A_hearts K_hearts").unwrap();
//! let board = parse_cards("Q_hearts J_hearts 10_hearts 2_clubs 3_diamonds").unwrap();
//!
//! let hand = evaluate_hand(&hole, &board).unwrap();
//! println!("Hand: {} ({})", hand.name(), hand.strength);
//! ```
//!
//! ## Playing a Hand
//!
//! ```rust
//! use holdem_engine::betting::{initialize_game, is_round_complete, process_action};
//! use holdem_engine::player::{Player, PlayerAction};
//! use holdem_engine::table::{Phase, Table, TableSettings};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let mut table = Table::new("t1", TableSettings::default());
//! table.players.push(Player::human("alice", "Alice", 1000, 0));
//! table.players.push(Player::human("bob", "Bob", 1000, 1));
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(7);
//! initialize_game(&mut table, &mut rng).unwrap();
//! assert_eq!(table.phase, Phase::PreFlop);
//!
//! // heads-up: the dealer is the big blind here, seat 1 acts first
//! process_action(&mut table, "bob", PlayerAction::Fold).unwrap();
//! assert!(is_round_complete(&table));
//! ```

pub mod betting;
pub mod cards;
pub mod deck;
pub mod errors;
pub mod hand;
pub mod logger;
pub mod orchestrator;
pub mod player;
pub mod rules;
pub mod service;
pub mod table;
