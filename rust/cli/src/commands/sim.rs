//! Simulation command handler.
//!
//! Plays AI-only hands on a single table, checks chip conservation after every
//! hand and optionally records each hand as a JSONL line.
//!
//! Every hand is dealt from its own seed drawn from the base seed, so a run is
//! reproducible from `--seed` alone and each record carries the seed of its hand.

use crate::config::{self, Overrides};
use crate::error::CliError;
use crate::ui;
use holdem_ai::{create_ai, generate_ai_players};
use holdem_engine::logger::{HandLogger, HandRecord};
use holdem_engine::orchestrator::start_hand;
use holdem_engine::table::{Phase, Table};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::io::Write;
use tracing::info;

/// Handle the sim command.
///
/// # Errors
///
/// - `CliError::InvalidInput` if `hands` is 0
/// - `CliError::Engine` if a hand does not finish or chips are not conserved
/// - `CliError::Io` if the history file cannot be written
pub fn handle_sim_command(
    hands: u64,
    players: u8,
    output: Option<String>,
    overrides: &Overrides,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if hands == 0 {
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }
    let cfg = config::resolve(overrides)?.config;
    let seed = cfg.seed.unwrap_or_else(rand::random);
    let ai = create_ai(&cfg.ai)?;

    let mut settings = cfg.table_settings();
    settings.max_players = settings.max_players.max(usize::from(players));
    config::check_table_chips(cfg.starting_stack, settings.max_players)?;
    let mut table = Table::new("sim", settings);
    table.players = generate_ai_players(usize::from(players), cfg.starting_stack, 0);

    let mut logger = match &output {
        Some(path) => Some(HandLogger::create(path)?),
        None => None,
    };

    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut expected = table.total_chips();
    let mut unawarded = 0u64;
    let mut played = 0u64;

    for n in 1..=hands {
        if table.players.iter().filter(|p| p.stack > 0).count() < 2 {
            ui::display_warning(err, &format!("stopping after {} hands: one player holds every chip", played))?;
            break;
        }
        let hand_seed: u64 = rng.random();
        start_hand(&mut table, &mut ChaCha20Rng::seed_from_u64(hand_seed), ai.as_ref())?;
        if table.phase != Phase::Finished {
            return Err(CliError::Engine(format!("hand {} stopped in {:?}", n, table.phase)));
        }

        let odd = table.last_result.as_ref().map_or(0, |r| u64::from(r.unawarded));
        unawarded += odd;
        expected -= odd;
        if table.total_chips() != expected {
            return Err(CliError::Engine(format!(
                "chip conservation violated in hand {}: expected {}, found {}",
                n,
                expected,
                table.total_chips()
            )));
        }
        table.verify_cards()?;

        if let Some(logger) = logger.as_mut() {
            let hand_id = logger.next_id();
            logger.write(&HandRecord::from_table(&table, hand_id, Some(hand_seed)))?;
        }
        played += 1;
    }

    info!(hands = played, seed, unawarded, "simulation finished");
    writeln!(out, "Simulated: {} hands (seed {})", played, seed)?;
    writeln!(out, "Chips in play: {} (unawarded odd chips: {})", table.total_chips(), unawarded)?;
    for p in &table.players {
        writeln!(out, "  {}: {}", p.name, p.stack)?;
    }
    if let Some(path) = output {
        writeln!(out, "Hand histories: {}", path)?;
    }
    Ok(())
}
