//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::config::Overrides;

#[derive(Parser, Debug)]
#[command(
    name = "holdem",
    version,
    about = "Texas Hold'em table engine: deal, evaluate, play and simulate hands"
)]
pub struct HoldemCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deal two hands and a board
    Deal {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Evaluate two hole cards plus 3 to 5 board cards, e.g. `A_hearts K_hearts Q_hearts J_hearts 10_hearts`
    Eval {
        #[arg(required = true)]
        cards: Vec<String>,
    },
    /// Play against AI opponents, reading actions from stdin
    Play {
        /// Number of AI opponents
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=9))]
        bots: u8,
        /// Number of hands to play
        #[arg(long, default_value_t = 1)]
        hands: u32,
        #[command(flatten)]
        table: TableArgs,
    },
    /// Simulate AI-only hands and verify chip conservation
    Sim {
        #[arg(long)]
        hands: u64,
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=10))]
        players: u8,
        /// Write hand histories as JSONL
        #[arg(long)]
        output: Option<String>,
        #[command(flatten)]
        table: TableArgs,
    },
    /// Print the resolved configuration and where each value came from
    Cfg,
}

/// Table flags shared by `play` and `sim`; they override config file and environment.
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub starting_stack: Option<u32>,
    #[arg(long)]
    pub small_blind: Option<u32>,
    #[arg(long)]
    pub big_blind: Option<u32>,
    /// AI type (baseline, check-call)
    #[arg(long)]
    pub ai: Option<String>,
}

impl From<&TableArgs> for Overrides {
    fn from(args: &TableArgs) -> Self {
        Overrides {
            starting_stack: args.starting_stack,
            small_blind: args.small_blind,
            big_blind: args.big_blind,
            seed: args.seed,
            ai: args.ai.clone(),
        }
    }
}
