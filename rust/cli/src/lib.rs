//! # Holdem CLI Library
//!
//! Command-line front end for the `holdem-engine` table engine.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line arguments
//! and executes the appropriate subcommand.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["holdem", "sim", "--hands", "100", "--seed", "42"];
//! let code = holdem_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `deal`: Deal two hands and a board for inspection
//! - `eval`: Evaluate a hand from card tokens
//! - `play`: Play hands against AI opponents on stdin
//! - `sim`: Run AI-only hands, verify chip conservation, write hand histories
//! - `cfg`: Display resolved configuration and value sources

use clap::Parser;
use std::io::Write;

pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod logging;
pub mod ui;

use cli::{Commands, HoldemCli};
use commands::{
    handle_cfg_command, handle_deal_command, handle_eval_command, handle_play_command,
    handle_sim_command,
};
use config::Overrides;

pub use error::CliError;

const COMMANDS: &[&str] = &["deal", "eval", "play", "sim", "cfg"];

/// Main entry point for the CLI application.
///
/// Parses command-line arguments and dispatches to the appropriate subcommand handler.
///
/// # Returns
///
/// Exit code: [`exit_code::SUCCESS`] on success, [`exit_code::ERROR`] otherwise.
///
/// # Example
///
/// ```
/// use std::io;
/// let args = vec!["holdem", "deal", "--seed", "42"];
/// let code = holdem_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match HoldemCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_parse_error(&e, out, err),
    };

    let result = match cli.cmd {
        Commands::Deal { seed } => handle_deal_command(seed, out),
        Commands::Eval { cards } => handle_eval_command(&cards, out),
        Commands::Play { bots, hands, table } => {
            // Real stdin; tests drive the handler with a Cursor instead
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_play_command(bots, hands, &Overrides::from(&table), out, err, &mut stdin_lock)
        }
        Commands::Sim {
            hands,
            players,
            output,
            table,
        } => handle_sim_command(hands, players, output, &Overrides::from(&table), out, err),
        Commands::Cfg => handle_cfg_command(out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = writeln!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}

fn report_parse_error(e: &clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version go to stdout and exit 0
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => exit_code::SUCCESS,
            Err(_) => exit_code::ERROR,
        };
    }

    let _ = writeln!(err, "{}", e);
    let _ = writeln!(err, "Holdem CLI");
    let _ = writeln!(err, "Usage: holdem <command> [options]\n");
    let _ = writeln!(err, "Commands:");
    for c in COMMANDS {
        let _ = writeln!(err, "  {}", c);
    }
    let _ = writeln!(err, "\nFor full help, run: holdem --help");
    exit_code::ERROR
}
