//! # Play Command
//!
//! Interactive Hold'em against AI opponents.
//!
//! The human always sits in seat 0 of a fresh table; AI seats fill the rest.
//! Actions are read line by line from stdin (`fold`, `check`, `call`,
//! `raise <to>`, `allin`, `q`). Illegal actions are reported and re-prompted;
//! EOF or `q` ends the session cleanly.

use crate::config::{self, Overrides};
use crate::error::CliError;
use crate::ui::{self, format_cards};
use holdem_ai::create_ai;
use holdem_engine::logger::ActionRecord;
use holdem_engine::player::PlayerAction;
use holdem_engine::service::{InMemoryTableStore, TableService};
use holdem_engine::table::Table;
use std::io::{BufRead, Write};

const HERO: &str = "hero";

/// Handle the play command.
///
/// # Errors
///
/// `CliError::InvalidInput` if `hands` is 0, `CliError::Config` for an invalid
/// configuration or AI type, `CliError::Io` on read/write failures.
pub fn handle_play_command(
    bots: u8,
    hands: u32,
    overrides: &Overrides,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    if hands == 0 {
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }
    let cfg = config::resolve(overrides)?.config;
    let seed = cfg.seed.unwrap_or_else(rand::random);
    let ai = create_ai(&cfg.ai)?;

    let mut settings = cfg.table_settings();
    settings.max_players = settings.max_players.max(usize::from(bots) + 1);
    config::check_table_chips(cfg.starting_stack, settings.max_players)?;

    let service = TableService::new(InMemoryTableStore::new(), ai, cfg.starting_stack, Some(seed));
    let table_id = service.create_table(settings)?;
    service.join_table(&table_id, HERO, "Hero")?;
    if bots > 1 {
        service.add_ai_players(&table_id, usize::from(bots) - 1)?;
    }

    writeln!(out, "play: bots={} hands={} seed={}", bots, hands, seed)?;
    writeln!(out, "Blinds: SB={} BB={}", settings.small_blind, settings.big_blind)?;

    let mut played = 0u32;
    'hands: for i in 1..=hands {
        let table = service.snapshot(&table_id)?;
        if table.player(HERO)?.stack == 0 {
            writeln!(out, "You are out of chips.")?;
            break;
        }
        if table.players.iter().filter(|p| p.stack > 0).count() < 2 {
            writeln!(out, "No opponent has chips left.")?;
            break;
        }

        writeln!(out, "Hand {}", i)?;
        let mut table = service.start_table(&table_id)?;
        let mut shown = 0;
        loop {
            shown = show_actions(&table, shown, out)?;
            if !table.phase.is_betting() {
                show_result(&table, out)?;
                played += 1;
                break;
            }
            show_state(&table, out)?;
            write!(out, "Enter action (fold/check/call/raise N/allin/q): ")?;
            out.flush()?;

            let Some(input) = read_line(stdin)? else {
                writeln!(out)?;
                break 'hands;
            };
            if input.is_empty() {
                continue;
            }
            if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
                break 'hands;
            }
            let action = match input.parse::<PlayerAction>() {
                Ok(a) => a,
                Err(e) => {
                    ui::write_error(err, &e.to_string())?;
                    continue;
                }
            };
            match service.player_action(&table_id, HERO, action) {
                Ok(t) => table = t,
                Err(e) if e.is_validation() => ui::write_error(err, &format!("Invalid action: {}", e))?,
                Err(e) => return Err(e.into()),
            }
        }
    }

    writeln!(out, "Session over: {} hand(s) played", played)?;
    for p in &service.snapshot(&table_id)?.players {
        writeln!(out, "  {}: {}", p.name, p.stack)?;
    }
    Ok(())
}

fn read_line(stdin: &mut dyn BufRead) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    match stdin.read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line.trim().to_string())),
    }
}

/// Prints actions recorded since index `from` and returns the new count.
fn show_actions(table: &Table, from: usize, out: &mut dyn Write) -> Result<usize, CliError> {
    for rec in table.actions.iter().skip(from) {
        writeln!(out, "  {}", describe(table, rec))?;
    }
    Ok(table.actions.len())
}

fn describe(table: &Table, rec: &ActionRecord) -> String {
    let name = table.player(&rec.player_id).map_or(rec.player_id.as_str(), |p| p.name.as_str());
    let what = match rec.action {
        PlayerAction::Fold => "folds".to_string(),
        PlayerAction::Check => "checks".to_string(),
        PlayerAction::Call => "calls".to_string(),
        PlayerAction::Raise(to) => format!("raises to {}", to),
        PlayerAction::AllIn => "goes all-in".to_string(),
    };
    format!("{} {}", name, what)
}

fn show_state(table: &Table, out: &mut dyn Write) -> Result<(), CliError> {
    let hero = table.player(HERO)?;
    writeln!(out, "Board: {}", format_cards(&table.community_cards))?;
    writeln!(out, "Pot: {}", table.pot)?;
    writeln!(
        out,
        "Your cards: {}  Stack: {}  To call: {}",
        format_cards(&hero.hole_cards),
        hero.stack,
        hero.to_call(table.current_bet)
    )?;
    Ok(())
}

fn show_result(table: &Table, out: &mut dyn Write) -> Result<(), CliError> {
    let Some(result) = &table.last_result else {
        return Ok(());
    };
    if let Some(id) = &result.uncontested {
        let name = table.player(id).map_or(id.as_str(), |p| p.name.as_str());
        writeln!(out, "{} wins {} uncontested", name, result.pot)?;
        return Ok(());
    }
    writeln!(out, "Board: {}", format_cards(&table.community_cards))?;
    for p in table.players.iter().filter(|p| p.status.is_live()) {
        writeln!(out, "  {} shows {}", p.name, format_cards(&p.hole_cards))?;
    }
    for w in &result.winners {
        let name = table.player(&w.player_id).map_or(w.player_id.as_str(), |p| p.name.as_str());
        writeln!(out, "{} wins {} with {}", name, result.share, w.hand.name())?;
    }
    Ok(())
}
