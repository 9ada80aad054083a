use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::player::PlayerAction;
use crate::table::{Phase, Table};

/// Records a single player action during a hand.
/// Associates the action with the player and the phase when it occurred.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Player identifier
    pub player_id: String,
    /// The betting phase when this action occurred
    pub phase: Phase,
    /// The action taken by the player
    pub action: PlayerAction,
}

/// Complete record of a poker hand including all actions, board cards, and outcome.
/// Serialized to JSONL format for hand history storage and replay.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Unique identifier for this hand (format: YYYYMMDD-NNNNNN)
    pub hand_id: String,
    /// Table the hand was played on
    pub table_id: String,
    /// RNG seed used for deck shuffling (enables deterministic replay)
    pub seed: Option<u64>,
    /// Chronological list of all player actions
    pub actions: Vec<ActionRecord>,
    /// Community cards on the board (up to 5 cards)
    pub board: Vec<Card>,
    /// Final stacks by player id
    pub stacks: Vec<(String, u32)>,
    /// Hand result summary (winner, pot size, etc.)
    pub result: Option<String>,
    /// Timestamp when the hand was played (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
    /// Showdown information if hand went to showdown
    #[serde(default)]
    pub showdown: Option<ShowdownInfo>,
}

impl HandRecord {
    /// Builds a record from a table whose hand has finished.
    pub fn from_table(table: &Table, hand_id: String, seed: Option<u64>) -> Self {
        let settlement = table.last_result.as_ref();
        let result = settlement.map(|s| match &s.uncontested {
            Some(id) => format!("{} wins {} uncontested", id, s.pot),
            None => {
                let ids: Vec<&str> = s.winners.iter().map(|w| w.player_id.as_str()).collect();
                format!("{} split {} ({} each)", ids.join(","), s.pot, s.share)
            }
        });
        let showdown = settlement
            .filter(|s| !s.winners.is_empty())
            .map(|s| ShowdownInfo {
                winners: s.winners.iter().map(|w| w.player_id.clone()).collect(),
                notes: s.winners.first().map(|w| w.hand.name().to_string()),
            });
        Self {
            hand_id,
            table_id: table.id.clone(),
            seed,
            actions: table.actions.clone(),
            board: table.community_cards.clone(),
            stacks: table.players.iter().map(|p| (p.id.clone(), p.stack)).collect(),
            result,
            ts: None,
            showdown,
        }
    }
}

pub fn format_hand_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct HandLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

/// Information about the showdown phase when hands are revealed.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    /// Ids of the players who won the hand
    pub winners: Vec<String>,
    /// Winning hand category
    #[serde(default)]
    pub notes: Option<String>,
}

impl HandLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// A logger that only hands out ids and writes nowhere.
    pub fn detached(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_hand_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
