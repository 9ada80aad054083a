//! Layered configuration: defaults, then a TOML file named by `HOLDEM_CONFIG`,
//! then `HOLDEM_*` environment variables, then command-line flags.

use holdem_engine::table::{OddChipPolicy, TableSettings, MAX_TABLE_CHIPS};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    pub max_players: usize,
    pub seed: Option<u64>,
    pub ai: String,
    pub odd_chip: OddChipPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_stack: 1000,
            small_blind: 5,
            big_blind: 10,
            max_players: 6,
            seed: None,
            ai: "baseline".into(),
            odd_chip: OddChipPolicy::Discard,
        }
    }
}

impl Config {
    pub fn table_settings(&self) -> TableSettings {
        TableSettings {
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            max_players: self.max_players,
            odd_chip: self.odd_chip,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Cli,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSources {
    pub starting_stack: ValueSource,
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub max_players: ValueSource,
    pub seed: ValueSource,
    pub ai: ValueSource,
    pub odd_chip: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            starting_stack: ValueSource::Default,
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            max_players: ValueSource::Default,
            seed: ValueSource::Default,
            ai: ValueSource::Default,
            odd_chip: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

/// Command-line values that take precedence over every other layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub starting_stack: Option<u32>,
    pub small_blind: Option<u32>,
    pub big_blind: Option<u32>,
    pub seed: Option<u64>,
    pub ai: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    resolve(&Overrides::default())
}

/// Resolves every layer, including command-line `overrides`, and validates the result.
pub fn resolve(overrides: &Overrides) -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("HOLDEM_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = f.small_blind {
            cfg.small_blind = v;
            sources.small_blind = ValueSource::File;
        }
        if let Some(v) = f.big_blind {
            cfg.big_blind = v;
            sources.big_blind = ValueSource::File;
        }
        if let Some(v) = f.max_players {
            cfg.max_players = v;
            sources.max_players = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.ai {
            cfg.ai = v;
            sources.ai = ValueSource::File;
        }
        if let Some(v) = f.odd_chip {
            cfg.odd_chip = v;
            sources.odd_chip = ValueSource::File;
        }
    }

    if let Some(v) = env_parsed("HOLDEM_SEED")? {
        cfg.seed = Some(v);
        sources.seed = ValueSource::Env;
    }
    if let Some(v) = env_parsed("HOLDEM_STARTING_STACK")? {
        cfg.starting_stack = v;
        sources.starting_stack = ValueSource::Env;
    }
    if let Some(v) = env_parsed("HOLDEM_SMALL_BLIND")? {
        cfg.small_blind = v;
        sources.small_blind = ValueSource::Env;
    }
    if let Some(v) = env_parsed("HOLDEM_BIG_BLIND")? {
        cfg.big_blind = v;
        sources.big_blind = ValueSource::Env;
    }
    if let Ok(ai) = std::env::var("HOLDEM_AI")
        && !ai.is_empty()
    {
        cfg.ai = ai;
        sources.ai = ValueSource::Env;
    }

    if let Some(v) = overrides.starting_stack {
        cfg.starting_stack = v;
        sources.starting_stack = ValueSource::Cli;
    }
    if let Some(v) = overrides.small_blind {
        cfg.small_blind = v;
        sources.small_blind = ValueSource::Cli;
    }
    if let Some(v) = overrides.big_blind {
        cfg.big_blind = v;
        sources.big_blind = ValueSource::Cli;
    }
    if let Some(v) = overrides.seed {
        cfg.seed = Some(v);
        sources.seed = ValueSource::Cli;
    }
    if let Some(v) = &overrides.ai {
        cfg.ai = v.clone();
        sources.ai = ValueSource::Cli;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    max_players: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    ai: Option<String>,
    #[serde(default)]
    odd_chip: Option<OddChipPolicy>,
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", key, v))),
        _ => Ok(None),
    }
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.starting_stack == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: starting_stack must be >0".into(),
        ));
    }
    if cfg.small_blind == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: small_blind must be >=1".into(),
        ));
    }
    if cfg.big_blind < 2 || cfg.big_blind < cfg.small_blind {
        return Err(ConfigError::Invalid(
            "Invalid configuration: big_blind must be >=2 and >= small_blind".into(),
        ));
    }
    if !(2..=10).contains(&cfg.max_players) {
        return Err(ConfigError::Invalid(
            "Invalid configuration: max_players must be between 2 and 10".into(),
        ));
    }
    check_table_chips(cfg.starting_stack, cfg.max_players)
}

/// Fails when `seats` stacks of `starting_stack` would exceed what a table can hold.
pub fn check_table_chips(starting_stack: u32, seats: usize) -> Result<(), ConfigError> {
    let total = u64::from(starting_stack).saturating_mul(seats as u64);
    if total > MAX_TABLE_CHIPS {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: starting_stack x {} seats = {} exceeds the table limit of {}",
            seats, total, MAX_TABLE_CHIPS
        )));
    }
    Ok(())
}
