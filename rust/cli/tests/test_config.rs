use holdem_cli::config::{self, Overrides, ValueSource};
use holdem_cli::run;
use holdem_engine::table::OddChipPolicy;
use serde_json::Value;
use serial_test::serial;
use std::io::Write;

struct TempEnvVar {
    key: &'static str,
    previous: Option<String>,
}

impl TempEnvVar {
    fn set(key: &'static str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        unsafe {
            std::env::set_var(key, value);
        }
        Self { key, previous }
    }

    fn unset(key: &'static str) -> Self {
        let previous = std::env::var(key).ok();
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, previous }
    }
}

impl Drop for TempEnvVar {
    fn drop(&mut self) {
        unsafe {
            match &self.previous {
                Some(prev) => std::env::set_var(self.key, prev),
                None => std::env::remove_var(self.key),
            }
        }
    }
}

fn clean_env() -> Vec<TempEnvVar> {
    [
        "HOLDEM_CONFIG",
        "HOLDEM_SEED",
        "HOLDEM_STARTING_STACK",
        "HOLDEM_SMALL_BLIND",
        "HOLDEM_BIG_BLIND",
        "HOLDEM_AI",
    ]
    .into_iter()
    .map(TempEnvVar::unset)
    .collect()
}

fn write_config(dir: &tempfile::TempDir, body: &str) -> String {
    let path = dir.path().join("holdem.toml");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    path.to_string_lossy().into_owned()
}

fn cfg_json() -> Value {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(["holdem", "cfg"], &mut out, &mut err);
    assert_eq!(code, 0, "{}", String::from_utf8_lossy(&err));
    serde_json::from_slice(&out).unwrap()
}

#[test]
#[serial]
fn cfg_shows_defaults() {
    let _env = clean_env();
    let json = cfg_json();

    assert_eq!(json["starting_stack"]["value"].as_u64(), Some(1000));
    assert_eq!(json["small_blind"]["value"].as_u64(), Some(5));
    assert_eq!(json["big_blind"]["value"].as_u64(), Some(10));
    assert_eq!(json["max_players"]["value"].as_u64(), Some(6));
    assert!(json["seed"]["value"].is_null());
    assert_eq!(json["ai"]["value"].as_str(), Some("baseline"));
    assert_eq!(json["odd_chip"]["value"].as_str(), Some("discard"));
    for key in ["starting_stack", "small_blind", "big_blind", "max_players", "seed", "ai", "odd_chip"] {
        assert_eq!(json[key]["source"].as_str(), Some("default"), "{key}");
    }
}

#[test]
#[serial]
fn file_values_are_reported_with_file_source() {
    let _env = clean_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "seed = 456\nbig_blind = 20\nsmall_blind = 10\nmax_players = 9\nodd_chip = \"left_of_dealer\"\n",
    );
    let _cfg = TempEnvVar::set("HOLDEM_CONFIG", &path);

    let json = cfg_json();
    assert_eq!(json["seed"]["value"].as_u64(), Some(456));
    assert_eq!(json["seed"]["source"].as_str(), Some("file"));
    assert_eq!(json["big_blind"]["value"].as_u64(), Some(20));
    assert_eq!(json["max_players"]["value"].as_u64(), Some(9));
    assert_eq!(json["odd_chip"]["value"].as_str(), Some("left_of_dealer"));
    assert_eq!(json["odd_chip"]["source"].as_str(), Some("file"));
    assert_eq!(json["ai"]["source"].as_str(), Some("default"));
}

#[test]
#[serial]
fn precedence_cli_over_env_over_file() {
    let _env = clean_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "seed = 1\nai = \"baseline\"\nstarting_stack = 500\n");
    let _cfg = TempEnvVar::set("HOLDEM_CONFIG", &path);
    let _seed = TempEnvVar::set("HOLDEM_SEED", "2");
    let _ai = TempEnvVar::set("HOLDEM_AI", "check-call");

    let resolved = config::load_with_sources().unwrap();
    assert_eq!(resolved.config.seed, Some(2));
    assert_eq!(resolved.sources.seed, ValueSource::Env);
    assert_eq!(resolved.config.ai, "check-call");
    assert_eq!(resolved.config.starting_stack, 500);
    assert_eq!(resolved.sources.starting_stack, ValueSource::File);

    let overrides = Overrides {
        seed: Some(3),
        starting_stack: Some(2000),
        ..Overrides::default()
    };
    let resolved = config::resolve(&overrides).unwrap();
    assert_eq!(resolved.config.seed, Some(3));
    assert_eq!(resolved.sources.seed, ValueSource::Cli);
    assert_eq!(resolved.config.starting_stack, 2000);
    assert_eq!(resolved.sources.starting_stack, ValueSource::Cli);
    assert_eq!(resolved.sources.ai, ValueSource::Env);
    assert_eq!(resolved.config.odd_chip, OddChipPolicy::Discard);
}

#[test]
#[serial]
fn invalid_env_value_fails_cfg() {
    let _env = clean_env();
    let _seed = TempEnvVar::set("HOLDEM_SEED", "not-a-number");

    assert!(config::load().is_err());
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(["holdem", "cfg"], &mut out, &mut err);
    assert_eq!(code, 2);
    assert!(String::from_utf8_lossy(&err).contains("Invalid HOLDEM_SEED: not-a-number"));
}

#[test]
#[serial]
fn unreadable_or_malformed_file_is_an_error() {
    let _env = clean_env();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    {
        let _cfg = TempEnvVar::set("HOLDEM_CONFIG", &missing.to_string_lossy());
        assert!(matches!(config::load(), Err(config::ConfigError::Io(_))));
    }
    let path = write_config(&dir, "seed = [not toml");
    let _cfg = TempEnvVar::set("HOLDEM_CONFIG", &path);
    assert!(matches!(config::load(), Err(config::ConfigError::Parse(_))));
}

#[test]
#[serial]
fn env_blinds_flow_into_sim() {
    let _env = clean_env();
    let _sb = TempEnvVar::set("HOLDEM_SMALL_BLIND", "25");
    let _bb = TempEnvVar::set("HOLDEM_BIG_BLIND", "50");
    let _stack = TempEnvVar::set("HOLDEM_STARTING_STACK", "400");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("h.jsonl");
    let path_str = path.to_string_lossy().into_owned();
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(
        ["holdem", "sim", "--hands", "1", "--seed", "8", "--output", path_str.as_str()],
        &mut out,
        &mut err,
    );
    assert_eq!(code, 0, "{}", String::from_utf8_lossy(&err));

    let line = std::fs::read_to_string(&path).unwrap();
    let rec: holdem_engine::logger::HandRecord = serde_json::from_str(line.trim_end()).unwrap();
    let total: u32 = rec.stacks.iter().map(|(_, s)| *s).sum();
    assert!((799..=800).contains(&total));
    assert_eq!(rec.stacks.len(), 2);
}
