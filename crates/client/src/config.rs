//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use tactics_content::{BattleSettings, ContentFactory};
use tactics_runtime::ClockMode;

/// Everything the headless client can be told from outside.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientConfig {
    pub data_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub max_turns: Option<u32>,
    /// Wall-clock tick length. Unset means time is skipped ahead.
    pub tick_ms: Option<u64>,
    pub summary_json: bool,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TACTICS_DATA_DIR` - Content directory (default: bundled data)
    /// - `TACTICS_SEED` - Battle seed (default: from `battle.toml`)
    /// - `TACTICS_MAX_TURNS` - Turn cap, 0 disables it (default: from `battle.toml`)
    /// - `TACTICS_TICK_MS` - Play in real time with this tick length
    /// - `TACTICS_SUMMARY_JSON` - Print the summary as JSON (default: false)
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var("TACTICS_DATA_DIR").ok().map(PathBuf::from),
            seed: read_env("TACTICS_SEED"),
            max_turns: read_env("TACTICS_MAX_TURNS"),
            tick_ms: read_env("TACTICS_TICK_MS"),
            summary_json: env::var("TACTICS_SUMMARY_JSON")
                .ok()
                .is_some_and(|value| parse_flag(&value)),
        }
    }

    pub fn content(&self) -> ContentFactory {
        ContentFactory::new(
            self.data_dir
                .clone()
                .unwrap_or_else(ContentFactory::bundled_data_dir),
        )
    }

    /// Applies the seed and turn cap overrides on top of loaded settings.
    pub fn apply(&self, settings: &mut BattleSettings) {
        if let Some(seed) = self.seed {
            settings.battle.seed = seed;
        }
        if let Some(max_turns) = self.max_turns {
            settings.battle.max_turns = max_turns;
        }
    }

    pub fn clock(&self) -> ClockMode {
        match self.tick_ms {
            Some(tick_ms) if tick_ms > 0 => ClockMode::Realtime { tick_ms },
            _ => ClockMode::Manual,
        }
    }
}

/// Accepts `1`, `true`, `yes` and `on`, case-insensitively.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}
