//! Battle configuration loader.

use std::path::Path;

use tactics_core::{BattleConfig, CharacterConfig};

use crate::loaders::{LoadResult, read_file};

/// Contents of `battle.toml`: a `[battle]` and a `[character]` table.
///
/// Both tables and every key in them are optional; omitted values keep
/// their defaults.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BattleSettings {
    pub battle: BattleConfig,
    pub character: CharacterConfig,
}

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> LoadResult<BattleSettings> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse settings from TOML text and reject values the engine cannot run.
    pub fn parse(content: &str) -> LoadResult<BattleSettings> {
        let settings: BattleSettings = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse battle TOML: {}", e))?;

        let battle = &settings.battle;
        if battle.grid_width <= 0 || battle.grid_height <= 0 {
            anyhow::bail!(
                "grid must be at least 1x1, got {}x{}",
                battle.grid_width,
                battle.grid_height
            );
        }
        if battle.actions_per_turn == 0 {
            anyhow::bail!("actions_per_turn must be positive");
        }
        if battle.cell_size <= 0.0 {
            anyhow::bail!("cell_size must be positive, got {}", battle.cell_size);
        }

        let character = &settings.character;
        for (name, range) in [
            ("health", character.health),
            ("base_attack", character.base_attack),
            ("armor", character.armor),
        ] {
            if range.min > range.max {
                anyhow::bail!("{name} range is inverted: {}..={}", range.min, range.max);
            }
        }
        if character.max_energy <= 0.0 {
            anyhow::bail!("max_energy must be positive");
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::AttackType;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(ConfigLoader::parse("").unwrap(), BattleSettings::default());
    }

    #[test]
    fn partial_tables_override_only_named_keys() {
        let settings = ConfigLoader::parse(
            r#"
            [battle]
            max_turns = 20
            seed = 7

            [character]
            default_attack_type = "bow"
            health = { min = 80, max = 90 }
            "#,
        )
        .unwrap();

        assert_eq!(settings.battle.max_turns, 20);
        assert_eq!(settings.battle.seed, 7);
        assert_eq!(settings.battle.grid_width, 10);
        assert_eq!(settings.character.default_attack_type, AttackType::Bow);
        assert_eq!(settings.character.health.max, 90);
        assert_eq!(settings.character.max_energy, 100.0);
    }

    #[test]
    fn rejects_unplayable_values() {
        assert!(ConfigLoader::parse("[battle]\nactions_per_turn = 0").is_err());
        assert!(ConfigLoader::parse("[battle]\ngrid_width = 0").is_err());
        assert!(ConfigLoader::parse("[character]\narmor = { min = 9, max = 2 }").is_err());
        assert!(ConfigLoader::parse("[battle]\nmax_turns = \"ten\"").is_err());
    }
}
