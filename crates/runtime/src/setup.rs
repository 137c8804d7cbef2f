//! Assembles a ready-to-run [`BattleEngine`] from loaded content.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use tactics_content::{BattleSettings, ContentFactory, SquadRoster};
use tactics_core::{BattleEngine, CardPool};

use crate::api::{Result, RuntimeError};

/// Rolls the roster and builds an engine on a grid sized from the settings.
///
/// Stat rolls draw from their own RNG seeded with the battle seed, so the
/// same settings always produce the same squads.
pub fn build_engine(
    settings: &BattleSettings,
    pool: CardPool,
    roster: &SquadRoster,
) -> Result<BattleEngine> {
    let mut rng = StdRng::seed_from_u64(settings.battle.seed);
    let (player, enemy) = roster.build(&settings.character, &mut rng);

    let engine = BattleEngine::builder()
        .config(settings.battle.clone())
        .default_grid()
        .player_squad(player)
        .enemy_squad(enemy)
        .card_pool(pool)
        .build()?;
    Ok(engine)
}

/// Loads `battle.toml`, `cards.ron` and `roster.ron` from `data_dir`, using
/// built-in content for whichever file is absent.
pub fn build_engine_from_dir(data_dir: impl AsRef<Path>) -> Result<BattleEngine> {
    let factory = ContentFactory::new(data_dir.as_ref());
    debug!(target: "tactics_runtime::setup", data_dir = %factory.data_dir().display(), "loading content");

    let settings = factory
        .load_settings_or_default()
        .map_err(|error| RuntimeError::Content(error.into()))?;
    let pool = factory
        .load_cards_or_default()
        .map_err(|error| RuntimeError::Content(error.into()))?;
    let roster = factory
        .load_roster_or_default()
        .map_err(|error| RuntimeError::Content(error.into()))?;

    build_engine(&settings, pool, &roster)
}
