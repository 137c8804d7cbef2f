//! Content loaders for reading battle data from files.
//!
//! RON is used for catalogs (cards, rosters) and TOML for tuning
//! (`battle.toml`). Every loader validates what it reads so a bad data file
//! fails here rather than as a half-built battle.

pub mod cards;
pub mod config;
pub mod factory;
pub mod roster;

pub use cards::CardLoader;
pub use config::{BattleSettings, ConfigLoader};
pub use factory::ContentFactory;
pub use roster::RosterLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
