//! Content factory for loading a whole battle setup from a data directory.

use std::path::{Path, PathBuf};

use tactics_core::CardPool;

use crate::catalog::{SquadRoster, default_card_pool};
use crate::loaders::{BattleSettings, CardLoader, ConfigLoader, LoadResult, RosterLoader};

/// Content factory that loads battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// ├── cards.ron
/// └── roster.ron
/// ```
///
/// The `*_or_default` variants fall back to the built-in content when a file
/// is absent, but still fail on a file that exists and does not parse.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const SETTINGS_FILE: &'static str = "battle.toml";
    pub const CARDS_FILE: &'static str = "cards.ron";
    pub const ROSTER_FILE: &'static str = "roster.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The `data/` directory shipped with this crate.
    pub fn bundled_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    /// Load tuning from `battle.toml`.
    pub fn load_settings(&self) -> LoadResult<BattleSettings> {
        ConfigLoader::load(&self.data_dir.join(Self::SETTINGS_FILE))
    }

    /// Load the card catalog from `cards.ron`.
    pub fn load_cards(&self) -> LoadResult<CardPool> {
        CardLoader::load(&self.data_dir.join(Self::CARDS_FILE))
    }

    /// Load both squads' members from `roster.ron`.
    pub fn load_roster(&self) -> LoadResult<SquadRoster> {
        RosterLoader::load(&self.data_dir.join(Self::ROSTER_FILE))
    }

    pub fn load_settings_or_default(&self) -> LoadResult<BattleSettings> {
        self.or_default(Self::SETTINGS_FILE, || self.load_settings(), BattleSettings::default)
    }

    pub fn load_cards_or_default(&self) -> LoadResult<CardPool> {
        self.or_default(Self::CARDS_FILE, || self.load_cards(), default_card_pool)
    }

    pub fn load_roster_or_default(&self) -> LoadResult<SquadRoster> {
        self.or_default(Self::ROSTER_FILE, || self.load_roster(), SquadRoster::default)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn or_default<T>(
        &self,
        file: &str,
        load: impl FnOnce() -> LoadResult<T>,
        fallback: impl FnOnce() -> T,
    ) -> LoadResult<T> {
        if self.data_dir.join(file).exists() {
            load()
        } else {
            Ok(fallback())
        }
    }
}
