//! Data-driven battle content and loaders.
//!
//! This crate houses the built-in content and loaders for RON/TOML data files:
//! - The card catalog (data-driven via RON)
//! - Squad rosters (data-driven via RON)
//! - Battle and character tuning (data-driven via TOML)
//!
//! The built-in catalog mirrors the shipped `data/` directory so a battle can
//! be assembled without touching the filesystem.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{MemberSpec, SquadRoster, default_card_pool, default_cards};

#[cfg(feature = "loaders")]
pub use loaders::{BattleSettings, CardLoader, ConfigLoader, ContentFactory, RosterLoader};
