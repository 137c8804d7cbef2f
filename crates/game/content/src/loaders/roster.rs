//! Squad roster loader.

use std::collections::HashSet;
use std::path::Path;

use crate::catalog::SquadRoster;
use crate::loaders::{LoadResult, read_file};

/// Loader for squad rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file.
    ///
    /// RON format: `SquadRoster`. Members without `stats` roll them when the
    /// squads are built:
    ///
    /// ```ron
    /// (
    ///     player: [(id: 1, name: "Hero")],
    ///     enemy: [
    ///         (id: 2, name: "Raider"),
    ///         (id: 3, name: "Brute", stats: Some((max_health: 140, base_attack: 18, armor: 12))),
    ///     ],
    /// )
    /// ```
    pub fn load(path: &Path) -> LoadResult<SquadRoster> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SquadRoster> {
        let roster: SquadRoster = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;

        if roster.player.is_empty() {
            anyhow::bail!("player squad has no members");
        }
        if roster.enemy.is_empty() {
            anyhow::bail!("enemy squad has no members");
        }
        let mut ids = HashSet::new();
        for member in roster.player.iter().chain(&roster.enemy) {
            if !ids.insert(member.id) {
                anyhow::bail!("duplicate character id {} ('{}')", member.id, member.name);
            }
            if let Some(stats) = member.stats
                && stats.max_health == 0
            {
                anyhow::bail!("'{}' has zero max health", member.name);
            }
        }

        Ok(roster)
    }
}
