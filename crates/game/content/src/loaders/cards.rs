//! Card catalog loader.

use std::collections::HashSet;
use std::path::Path;

use tactics_core::{Card, CardPool};

use crate::loaders::{LoadResult, read_file};

/// Loader for the card catalog from RON files.
pub struct CardLoader;

impl CardLoader {
    /// Load a card pool from a RON file.
    ///
    /// RON format: `Vec<Card>`, where each effect lists only the modifiers it
    /// uses:
    ///
    /// ```ron
    /// [
    ///     (
    ///         name: "Battle Cry",
    ///         description: "Raises attack by 3 and energy by 20",
    ///         effect: (attack: 3, energy: 20.0),
    ///     ),
    /// ]
    /// ```
    pub fn load(path: &Path) -> LoadResult<CardPool> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CardPool> {
        let cards: Vec<Card> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse card catalog RON: {}", e))?;

        if cards.is_empty() {
            anyhow::bail!("card catalog is empty");
        }
        let mut names = HashSet::new();
        for card in &cards {
            if card.name.trim().is_empty() {
                anyhow::bail!("card with an empty name");
            }
            if !names.insert(card.name.as_str()) {
                anyhow::bail!("duplicate card '{}'", card.name);
            }
            if card.effect.is_empty() {
                anyhow::bail!("card '{}' has no effect", card.name);
            }
        }

        Ok(CardPool::new(cards))
    }
}
