//! Built-in card catalog and default squad roster.

use rand::Rng;
use tactics_core::{
    Card, CardEffect, CardPool, Character, CharacterConfig, CharacterId, CharacterStats, Squad,
    Team,
};

/// The ten stock cards every battle draws from unless a catalog is loaded.
pub fn default_cards() -> Vec<Card> {
    let card = |name: &str, description: &str, effect: CardEffect| {
        Card::new(name, description, effect)
    };
    vec![
        card(
            "Furious Onslaught",
            "Raises attack by 5 but lowers armor by 2",
            CardEffect {
                attack: 5,
                armor: -2,
                ..CardEffect::default()
            },
        ),
        card(
            "Battle Cry",
            "Raises attack by 3 and energy by 20",
            CardEffect {
                attack: 3,
                energy: 20.0,
                ..CardEffect::default()
            },
        ),
        card(
            "Stone Wall",
            "Raises armor by 5 but lowers attack by 2",
            CardEffect {
                armor: 5,
                attack: -2,
                ..CardEffect::default()
            },
        ),
        card(
            "Stronghold",
            "Raises armor by 3 and health by 10%",
            CardEffect {
                armor: 3,
                health_percentage: 10.0,
                ..CardEffect::default()
            },
        ),
        card(
            "Healing",
            "Restores 15% health",
            CardEffect {
                health_percentage: 15.0,
                ..CardEffect::default()
            },
        ),
        card(
            "Regeneration",
            "Restores 7% health and raises armor by 2",
            CardEffect {
                health_percentage: 7.0,
                armor: 2,
                ..CardEffect::default()
            },
        ),
        card(
            "Balance of Power",
            "Raises attack and armor by 2",
            CardEffect {
                attack: 2,
                armor: 2,
                ..CardEffect::default()
            },
        ),
        card(
            "Harmony",
            "Restores 5% health and raises energy by 15",
            CardEffect {
                health_percentage: 5.0,
                energy: 15.0,
                ..CardEffect::default()
            },
        ),
        card(
            "Energy Surge",
            "Raises energy by 30 but lowers armor by 1",
            CardEffect {
                energy: 30.0,
                armor: -1,
                ..CardEffect::default()
            },
        ),
        card(
            "Desperate Dash",
            "Raises attack by 7 but costs 5% health",
            CardEffect {
                attack: 7,
                health_percentage: -5.0,
                ..CardEffect::default()
            },
        ),
    ]
}

pub fn default_card_pool() -> CardPool {
    CardPool::new(default_cards())
}

/// One squad member as written in a roster file.
///
/// Without explicit `stats` the member rolls them from the character config.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberSpec {
    pub id: u32,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: Option<CharacterStats>,
}

impl MemberSpec {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            stats: None,
        }
    }

    pub fn with_stats(mut self, stats: CharacterStats) -> Self {
        self.stats = Some(stats);
        self
    }

    fn build<R: Rng + ?Sized>(&self, team: Team, config: &CharacterConfig, rng: &mut R) -> Character {
        let id = CharacterId(self.id);
        match self.stats {
            Some(stats) => Character::new(id, self.name.as_str(), team, stats, config),
            None => Character::spawn(id, self.name.as_str(), team, config, rng),
        }
    }
}

/// Members of both sides, in succession order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquadRoster {
    pub player: Vec<MemberSpec>,
    pub enemy: Vec<MemberSpec>,
}

impl Default for SquadRoster {
    /// One hero against one raider.
    fn default() -> Self {
        Self {
            player: vec![MemberSpec::new(1, "Hero")],
            enemy: vec![MemberSpec::new(2, "Raider")],
        }
    }
}

impl SquadRoster {
    /// Builds both squads, rolling missing stats from `config`.
    ///
    /// Members roll in roster order (player side first), so the same RNG
    /// state always yields the same squads.
    pub fn build<R: Rng + ?Sized>(&self, config: &CharacterConfig, rng: &mut R) -> (Squad, Squad) {
        let player = self
            .player
            .iter()
            .map(|member| member.build(Team::Player, config, rng))
            .collect();
        let enemy = self
            .enemy
            .iter()
            .map(|member| member.build(Team::Enemy, config, rng))
            .collect();
        (
            Squad::new(Team::Player, player),
            Squad::new(Team::Enemy, enemy),
        )
    }
}
