//! Greedy player policy for headless play.
//!
//! In order of preference: play the first offered card, super attack when
//! ready and in reach, attack with the strongest weapon when inside the
//! attack range, walk toward the enemy, end the turn.

use async_trait::async_trait;
use strum::IntoEnumIterator;
use tactics_core::{AttackType, BattleEngine, Position};

use crate::api::{ActionProvider, PlayerIntent, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct AutoPlayer {
    /// Leave offered cards untouched.
    pub skip_cards: bool,
}

impl AutoPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_cards() -> Self {
        Self { skip_cards: true }
    }

    /// The policy itself, independent of the async trait.
    pub fn choose(&self, battle: &BattleEngine) -> PlayerIntent {
        if !self.skip_cards && battle.can_use_player_cards() && !battle.player_cards().is_empty() {
            return PlayerIntent::UseCard { index: 0 };
        }

        let (Some(hero), Some(foe)) = (
            battle.player_squad().active_character(),
            battle.enemy_squad().active_character(),
        ) else {
            return PlayerIntent::EndTurn;
        };
        let (Some(from), Some(to)) = (hero.position(), foe.position()) else {
            return PlayerIntent::EndTurn;
        };
        let distance = from.manhattan_distance(to);

        if hero.can_perform_super_attack() && distance <= battle.config().super_attack_range {
            return PlayerIntent::SuperAttack { target: foe.id() };
        }

        if distance <= battle.config().attack_range {
            let table = hero.attack_table();
            let weapon = AttackType::iter()
                .max_by_key(|kind| table.get(*kind).damage)
                .unwrap_or(AttackType::Sword);
            return PlayerIntent::Attack {
                weapon,
                target: foe.id(),
            };
        }

        match approach(battle, from, to) {
            Some(cell) => PlayerIntent::Move { to: cell },
            None => PlayerIntent::EndTurn,
        }
    }
}

/// Furthest reachable cell toward `to`, trying the longer axis first.
fn approach(battle: &BattleEngine, from: Position, to: Position) -> Option<Position> {
    let along_x = Position::new(to.x, from.y);
    let along_y = Position::new(from.x, to.y);
    let axes = if from.x.abs_diff(to.x) >= from.y.abs_diff(to.y) {
        [along_x, along_y]
    } else {
        [along_y, along_x]
    };
    let reach = battle.config().max_move_distance;

    axes.into_iter()
        .filter(|waypoint| *waypoint != from)
        .find_map(|waypoint| {
            battle
                .grid()
                .compute_straight_path(from, waypoint, reach)
                .ok()
                .and_then(|path| path.last().copied())
        })
}

#[async_trait]
impl ActionProvider for AutoPlayer {
    async fn provide_intent(&self, battle: &BattleEngine) -> Result<PlayerIntent> {
        Ok(self.choose(battle))
    }
}
