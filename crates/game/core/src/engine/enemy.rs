//! Automated enemy turn.
//!
//! The policy is deterministic given positions and energy: super attack when
//! ready and in reach, otherwise attack with the weapon matching the distance
//! band, otherwise close in along the longer axis.

use tracing::{debug, info};

use crate::character::{AttackType, Character};
use crate::config::BattleConfig;
use crate::event::Notification;
use crate::types::{Position, Team};

use super::{AfterMove, BattleEngine, Resume, Suspension};

/// One enemy action chosen by [`decide_enemy_action`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyDecision {
    SuperAttack,
    Attack(AttackType),
    MoveTo(Position),
    /// Either side is off the board.
    Idle,
}

/// Picks the enemy's next action against `target`.
pub fn decide_enemy_action(
    actor: &Character,
    target: &Character,
    config: &BattleConfig,
) -> EnemyDecision {
    let (Some(from), Some(to)) = (actor.position(), target.position()) else {
        return EnemyDecision::Idle;
    };
    let distance = from.manhattan_distance(to);

    if distance <= config.super_attack_range && actor.can_perform_super_attack() {
        return EnemyDecision::SuperAttack;
    }
    if distance <= config.attack_range {
        return EnemyDecision::Attack(AttackType::for_distance(distance));
    }

    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let step = config.max_move_distance as i32;
    let destination = if dx.abs() >= dy.abs() {
        from.offset(dx.signum() * step.min(dx.abs()), 0)
    } else {
        from.offset(0, dy.signum() * step.min(dy.abs()))
    };
    EnemyDecision::MoveTo(destination)
}

impl BattleEngine {
    pub(super) fn begin_enemy_turn(&mut self) {
        self.turn.actions_remaining = self.config.actions_per_turn;
        info!(
            target: "tactics_core::engine",
            turn = self.turn.turn,
            "enemy turn started"
        );
        self.notify(Notification::TurnChanged {
            turn: self.turn.turn,
            team: Team::Enemy,
        });
        self.notify(Notification::ActionsRemaining {
            remaining: self.turn.actions_remaining,
        });

        if !self.enemy.has_active_character() || !self.player.has_active_character() {
            debug!(
                target: "tactics_core::engine",
                "enemy turn skipped: missing active character"
            );
            if !self.settle() {
                self.begin_player_turn();
            }
            return;
        }

        if self.use_enemy_card() {
            return;
        }
        self.suspend(Suspension::Delay {
            remaining: self.config.action_delay(),
            then: Resume::EnemyStep,
        });
    }

    /// Plays one random enemy card. Returns true if the battle ended.
    fn use_enemy_card(&mut self) -> bool {
        if !self.enemy_hand.can_use() {
            return false;
        }
        let Some(active) = self.enemy.active_id() else {
            return false;
        };
        let len = self.enemy_hand.cards().len();
        let index = rand::Rng::gen_range(&mut self.rng, 0..len);
        let Ok(card) = self.enemy_hand.take(index) else {
            return false;
        };
        self.play_card(Team::Enemy, active, &card);
        self.is_battle_over()
    }

    pub(super) fn enemy_step(&mut self) {
        if self.turn.actions_remaining == 0 {
            self.begin_player_turn();
            return;
        }
        let (Some(actor), Some(target)) = (
            self.enemy.active_character(),
            self.player.active_character(),
        ) else {
            if !self.settle() {
                self.begin_player_turn();
            }
            return;
        };

        let decision = decide_enemy_action(actor, target, &self.config);
        let actor_id = actor.id();
        let actor_name = actor.name().to_owned();
        let target_id = target.id();
        debug!(
            target: "tactics_core::engine",
            actor = %actor_id,
            victim = %target_id,
            ?decision,
            remaining = self.turn.actions_remaining,
            "enemy decision"
        );

        match decision {
            EnemyDecision::SuperAttack | EnemyDecision::Attack(_) => {
                let Self { player, enemy, .. } = self;
                let (Some(attacker), Some(victim)) =
                    (enemy.member_mut(actor_id), player.member_mut(target_id))
                else {
                    self.finish_enemy_action();
                    return;
                };
                let report = match decision {
                    EnemyDecision::Attack(kind) => {
                        attacker.set_attack_type(kind);
                        attacker.perform_attack(victim)
                    }
                    _ => attacker.perform_super_attack(victim),
                };
                let text = match (decision, report) {
                    (EnemyDecision::SuperAttack, Some(report)) => format!(
                        "{actor_name} uses a super attack for {} damage!",
                        report.damage
                    ),
                    (EnemyDecision::Attack(kind), Some(report)) => format!(
                        "{actor_name} attacks with {kind} for {} damage!",
                        report.damage
                    ),
                    _ => format!("{actor_name} hesitates"),
                };
                self.announce(text);
                self.finish_enemy_action();
            }
            EnemyDecision::MoveTo(destination) => {
                let max_distance = self.config.max_move_distance;
                let per_cell = self.config.move_ticks_per_cell();
                let Self { grid, enemy, .. } = self;
                let Some(actor) = enemy.member_mut(actor_id) else {
                    self.finish_enemy_action();
                    return;
                };
                let origin = actor.position();
                let started = actor.try_move_to(grid, destination, max_distance, per_cell);
                let path = actor
                    .traversal()
                    .map(|traversal| traversal.path().to_vec())
                    .unwrap_or_default();

                match (started, origin) {
                    (Ok(true), Some(origin)) => {
                        self.notify(Notification::MovementStarted { id: actor_id, path });
                        self.suspend(Suspension::Movement {
                            mover: actor_id,
                            then: AfterMove::EnemyAction { origin },
                        });
                    }
                    (result, _) => {
                        debug!(
                            target: "tactics_core::engine",
                            actor = %actor_id,
                            %destination,
                            ?result,
                            "enemy could not move"
                        );
                        self.announce(format!("{actor_name} could not move"));
                        self.finish_enemy_action();
                    }
                }
            }
            EnemyDecision::Idle => {
                self.announce(format!("{actor_name} waits"));
                self.finish_enemy_action();
            }
        }
    }

    pub(super) fn finish_enemy_move(&mut self, origin: Position) {
        let Some(actor) = self.enemy.active_character() else {
            self.finish_enemy_action();
            return;
        };
        let moved = actor
            .position()
            .map_or(0, |position| position.manhattan_distance(origin));
        let text = match moved {
            1 => format!("{} moved 1 cell", actor.name()),
            n => format!("{} moved {n} cells", actor.name()),
        };
        self.announce(text);
        self.finish_enemy_action();
    }

    /// Consumes one enemy action and schedules what follows.
    fn finish_enemy_action(&mut self) {
        self.turn.actions_remaining = self.turn.actions_remaining.saturating_sub(1);
        self.notify(Notification::ActionsRemaining {
            remaining: self.turn.actions_remaining,
        });
        if self.settle() {
            return;
        }
        let then = if self.turn.actions_remaining == 0 {
            info!(
                target: "tactics_core::engine",
                turn = self.turn.turn,
                "enemy turn ended"
            );
            Resume::StartPlayerTurn
        } else {
            Resume::EnemyStep
        };
        self.suspend(Suspension::Delay {
            remaining: self.config.action_delay(),
            then,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{config, pool, started};
    use super::super::{ActionType, BattlePhase};
    use super::*;
    use crate::character::test_support::with_stats;
    use crate::grid::Grid;
    use crate::squad::Squad;
    use crate::types::{CharacterId, Tick};

    fn pair(enemy_at: Position, player_at: Position) -> (Character, Character, Grid) {
        let mut grid = Grid::new(10, 10);
        let mut foe = with_stats(2, Team::Enemy, 100, 20, 0);
        let mut hero = with_stats(1, Team::Player, 100, 20, 0);
        grid.place_character(&mut foe, enemy_at).unwrap();
        grid.place_character(&mut hero, player_at).unwrap();
        (foe, hero, grid)
    }

    #[test]
    fn engages_inside_attack_range_with_banded_weapon() {
        let config = BattleConfig::default();
        let (foe, hero, _) = pair(Position::new(5, 5), Position::new(5, 6));
        assert_eq!(
            decide_enemy_action(&foe, &hero, &config),
            EnemyDecision::Attack(AttackType::Sword)
        );

        let (foe, hero, _) = pair(Position::new(5, 5), Position::new(6, 6));
        assert_eq!(
            decide_enemy_action(&foe, &hero, &config),
            EnemyDecision::Attack(AttackType::Magic)
        );
    }

    #[test]
    fn super_attack_reaches_further_than_normal_attacks() {
        let config = BattleConfig::default();
        let (mut foe, hero, _) = pair(Position::new(5, 5), Position::new(8, 5));
        assert!(matches!(
            decide_enemy_action(&foe, &hero, &config),
            EnemyDecision::MoveTo(_)
        ));

        foe.modify_energy(100.0);
        assert_eq!(
            decide_enemy_action(&foe, &hero, &config),
            EnemyDecision::SuperAttack
        );
    }

    #[test]
    fn approaches_along_longer_axis_with_ties_horizontal() {
        let config = BattleConfig::default();
        let (foe, hero, _) = pair(Position::new(9, 9), Position::new(1, 4));
        assert_eq!(
            decide_enemy_action(&foe, &hero, &config),
            EnemyDecision::MoveTo(Position::new(6, 9))
        );

        let (foe, hero, _) = pair(Position::new(5, 9), Position::new(4, 1));
        assert_eq!(
            decide_enemy_action(&foe, &hero, &config),
            EnemyDecision::MoveTo(Position::new(5, 6))
        );

        let (foe, hero, _) = pair(Position::new(5, 5), Position::new(1, 1));
        assert_eq!(
            decide_enemy_action(&foe, &hero, &config),
            EnemyDecision::MoveTo(Position::new(2, 5))
        );

        let (foe, hero, _) = pair(Position::new(5, 5), Position::new(7, 7));
        assert_eq!(
            decide_enemy_action(&foe, &hero, &config),
            EnemyDecision::MoveTo(Position::new(7, 5))
        );
    }

    #[test]
    fn blocked_enemy_still_spends_the_action() {
        let mut engine = BattleEngine::new(
            config(),
            Grid::new(10, 10),
            Squad::new(Team::Player, vec![with_stats(1, Team::Player, 100, 20, 0)]),
            Squad::new(
                Team::Enemy,
                vec![
                    with_stats(2, Team::Enemy, 100, 20, 0),
                    with_stats(3, Team::Enemy, 100, 20, 0),
                ],
            ),
            pool(),
        )
        .unwrap();
        engine.place_for_test(CharacterId(1), Position::new(2, 5));
        engine.place_for_test(CharacterId(2), Position::new(9, 5));
        engine.place_for_test(CharacterId(3), Position::new(8, 5));
        engine.start_battle().unwrap();

        engine.end_turn_button_clicked().unwrap();
        engine.run_until_idle(Tick(100_000));

        assert_eq!(
            engine.character(CharacterId(2)).unwrap().position(),
            Some(Position::new(9, 5))
        );
        assert_eq!(engine.phase(), BattlePhase::PlayerTurn);
        assert_eq!(engine.current_turn(), 2);
        let failures = engine
            .drain_notifications()
            .into_iter()
            .filter(|note| {
                matches!(note, Notification::Message { text, .. } if text.ends_with("could not move"))
            })
            .count();
        assert_eq!(failures, 3);
    }

    #[test]
    fn enemy_walk_stops_before_the_player() {
        let mut engine = started(Position::new(5, 2), Position::new(5, 5));
        engine.end_turn_button_clicked().unwrap();
        engine.run_until_idle(Tick(100_000));

        assert_eq!(
            engine.character(CharacterId(2)).unwrap().position(),
            Some(Position::new(5, 3))
        );
        assert!(engine.statistics().damage_received > 0);
    }

    #[test]
    fn enemy_closes_in_and_attacks() {
        let mut engine = started(Position::new(2, 2), Position::new(6, 2));
        engine.end_turn_button_clicked().unwrap();
        engine.run_until_idle(Tick(100_000));

        let hero = engine.character(CharacterId(1)).unwrap();
        assert!(hero.current_health() < hero.max_health());
        assert!(engine.statistics().damage_received > 0);
        assert_eq!(engine.select_action(ActionType::Move), Ok(()));
    }
}
