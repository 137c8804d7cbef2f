//! Timed suspensions and deterministic time advancement.

use tracing::trace;

use crate::character::Character;
use crate::types::{CharacterId, Position, Tick};

use super::{ActionError, BattleEngine};

/// What runs once a traversal completes (or is cancelled).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AfterMove {
    /// A player move: consume the action, maybe end the turn.
    PlayerAction,
    /// An enemy move started from `origin`.
    EnemyAction { origin: Position },
}

/// What runs once a delay elapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resume {
    BeginEnemyTurn,
    EnemyStep,
    StartPlayerTurn,
}

/// A pending wait. At most one exists at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Suspension {
    Movement { mover: CharacterId, then: AfterMove },
    Delay { remaining: Tick, then: Resume },
}

impl BattleEngine {
    /// Fast-forwards engine time by `dt`, resolving every suspension that
    /// elapses within it. Leftover time carries into the next suspension.
    pub fn advance(&mut self, dt: Tick) {
        let mut budget = dt;
        loop {
            let Some(suspension) = self.suspension.take() else {
                self.clock += budget;
                break;
            };

            match suspension {
                Suspension::Movement { mover, then } => {
                    let leftover = self
                        .character_mut(mover)
                        .map_or(budget, |character| character.advance_movement(budget));
                    self.clock += budget.saturating_sub(leftover);
                    budget = leftover;

                    let in_flight = self
                        .character(mover)
                        .and_then(|character| character.traversal())
                        .is_some_and(|traversal| !traversal.is_complete());
                    if in_flight {
                        self.suspension = Some(Suspension::Movement { mover, then });
                        break;
                    }

                    let destination = self
                        .character_mut(mover)
                        .and_then(|character| character.finish_movement());
                    if let Some(destination) = destination {
                        self.commit_move(mover, destination);
                    }
                    self.after_move(then);
                }
                Suspension::Delay { remaining, then } => {
                    if budget < remaining {
                        self.clock += budget;
                        self.suspension = Some(Suspension::Delay {
                            remaining: remaining.saturating_sub(budget),
                            then,
                        });
                        break;
                    }
                    self.clock += remaining;
                    budget = budget.saturating_sub(remaining);
                    trace!(target: "tactics_core::engine", ?then, clock = %self.clock, "delay elapsed");
                    self.resume(then);
                }
            }
        }
    }

    /// Advances until no suspension is pending, or until `limit` ticks pass.
    ///
    /// Returns the ticks consumed.
    pub fn run_until_idle(&mut self, limit: Tick) -> Tick {
        let start = self.clock;
        while let Some(step) = self.time_to_next_wake() {
            if self.clock.saturating_sub(start) >= limit {
                break;
            }
            let budget = limit.saturating_sub(self.clock.saturating_sub(start));
            self.advance(step.min(budget).max(Tick(1)));
        }
        self.clock.saturating_sub(start)
    }

    /// Ticks until the pending suspension resolves, if one exists.
    pub fn time_to_next_wake(&self) -> Option<Tick> {
        match self.suspension.as_ref()? {
            Suspension::Movement { mover, .. } => Some(
                self.character(*mover)
                    .and_then(|character| character.traversal())
                    .map_or(Tick::ZERO, |traversal| traversal.remaining()),
            ),
            Suspension::Delay { remaining, .. } => Some(*remaining),
        }
    }

    /// Cancels the in-flight traversal, snapping the mover to the last path
    /// node it fully reached. The move still counts as the mover's action.
    pub fn cancel_movement(&mut self) -> Result<(), ActionError> {
        let Some(Suspension::Movement { mover, then }) = self.suspension else {
            return Err(ActionError::NotMoving);
        };
        self.suspension = None;
        if let Some(snapped) = self
            .character_mut(mover)
            .and_then(|character| character.cancel_movement())
        {
            self.commit_move(mover, snapped);
        }
        self.after_move(then);
        Ok(())
    }

    /// Cuts the pending delay short and runs its continuation now. The clock
    /// does not move.
    pub fn cancel_delay(&mut self) -> Result<(), ActionError> {
        let Some(Suspension::Delay { remaining, then }) = self.suspension else {
            return Err(ActionError::NotWaiting);
        };
        self.suspension = None;
        trace!(target: "tactics_core::engine", ?then, %remaining, "delay cancelled");
        self.resume(then);
        Ok(())
    }

    pub(super) fn suspend(&mut self, suspension: Suspension) {
        trace!(target: "tactics_core::engine", ?suspension, "suspending");
        self.suspension = Some(suspension);
    }

    fn after_move(&mut self, then: AfterMove) {
        match then {
            AfterMove::PlayerAction => self.consume_player_action(),
            AfterMove::EnemyAction { origin } => self.finish_enemy_move(origin),
        }
    }

    fn resume(&mut self, then: Resume) {
        if self.is_battle_over() {
            return;
        }
        match then {
            Resume::BeginEnemyTurn => self.begin_enemy_turn(),
            Resume::EnemyStep => self.enemy_step(),
            Resume::StartPlayerTurn => self.begin_player_turn(),
        }
    }

    pub(super) fn character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        let Self { player, enemy, .. } = self;
        player.member_mut(id).or_else(|| enemy.member_mut(id))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::started;
    use super::super::{ActionError, ActionType, BattlePhase};
    use super::*;

    #[test]
    fn movement_position_is_committed_only_at_completion() {
        let mut engine = started(Position::new(2, 2), Position::new(8, 8));
        engine.select_action(ActionType::Move).unwrap();
        engine.on_cell_selected(Position::new(2, 5)).unwrap();

        assert!(engine.is_busy());
        engine.advance(Tick(250));
        assert_eq!(
            engine.character(CharacterId(1)).unwrap().position(),
            Some(Position::new(2, 2))
        );
        assert_eq!(engine.actions_remaining(), 3);

        engine.advance(Tick(50));
        assert_eq!(
            engine.character(CharacterId(1)).unwrap().position(),
            Some(Position::new(2, 5))
        );
        assert_eq!(engine.grid().character_at(Position::new(2, 5)), Some(CharacterId(1)));
        assert!(!engine.grid().is_occupied(Position::new(2, 2)));
        assert_eq!(engine.actions_remaining(), 2);
        assert!(!engine.is_busy());
    }

    #[test]
    fn input_is_rejected_while_moving() {
        let mut engine = started(Position::new(2, 2), Position::new(8, 8));
        engine.select_action(ActionType::Move).unwrap();
        engine.on_cell_selected(Position::new(2, 4)).unwrap();

        assert_eq!(
            engine.select_action(ActionType::Attack),
            Err(ActionError::Busy)
        );
        assert_eq!(
            engine.end_turn_button_clicked(),
            Err(ActionError::Busy)
        );
    }

    #[test]
    fn cancelled_movement_snaps_to_completed_node() {
        let mut engine = started(Position::new(2, 2), Position::new(8, 8));
        engine.select_action(ActionType::Move).unwrap();
        engine.on_cell_selected(Position::new(5, 2)).unwrap();
        engine.advance(Tick(150));

        engine.cancel_movement().unwrap();

        assert_eq!(
            engine.character(CharacterId(1)).unwrap().position(),
            Some(Position::new(3, 2))
        );
        assert_eq!(engine.actions_remaining(), 2);
        assert!(engine.cancel_movement().is_err());
    }

    #[test]
    fn handoff_delay_then_enemy_turn_then_next_player_turn() {
        let mut engine = started(Position::new(0, 0), Position::new(9, 9));
        engine.end_turn_button_clicked().unwrap();
        assert_eq!(engine.phase(), BattlePhase::EnemyTurn);
        assert_eq!(engine.time_to_next_wake(), Some(Tick(50)));

        engine.run_until_idle(Tick(100_000));

        assert_eq!(engine.phase(), BattlePhase::PlayerTurn);
        assert_eq!(engine.current_turn(), 2);
        assert_eq!(engine.actions_remaining(), 3);
    }

    #[test]
    fn cancelled_handoff_delay_starts_the_enemy_turn_at_once() {
        let mut engine = started(Position::new(0, 0), Position::new(9, 9));
        assert_eq!(engine.cancel_delay(), Err(ActionError::NotWaiting));

        engine.end_turn_button_clicked().unwrap();
        let before = engine.clock();
        engine.cancel_delay().unwrap();

        assert_eq!(engine.clock(), before);
        assert_eq!(engine.phase(), BattlePhase::EnemyTurn);
        assert_ne!(engine.time_to_next_wake(), Some(Tick(50)));

        engine.run_until_idle(Tick(100_000));
        assert_eq!(engine.phase(), BattlePhase::PlayerTurn);
        assert_eq!(engine.current_turn(), 2);
    }

    #[test]
    fn cancel_delay_leaves_movement_alone() {
        let mut engine = started(Position::new(2, 2), Position::new(8, 8));
        engine.select_action(ActionType::Move).unwrap();
        engine.on_cell_selected(Position::new(2, 4)).unwrap();

        assert_eq!(engine.cancel_delay(), Err(ActionError::NotWaiting));
        assert!(engine.is_busy());
    }
}
