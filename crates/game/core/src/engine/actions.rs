//! Player input: action selection, targeting, weapons and cards.

use tracing::{debug, info};

use crate::card::{Card, CardError};
use crate::character::AttackType;
use crate::event::Notification;
use crate::grid::HighlightMode;
use crate::movement::MoveError;
use crate::types::{CharacterId, Position, Team};

use super::{ActionError, ActionType, AfterMove, BattleEngine, Suspension};

impl BattleEngine {
    /// Enters targeting for `action`.
    ///
    /// `Move` highlights the straight rays the active character can walk.
    /// `Attack` asks for a weapon first. `SuperAttack` requires full energy
    /// and widens the active character's range to the super-attack range.
    pub fn select_action(&mut self, action: ActionType) -> Result<(), ActionError> {
        self.ensure_player_input().map_err(|error| self.reject(error))?;
        if self.turn.actions_remaining == 0 {
            return Err(self.reject(ActionError::NoActionsRemaining));
        }
        let Some(actor) = self.player.active_character() else {
            return Err(self.reject(ActionError::NoActiveCharacter { team: Team::Player }));
        };
        let Some(origin) = actor.position() else {
            return Err(self.reject(MoveError::NotPlaced.into()));
        };
        if action == ActionType::SuperAttack && !actor.can_perform_super_attack() {
            return Err(self.reject(ActionError::SuperAttackUnavailable));
        }

        if self.turn.pending.is_some() {
            self.clear_pending();
        }
        self.turn.pending = Some(action);
        debug!(target: "tactics_core::engine", %action, %origin, "action selected");

        match action {
            ActionType::Move => {
                let cells = self.grid.highlightable_range(
                    origin,
                    self.config.max_move_distance,
                    HighlightMode::Move,
                );
                self.move_highlight = cells.clone();
                self.notify(Notification::Highlight {
                    cells,
                    kind: HighlightMode::Move,
                });
            }
            ActionType::Attack => {
                self.turn.weapon_selected = false;
                self.notify(Notification::WeaponSelectionRequested);
            }
            ActionType::SuperAttack => {
                let range = self.config.super_attack_range;
                if let Some(actor) = self.player.active_character_mut() {
                    actor.set_range_override(Some(range));
                }
                self.highlight_attack_range(origin, range);
            }
        }
        self.settle();
        Ok(())
    }

    /// Chooses the weapon for a pending attack and enters attack targeting.
    pub fn select_weapon(&mut self, attack_type: AttackType) -> Result<(), ActionError> {
        self.ensure_player_input().map_err(|error| self.reject(error))?;
        if self.turn.pending != Some(ActionType::Attack) {
            let error = ActionError::UnexpectedPendingAction {
                expected: ActionType::Attack,
                found: self.turn.pending,
            };
            return Err(self.reject(error));
        }
        let Some(actor) = self.player.active_character_mut() else {
            return Err(self.reject(ActionError::NoActiveCharacter { team: Team::Player }));
        };
        actor.set_attack_type(attack_type);
        let origin = actor.position();
        let range = self.config.attack_range;

        self.turn.weapon_selected = true;
        if let Some(origin) = origin {
            self.highlight_attack_range(origin, range);
        }
        self.settle();
        Ok(())
    }

    /// Resolves a pending attack or super attack against `target`.
    ///
    /// The target must be the enemy's active character within the action's
    /// range. Rejections keep the pending action so another target can be
    /// picked.
    pub fn select_target(&mut self, target: CharacterId) -> Result<(), ActionError> {
        self.ensure_player_input().map_err(|error| self.reject(error))?;
        if self.turn.actions_remaining == 0 {
            return Err(self.reject(ActionError::NoActionsRemaining));
        }
        let action = match self.turn.pending {
            Some(action @ (ActionType::Attack | ActionType::SuperAttack)) => action,
            Some(ActionType::Move) => {
                let error = ActionError::UnexpectedPendingAction {
                    expected: ActionType::Attack,
                    found: Some(ActionType::Move),
                };
                return Err(self.reject(error));
            }
            None => return Err(self.reject(ActionError::NoPendingAction)),
        };
        if action == ActionType::Attack && !self.turn.weapon_selected {
            return Err(self.reject(ActionError::WeaponNotSelected));
        }

        let distance = match self.validate_target(target, action) {
            Ok(distance) => distance,
            Err(error) => return Err(self.reject(error)),
        };

        let Self { player, enemy, .. } = self;
        let (Some(attacker), Some(victim)) = (player.active_character_mut(), enemy.member_mut(target))
        else {
            return Err(self.reject(ActionError::InvalidTarget { target }));
        };
        let report = match action {
            ActionType::SuperAttack => {
                let report = attacker.perform_super_attack(victim);
                attacker.set_range_override(None);
                report
            }
            _ => attacker.perform_attack(victim),
        };
        let attacker_name = attacker.name().to_owned();
        let victim_name = victim.name().to_owned();

        let Some(report) = report else {
            self.clear_pending();
            let error = match action {
                ActionType::SuperAttack => ActionError::SuperAttackUnavailable,
                _ => ActionError::InvalidTarget { target },
            };
            return Err(self.reject(error));
        };
        info!(
            target: "tactics_core::engine",
            attacker = %report.attacker,
            victim = %report.target,
            kind = ?report.kind,
            distance,
            damage = report.damage,
            "player attack resolved"
        );
        let verb = match action {
            ActionType::SuperAttack => "unleashes a super attack on",
            _ => "attacks",
        };
        self.announce(format!(
            "{attacker_name} {verb} {victim_name} for {} damage",
            report.damage
        ));

        self.clear_pending();
        self.consume_player_action();
        Ok(())
    }

    /// Picks the destination of a pending move.
    ///
    /// The cell must be one of the highlighted move cells. The action is
    /// consumed when the traversal completes, not here.
    pub fn on_cell_selected(&mut self, cell: Position) -> Result<(), ActionError> {
        self.ensure_player_input().map_err(|error| self.reject(error))?;
        if self.turn.actions_remaining == 0 {
            return Err(self.reject(ActionError::NoActionsRemaining));
        }
        match self.turn.pending {
            Some(ActionType::Move) => {}
            None => return Err(self.reject(ActionError::NoPendingAction)),
            found => {
                let error = ActionError::UnexpectedPendingAction {
                    expected: ActionType::Move,
                    found,
                };
                return Err(self.reject(error));
            }
        }
        if !self.move_highlight.contains(&cell) {
            return Err(self.reject(MoveError::Unreachable { destination: cell }.into()));
        }

        let max_distance = self.config.max_move_distance;
        let per_cell = self.config.move_ticks_per_cell();
        let Self { grid, player, .. } = self;
        let Some(actor) = player.active_character_mut() else {
            return Err(self.reject(ActionError::NoActiveCharacter { team: Team::Player }));
        };
        let mover = actor.id();
        let from = actor.position();
        let started = actor.try_move_to(grid, cell, max_distance, per_cell);
        let path = actor
            .traversal()
            .map(|traversal| traversal.path().to_vec())
            .unwrap_or_default();

        match started {
            Ok(true) => {}
            Ok(false) => {
                let from = from.unwrap_or(cell);
                return Err(self.reject(MoveError::Blocked { from }.into()));
            }
            Err(error) => return Err(self.reject(error.into())),
        }

        debug!(
            target: "tactics_core::engine",
            character = %mover,
            destination = %cell,
            "player movement started"
        );
        self.clear_pending();
        self.notify(Notification::MovementStarted { id: mover, path });
        self.suspend(Suspension::Movement {
            mover,
            then: AfterMove::PlayerAction,
        });
        Ok(())
    }

    /// Leaves targeting without consuming an action.
    pub fn cancel_pending_action(&mut self) -> Result<(), ActionError> {
        self.ensure_player_input()?;
        if self.turn.pending.is_none() {
            return Err(ActionError::NoPendingAction);
        }
        self.clear_pending();
        self.settle();
        Ok(())
    }

    /// Plays player card `index` on the active character.
    ///
    /// Cards are single use per turn: the remaining offered cards are
    /// discarded. Does not consume an action.
    pub fn use_player_card(&mut self, index: usize) -> Result<Card, ActionError> {
        self.ensure_player_input().map_err(|error| self.reject(error))?;
        let Some(active) = self.player.active_id() else {
            return Err(self.reject(ActionError::NoActiveCharacter { team: Team::Player }));
        };
        if self.player_hand.can_use()
            && let Some(card) = self.player_hand.cards().get(index)
            && card.effect.is_empty()
        {
            let error = CardError::NoEffect {
                name: card.name.clone(),
            };
            return Err(self.reject(error.into()));
        }

        let card = match self.player_hand.take(index) {
            Ok(card) => card,
            Err(error) => return Err(self.reject(error.into())),
        };
        self.play_card(Team::Player, active, &card);
        Ok(card)
    }

    /// Applies a card to `target` and reports it.
    pub(super) fn play_card(&mut self, team: Team, target: CharacterId, card: &Card) {
        if let Some(character) = self.character_mut(target) {
            card.effect.apply_to(character);
        }
        info!(
            target: "tactics_core::engine",
            %team,
            character = %target,
            card = %card.name,
            "card used"
        );
        self.notify(Notification::CardUsed {
            team,
            character: target,
            card: card.name.clone(),
        });
        self.notify(Notification::CardsDiscarded { team });
        self.announce(match team {
            Team::Player => format!("Card played: {}", card.name),
            Team::Enemy => format!("The enemy plays a card: {}", card.name),
        });
        self.settle();
    }

    /// Distance to a valid target, or why it is not one.
    ///
    /// Attacks reach `attack_range` whatever the weapon; super attacks reach
    /// `super_attack_range`.
    fn validate_target(&self, target: CharacterId, action: ActionType) -> Result<u32, ActionError> {
        let attacker = self
            .player
            .active_character()
            .ok_or(ActionError::NoActiveCharacter { team: Team::Player })?;
        if self.enemy.active_id() != Some(target) {
            return Err(ActionError::InvalidTarget { target });
        }
        let victim = self
            .enemy
            .member(target)
            .ok_or(ActionError::InvalidTarget { target })?;
        let (Some(from), Some(to)) = (attacker.position(), victim.position()) else {
            return Err(ActionError::InvalidTarget { target });
        };
        let distance = from.manhattan_distance(to);
        let range = match action {
            ActionType::SuperAttack => self.config.super_attack_range,
            _ => self.config.attack_range,
        };
        if distance > range {
            return Err(ActionError::OutOfRange { distance, range });
        }
        Ok(distance)
    }

    fn highlight_attack_range(&mut self, origin: Position, range: u32) {
        let cells = self
            .grid
            .highlightable_range(origin, range, HighlightMode::Attack);
        self.notify(Notification::Highlight {
            cells,
            kind: HighlightMode::Attack,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::started;
    use super::super::BattlePhase;
    use super::*;
    use crate::types::Tick;

    #[test]
    fn attack_requires_weapon_before_target() {
        let mut engine = started(Position::new(2, 2), Position::new(3, 2));
        engine.select_action(ActionType::Attack).unwrap();
        assert!(
            engine
                .drain_notifications()
                .contains(&Notification::WeaponSelectionRequested)
        );

        assert_eq!(
            engine.select_target(CharacterId(2)),
            Err(ActionError::WeaponNotSelected)
        );
        assert_eq!(engine.actions_remaining(), 3);

        engine.select_weapon(AttackType::Sword).unwrap();
        engine.select_target(CharacterId(2)).unwrap();

        let foe = engine.character(CharacterId(2)).unwrap();
        assert_eq!(foe.current_health(), 60);
        assert_eq!(engine.actions_remaining(), 2);
        assert_eq!(engine.pending_action(), None);
        assert!(!engine.weapon_selected());
        assert_eq!(engine.character(CharacterId(1)).unwrap().current_energy(), 35.0);
    }

    #[test]
    fn out_of_range_target_is_rejected_without_consuming() {
        let mut engine = started(Position::new(2, 2), Position::new(5, 2));
        engine.select_action(ActionType::Attack).unwrap();
        engine.select_weapon(AttackType::Bow).unwrap();
        engine.drain_notifications();

        assert_eq!(
            engine.select_target(CharacterId(2)),
            Err(ActionError::OutOfRange {
                distance: 3,
                range: 2
            })
        );
        assert_eq!(engine.actions_remaining(), 3);
        assert_eq!(engine.pending_action(), Some(ActionType::Attack));
        assert_eq!(engine.character(CharacterId(2)).unwrap().current_health(), 100);
        assert!(
            engine
                .drain_notifications()
                .iter()
                .any(|note| matches!(note, Notification::Message { .. }))
        );
    }

    #[test]
    fn any_weapon_reaches_the_engine_attack_range() {
        let mut engine = started(Position::new(2, 2), Position::new(4, 2));
        engine.select_action(ActionType::Attack).unwrap();
        engine.select_weapon(AttackType::Sword).unwrap();
        assert!(engine.drain_notifications().iter().any(|note| matches!(
            note,
            Notification::Highlight { cells, kind: HighlightMode::Attack }
                if cells.contains(&Position::new(4, 2))
        )));

        engine.select_target(CharacterId(2)).unwrap();
        assert_eq!(engine.actions_remaining(), 2);
        assert!(engine.character(CharacterId(2)).unwrap().current_health() < 100);
    }

    #[test]
    fn super_attack_drained_before_targeting_drops_the_pending_action() {
        let mut engine = started(Position::new(2, 2), Position::new(5, 2));
        engine.character_mut_for_test(CharacterId(1)).modify_energy(100.0);
        engine.select_action(ActionType::SuperAttack).unwrap();
        engine.character_mut_for_test(CharacterId(1)).modify_energy(-100.0);

        assert_eq!(
            engine.select_target(CharacterId(2)),
            Err(ActionError::SuperAttackUnavailable)
        );
        assert_eq!(engine.pending_action(), None);
        assert_eq!(engine.actions_remaining(), 3);
        assert_eq!(engine.character(CharacterId(1)).unwrap().range_override(), None);
        assert_eq!(
            engine.select_target(CharacterId(2)),
            Err(ActionError::NoPendingAction)
        );
    }

    #[test]
    fn super_attack_needs_full_energy_and_widens_range() {
        let mut engine = started(Position::new(2, 2), Position::new(5, 2));
        assert_eq!(
            engine.select_action(ActionType::SuperAttack),
            Err(ActionError::SuperAttackUnavailable)
        );

        engine.character_mut_for_test(CharacterId(1)).modify_energy(100.0);
        engine.select_action(ActionType::SuperAttack).unwrap();
        assert_eq!(engine.character(CharacterId(1)).unwrap().attack_range(), 3);

        engine.select_target(CharacterId(2)).unwrap();

        let hero = engine.character(CharacterId(1)).unwrap();
        assert_eq!(hero.current_energy(), 0.0);
        assert_eq!(hero.range_override(), None);
        assert_eq!(engine.character(CharacterId(2)).unwrap().current_health(), 70);
        assert_eq!(engine.statistics().damage_dealt, 30);
    }

    #[test]
    fn cancelling_super_attack_restores_range() {
        let mut engine = started(Position::new(2, 2), Position::new(5, 2));
        engine.character_mut_for_test(CharacterId(1)).modify_energy(100.0);
        engine.select_action(ActionType::SuperAttack).unwrap();
        engine.cancel_pending_action().unwrap();

        let hero = engine.character(CharacterId(1)).unwrap();
        assert_eq!(hero.range_override(), None);
        assert_eq!(hero.current_energy(), 100.0);
        assert_eq!(engine.actions_remaining(), 3);
        assert_eq!(
            engine.cancel_pending_action(),
            Err(ActionError::NoPendingAction)
        );
    }

    #[test]
    fn move_target_must_be_a_highlighted_ray_cell() {
        let mut engine = started(Position::new(2, 2), Position::new(8, 8));
        assert_eq!(
            engine.on_cell_selected(Position::new(2, 3)),
            Err(ActionError::NoPendingAction)
        );

        engine.select_action(ActionType::Move).unwrap();
        assert_eq!(
            engine.on_cell_selected(Position::new(2, 6)),
            Err(ActionError::Move(MoveError::Unreachable {
                destination: Position::new(2, 6)
            }))
        );
        assert_eq!(
            engine.on_cell_selected(Position::new(3, 3)),
            Err(ActionError::Move(MoveError::Unreachable {
                destination: Position::new(3, 3)
            }))
        );
        assert_eq!(engine.pending_action(), Some(ActionType::Move));
        assert_eq!(
            engine.character(CharacterId(1)).unwrap().position(),
            Some(Position::new(2, 2))
        );
    }

    #[test]
    fn third_action_ends_the_turn() {
        let mut engine = started(Position::new(2, 2), Position::new(3, 2));
        for _ in 0..3 {
            engine.select_action(ActionType::Attack).unwrap();
            engine.select_weapon(AttackType::Magic).unwrap();
            engine.select_target(CharacterId(2)).unwrap();
        }

        assert_eq!(engine.character(CharacterId(2)).unwrap().current_health(), 10);
        assert_eq!(engine.actions_remaining(), 0);
        assert_eq!(engine.phase(), BattlePhase::EnemyTurn);
        assert!(engine.is_busy());
    }

    #[test]
    fn card_use_is_once_per_turn_and_free() {
        let mut engine = started(Position::new(0, 0), Position::new(9, 9));
        let before = engine.character(CharacterId(1)).unwrap().attack_power();

        let card = engine.use_player_card(0).unwrap();
        let after = engine.character(CharacterId(1)).unwrap().attack_power();
        assert_eq!(after - before, card.effect.attack);
        assert_eq!(engine.actions_remaining(), 3);
        assert!(engine.player_cards().is_empty());
        assert_eq!(
            engine.use_player_card(0),
            Err(ActionError::Card(CardError::AlreadyUsed))
        );

        engine.end_turn_button_clicked().unwrap();
        engine.run_until_idle(Tick(100_000));
        assert!(engine.can_use_player_cards());
    }
}
