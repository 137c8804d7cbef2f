//! Battle bootstrap and turn hand-off.

use tracing::info;

use crate::event::Notification;
use crate::types::Team;

use super::{ActionError, BattleEngine, BattlePhase, Resume, Suspension};

impl BattleEngine {
    /// Places both active characters (random empty cells unless already
    /// placed) and opens turn 1.
    pub fn start_battle(&mut self) -> Result<(), ActionError> {
        match self.turn.phase {
            BattlePhase::NotStarted => {}
            BattlePhase::BattleOver(_) => return Err(ActionError::BattleOver),
            _ => return Err(ActionError::AlreadyStarted),
        }

        for team in [Team::Player, Team::Enemy] {
            let squad = self.squad_mut(team);
            if !squad.has_active_character() {
                squad.promote_next_alive();
            }
            let active = self
                .squad(team)
                .active_id()
                .ok_or(ActionError::NoActiveCharacter { team })?;
            self.ensure_placed(active)?;
            self.notify(Notification::ActiveCharacterChanged { team, id: active });
        }

        info!(
            target: "tactics_core::engine",
            seed = self.seed,
            player = ?self.player.active_id(),
            enemy = ?self.enemy.active_id(),
            "battle started"
        );
        self.begin_player_turn();
        Ok(())
    }

    /// Opens the next player turn immediately.
    pub fn start_new_turn(&mut self) -> Result<(), ActionError> {
        match self.turn.phase {
            BattlePhase::NotStarted => return Err(ActionError::NotStarted),
            BattlePhase::BattleOver(_) => return Err(ActionError::BattleOver),
            _ => {}
        }
        if self.is_busy() {
            return Err(ActionError::Busy);
        }
        self.begin_player_turn();
        Ok(())
    }

    /// Ends the player's turn early.
    pub fn end_turn_button_clicked(&mut self) -> Result<(), ActionError> {
        self.ensure_player_input().map_err(|error| self.reject(error))?;
        self.end_player_turn();
        Ok(())
    }

    /// Ends the battle because the outer loop's turn limit was reached.
    ///
    /// The outcome follows the usual defeat rules; with nobody defeated the
    /// result is a draw.
    pub fn end_battle_at_turn_limit(&mut self) -> Result<(), ActionError> {
        match self.turn.phase {
            BattlePhase::NotStarted => return Err(ActionError::NotStarted),
            BattlePhase::BattleOver(_) => return Err(ActionError::BattleOver),
            _ => {}
        }
        let outcome = super::determine_battle_result(
            self.player.is_squad_defeated(),
            self.enemy.is_squad_defeated(),
        )
        .unwrap_or(super::BattleOutcome::Draw);
        info!(
            target: "tactics_core::engine",
            turn = self.turn.turn,
            max_turns = self.config.max_turns,
            %outcome,
            "turn limit reached"
        );
        self.conclude(outcome);
        Ok(())
    }

    pub(super) fn ensure_player_input(&self) -> Result<(), ActionError> {
        match self.turn.phase {
            BattlePhase::NotStarted => Err(ActionError::NotStarted),
            BattlePhase::BattleOver(_) => Err(ActionError::BattleOver),
            BattlePhase::EnemyTurn => Err(ActionError::NotPlayerTurn),
            BattlePhase::PlayerTurn if self.is_busy() => Err(ActionError::Busy),
            BattlePhase::PlayerTurn => Ok(()),
        }
    }

    pub(super) fn begin_player_turn(&mut self) {
        self.clear_pending();
        self.turn.turn += 1;
        self.turn.phase = BattlePhase::PlayerTurn;
        self.turn.actions_remaining = self.config.actions_per_turn;

        for team in [Team::Player, Team::Enemy] {
            let drawn = self.pool.draw(&mut self.rng, self.config.cards_per_draw);
            let names = drawn.iter().map(|card| card.name.clone()).collect();
            self.hand_mut(team).offer(drawn);
            self.notify(Notification::CardsOffered { team, cards: names });
        }

        info!(
            target: "tactics_core::engine",
            turn = self.turn.turn,
            actions = self.turn.actions_remaining,
            "player turn started"
        );
        self.notify(Notification::TurnChanged {
            turn: self.turn.turn,
            team: Team::Player,
        });
        self.notify(Notification::ActionsRemaining {
            remaining: self.turn.actions_remaining,
        });
        self.notify(Notification::ActionButtons { visible: true });
        self.announce(format!("Turn {}: your move", self.turn.turn));
    }

    /// Consumes one player action and ends the turn when none remain.
    pub(super) fn consume_player_action(&mut self) {
        self.turn.actions_remaining = self.turn.actions_remaining.saturating_sub(1);
        self.notify(Notification::ActionsRemaining {
            remaining: self.turn.actions_remaining,
        });
        if self.settle() {
            return;
        }
        if self.turn.actions_remaining == 0 {
            self.end_player_turn();
        }
    }

    pub(super) fn end_player_turn(&mut self) {
        self.clear_pending();
        self.player_hand.close();
        self.notify(Notification::CardsDiscarded { team: Team::Player });
        self.notify(Notification::ActionButtons { visible: false });
        self.turn.phase = BattlePhase::EnemyTurn;
        self.settle();
        info!(
            target: "tactics_core::engine",
            turn = self.turn.turn,
            "player turn ended"
        );
        self.announce("The turn passes to the enemy...");
        self.suspend(Suspension::Delay {
            remaining: self.config.turn_handoff_delay(),
            then: Resume::BeginEnemyTurn,
        });
    }
}
