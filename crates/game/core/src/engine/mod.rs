//! Turn state machine and action resolution.
//!
//! [`BattleEngine`] owns the grid, both squads, the card pool and the RNG. All
//! mutation flows through its inbound operations (`select_action`,
//! `select_target`, `on_cell_selected`, ...) and through [`BattleEngine::advance`],
//! which drives timed suspensions (movement, inter-action delay, turn hand-off)
//! deterministically.
//!
//! While a suspension is pending the engine rejects every mutating input with
//! [`ActionError::Busy`]. Observers read the outcome of each step from the
//! notification queue.

mod actions;
mod enemy;
mod errors;
mod outcome;
mod schedule;
mod turns;

pub use enemy::{EnemyDecision, decide_enemy_action};
pub use errors::{ActionError, SetupError};
pub use outcome::{BattleOutcome, BattleStatistics, BattleSummary, determine_battle_result};
pub use schedule::{AfterMove, Resume, Suspension};

use std::collections::{HashSet, VecDeque};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::card::{Card, CardHand, CardPool};
use crate::character::Character;
use crate::config::BattleConfig;
use crate::event::{CharacterEvent, Notification};
use crate::grid::Grid;
use crate::squad::Squad;
use crate::types::{CharacterId, Position, Team, Tick};

/// Player input kinds that consume an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionType {
    Move,
    Attack,
    SuperAttack,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    NotStarted,
    PlayerTurn,
    EnemyTurn,
    BattleOver(BattleOutcome),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct TurnState {
    turn: u32,
    phase: BattlePhase,
    actions_remaining: u32,
    pending: Option<ActionType>,
    weapon_selected: bool,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            turn: 0,
            phase: BattlePhase::NotStarted,
            actions_remaining: 0,
            pending: None,
            weapon_selected: false,
        }
    }
}

/// A single battle. Cloning yields an independent snapshot, RNG included.
#[derive(Clone, Debug)]
pub struct BattleEngine {
    config: BattleConfig,
    grid: Grid,
    player: Squad,
    enemy: Squad,
    pool: CardPool,
    seed: u64,
    rng: StdRng,

    turn: TurnState,
    player_hand: CardHand,
    enemy_hand: CardHand,
    move_highlight: Vec<Position>,

    clock: Tick,
    suspension: Option<Suspension>,
    notifications: VecDeque<Notification>,
    statistics: BattleStatistics,
    summary: Option<BattleSummary>,
}

/// Collects the collaborators of a battle and validates them together.
#[derive(Default)]
pub struct BattleEngineBuilder {
    config: Option<BattleConfig>,
    grid: Option<Grid>,
    player: Option<Squad>,
    enemy: Option<Squad>,
    pool: Option<CardPool>,
}

impl BattleEngineBuilder {
    pub fn config(mut self, config: BattleConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn grid(mut self, grid: Grid) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Uses a grid sized from the configuration.
    pub fn default_grid(mut self) -> Self {
        let config = self.config.clone().unwrap_or_default();
        self.grid = Some(Grid::with_cell_size(
            config.grid_width,
            config.grid_height,
            config.cell_size,
        ));
        self
    }

    pub fn player_squad(mut self, squad: Squad) -> Self {
        self.player = Some(squad);
        self
    }

    pub fn enemy_squad(mut self, squad: Squad) -> Self {
        self.enemy = Some(squad);
        self
    }

    pub fn card_pool(mut self, pool: CardPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn build(self) -> Result<BattleEngine, SetupError> {
        let config = self.config.unwrap_or_default();
        let grid = self.grid.ok_or(SetupError::MissingGrid)?;
        if grid.width() <= 0 || grid.height() <= 0 {
            return Err(SetupError::InvalidGrid {
                width: grid.width(),
                height: grid.height(),
            });
        }
        if grid.width() * grid.height() < 2 {
            return Err(SetupError::GridTooSmall);
        }

        let player = validate_squad(self.player, Team::Player)?;
        let enemy = validate_squad(self.enemy, Team::Enemy)?;
        let mut seen = HashSet::new();
        for member in player.members().iter().chain(enemy.members()) {
            if !seen.insert(member.id()) {
                return Err(SetupError::DuplicateCharacter { id: member.id() });
            }
        }

        let pool = self.pool.unwrap_or_default();
        if pool.is_empty() {
            return Err(SetupError::EmptyCardPool);
        }
        if config.actions_per_turn == 0 {
            return Err(SetupError::NoActionsPerTurn);
        }

        debug!(
            target: "tactics_core::engine",
            width = grid.width(),
            height = grid.height(),
            players = player.member_count(),
            enemies = enemy.member_count(),
            cards = pool.len(),
            seed = config.seed,
            "battle engine constructed"
        );

        let seed = config.seed;
        Ok(BattleEngine {
            config,
            grid,
            player,
            enemy,
            pool,
            seed,
            rng: StdRng::seed_from_u64(seed),
            turn: TurnState::default(),
            player_hand: CardHand::new(),
            enemy_hand: CardHand::new(),
            move_highlight: Vec::new(),
            clock: Tick::ZERO,
            suspension: None,
            notifications: VecDeque::new(),
            statistics: BattleStatistics::default(),
            summary: None,
        })
    }
}

fn validate_squad(squad: Option<Squad>, expected: Team) -> Result<Squad, SetupError> {
    let squad = squad.ok_or(SetupError::MissingSquad { team: expected })?;
    if squad.team() != expected {
        return Err(SetupError::TeamMismatch {
            expected,
            found: squad.team(),
        });
    }
    if squad.member_count() == 0 {
        return Err(SetupError::EmptySquad { team: expected });
    }
    Ok(squad)
}

impl BattleEngine {
    pub fn builder() -> BattleEngineBuilder {
        BattleEngineBuilder::default()
    }

    /// Shorthand for a fully specified builder.
    pub fn new(
        config: BattleConfig,
        grid: Grid,
        player: Squad,
        enemy: Squad,
        pool: CardPool,
    ) -> Result<Self, SetupError> {
        Self::builder()
            .config(config)
            .grid(grid)
            .player_squad(player)
            .enemy_squad(enemy)
            .card_pool(pool)
            .build()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player_squad(&self) -> &Squad {
        &self.player
    }

    pub fn enemy_squad(&self) -> &Squad {
        &self.enemy
    }

    pub fn squad(&self, team: Team) -> &Squad {
        match team {
            Team::Player => &self.player,
            Team::Enemy => &self.enemy,
        }
    }

    pub fn card_pool(&self) -> &CardPool {
        &self.pool
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.player.member(id).or_else(|| self.enemy.member(id))
    }

    pub fn phase(&self) -> BattlePhase {
        self.turn.phase
    }

    pub fn current_turn(&self) -> u32 {
        self.turn.turn
    }

    pub fn is_player_turn(&self) -> bool {
        self.turn.phase == BattlePhase::PlayerTurn
    }

    pub fn actions_remaining(&self) -> u32 {
        self.turn.actions_remaining
    }

    pub fn pending_action(&self) -> Option<ActionType> {
        self.turn.pending
    }

    pub fn weapon_selected(&self) -> bool {
        self.turn.weapon_selected
    }

    pub fn is_battle_over(&self) -> bool {
        matches!(self.turn.phase, BattlePhase::BattleOver(_))
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.turn.phase {
            BattlePhase::BattleOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// True while a movement or delay must elapse before input is accepted.
    pub fn is_busy(&self) -> bool {
        self.suspension.is_some()
    }

    pub fn suspension(&self) -> Option<&Suspension> {
        self.suspension.as_ref()
    }

    pub fn clock(&self) -> Tick {
        self.clock
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn statistics(&self) -> &BattleStatistics {
        &self.statistics
    }

    pub fn summary(&self) -> Option<&BattleSummary> {
        self.summary.as_ref()
    }

    pub fn player_cards(&self) -> &[Card] {
        self.player_hand.cards()
    }

    pub fn enemy_cards(&self) -> &[Card] {
        self.enemy_hand.cards()
    }

    pub fn can_use_player_cards(&self) -> bool {
        self.player_hand.can_use()
    }

    /// Cells offered by the current move targeting, empty otherwise.
    pub fn move_highlight(&self) -> &[Position] {
        &self.move_highlight
    }

    /// Takes every notification raised since the last drain, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Restores every entity to its pre-battle values and drops queued
    /// notifications. The RNG restarts from the current seed.
    pub fn reset_state(&mut self) {
        self.player.reset_state();
        self.enemy.reset_state();
        self.grid.clear();
        self.turn = TurnState::default();
        self.player_hand = CardHand::new();
        self.enemy_hand = CardHand::new();
        self.move_highlight.clear();
        self.clock = Tick::ZERO;
        self.suspension = None;
        self.notifications.clear();
        self.statistics = BattleStatistics::default();
        self.summary = None;
        self.rng = StdRng::seed_from_u64(self.seed);
        debug!(target: "tactics_core::engine", seed = self.seed, "battle state reset");
    }

    /// Replaces the seed; takes effect on the next [`BattleEngine::reset_state`].
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn notify(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
    }

    fn announce(&mut self, text: impl Into<String>) {
        let duration = self.config.message_duration();
        self.notify(Notification::message(text, duration));
    }

    /// Logs a rejected input, surfaces it as a message and hands it back.
    fn reject(&mut self, error: ActionError) -> ActionError {
        debug!(
            target: "tactics_core::engine",
            code = crate::error::GameError::error_code(&error),
            %error,
            "input rejected"
        );
        self.announce(error.to_string());
        error
    }

    fn squad_mut(&mut self, team: Team) -> &mut Squad {
        match team {
            Team::Player => &mut self.player,
            Team::Enemy => &mut self.enemy,
        }
    }

    fn hand_mut(&mut self, team: Team) -> &mut CardHand {
        match team {
            Team::Player => &mut self.player_hand,
            Team::Enemy => &mut self.enemy_hand,
        }
    }

    /// Commits a finished or cancelled traversal to the grid.
    fn commit_move(&mut self, mover: CharacterId, destination: Position) {
        let Self {
            grid,
            player,
            enemy,
            ..
        } = self;
        let Some(character) = player.member_mut(mover).or_else(|| enemy.member_mut(mover)) else {
            return;
        };
        match grid.place_character(character, destination) {
            Ok(placement) => {
                debug!(
                    target: "tactics_core::engine",
                    character = %mover,
                    from = ?placement.from,
                    to = %placement.to,
                    "movement committed"
                );
                self.notify(Notification::CharacterMoved {
                    id: mover,
                    from: placement.from,
                    to: placement.to,
                });
            }
            Err(error) => {
                warn!(
                    target: "tactics_core::engine",
                    character = %mover,
                    %error,
                    "movement could not be committed"
                );
            }
        }
    }

    /// Places `id` on a random empty cell if it is not on the board yet.
    fn ensure_placed(&mut self, id: CharacterId) -> Result<(), ActionError> {
        let Self {
            grid,
            player,
            enemy,
            rng,
            ..
        } = self;
        let Some(character) = player.member_mut(id).or_else(|| enemy.member_mut(id)) else {
            return Ok(());
        };
        if character.position().is_some() {
            return Ok(());
        }
        let cell = grid
            .random_empty_position(rng)
            .ok_or(ActionError::NoFreeCell)?;
        let placement = grid.place_character(character, cell)?;
        self.notify(Notification::CharacterMoved {
            id,
            from: None,
            to: placement.to,
        });
        Ok(())
    }

    /// Forwards character outboxes, updates statistics, and handles deaths.
    ///
    /// Returns true when the battle has ended.
    fn settle(&mut self) -> bool {
        let mut died = Vec::new();
        for team in [Team::Player, Team::Enemy] {
            let mut drained = Vec::new();
            for member in self.squad_mut(team).members_mut() {
                let id = member.id();
                drained.extend(member.drain_events().into_iter().map(|event| (id, event)));
            }
            for (id, event) in drained {
                match event {
                    CharacterEvent::DamageTaken { amount } => match team {
                        Team::Enemy => self.statistics.damage_dealt += amount,
                        Team::Player => self.statistics.damage_received += amount,
                    },
                    CharacterEvent::Died => died.push((team, id)),
                    _ => {}
                }
                self.notify(Notification::Character { id, event });
            }
        }

        for (team, id) in died {
            self.handle_death(team, id);
        }
        self.check_battle_end()
    }

    fn handle_death(&mut self, team: Team, id: CharacterId) {
        let Self {
            grid,
            player,
            enemy,
            ..
        } = self;
        let squad = match team {
            Team::Player => player,
            Team::Enemy => enemy,
        };
        if let Some(character) = squad.member_mut(id) {
            grid.remove_character(character);
        }

        if squad.has_active_character() {
            return;
        }
        let Some(successor) = squad.promote_next_alive() else {
            return;
        };
        debug!(
            target: "tactics_core::engine",
            %team,
            fallen = %id,
            successor = %successor,
            "active character replaced"
        );
        self.notify(Notification::ActiveCharacterChanged {
            team,
            id: successor,
        });
        if let Err(error) = self.ensure_placed(successor) {
            warn!(
                target: "tactics_core::engine",
                character = %successor,
                %error,
                "successor could not be placed"
            );
        }
    }

    /// Clears targeting state and any temporary range override.
    fn clear_pending(&mut self) {
        let had_highlight = self.turn.pending.is_some() || !self.move_highlight.is_empty();
        self.turn.pending = None;
        self.turn.weapon_selected = false;
        self.move_highlight.clear();
        for member in self.player.members_mut() {
            member.set_range_override(None);
        }
        if had_highlight {
            self.notify(Notification::ClearHighlights);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::character::test_support::character;

    #[test]
    fn builder_refuses_missing_collaborators() {
        let squad = || Squad::new(Team::Player, vec![character(1, Team::Player)]);
        let foes = || Squad::new(Team::Enemy, vec![character(2, Team::Enemy)]);

        let missing_grid = BattleEngine::builder()
            .player_squad(squad())
            .enemy_squad(foes())
            .card_pool(pool())
            .build();
        assert_eq!(missing_grid.err(), Some(SetupError::MissingGrid));

        let missing_enemy = BattleEngine::builder()
            .default_grid()
            .player_squad(squad())
            .card_pool(pool())
            .build();
        assert_eq!(
            missing_enemy.err(),
            Some(SetupError::MissingSquad { team: Team::Enemy })
        );

        let empty_pool = BattleEngine::builder()
            .default_grid()
            .player_squad(squad())
            .enemy_squad(foes())
            .card_pool(CardPool::default())
            .build();
        assert_eq!(empty_pool.err(), Some(SetupError::EmptyCardPool));
    }

    #[test]
    fn builder_rejects_swapped_and_duplicate_squads() {
        let result = BattleEngine::new(
            BattleConfig::default(),
            Grid::new(10, 10),
            Squad::new(Team::Enemy, vec![character(1, Team::Enemy)]),
            Squad::new(Team::Enemy, vec![character(2, Team::Enemy)]),
            pool(),
        );
        assert_eq!(
            result.err(),
            Some(SetupError::TeamMismatch {
                expected: Team::Player,
                found: Team::Enemy
            })
        );

        let result = BattleEngine::new(
            BattleConfig::default(),
            Grid::new(10, 10),
            Squad::new(Team::Player, vec![character(1, Team::Player)]),
            Squad::new(Team::Enemy, vec![character(1, Team::Enemy)]),
            pool(),
        );
        assert_eq!(
            result.err(),
            Some(SetupError::DuplicateCharacter { id: CharacterId(1) })
        );
    }

    #[test]
    fn reset_restores_pre_battle_state() {
        let mut engine = started(Position::new(2, 2), Position::new(3, 2));
        engine.select_action(ActionType::Attack).unwrap();
        engine.select_weapon(crate::AttackType::Sword).unwrap();
        engine.select_target(CharacterId(2)).unwrap();
        assert!(engine.statistics().damage_dealt > 0);

        engine.reset_state();

        assert_eq!(engine.phase(), BattlePhase::NotStarted);
        assert_eq!(engine.current_turn(), 0);
        assert_eq!(engine.grid().occupied_count(), 0);
        assert_eq!(engine.statistics(), &BattleStatistics::default());
        assert!(engine.drain_notifications().is_empty());
        let foe = engine.character(CharacterId(2)).unwrap();
        assert_eq!(foe.current_health(), foe.max_health());
        assert_eq!(foe.position(), None);
    }
}
