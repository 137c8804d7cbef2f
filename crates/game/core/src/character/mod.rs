//! Combatants: stats, attacks, energy, movement and death.
//!
//! Every mutation records a [`CharacterEvent`] in the character's outbox. The
//! engine drains outboxes after each resolved step so notifications keep the
//! order in which stats actually changed.

mod attack;

pub use attack::{AttackEntry, AttackTable, AttackType};

use rand::Rng;
use tracing::{debug, trace};

use crate::combat::{AttackKind, AttackReport, apply_damage, mitigate};
use crate::config::CharacterConfig;
use crate::event::CharacterEvent;
use crate::grid::Grid;
use crate::movement::{MoveError, Traversal};
use crate::types::{CharacterId, Position, Team, Tick};

/// Rolled base stats a character is created with and reset back to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterStats {
    pub max_health: u32,
    pub base_attack: i32,
    pub armor: i32,
}

impl CharacterStats {
    pub fn roll<R: Rng + ?Sized>(config: &CharacterConfig, rng: &mut R) -> Self {
        Self {
            max_health: config.health.roll(rng).max(1) as u32,
            base_attack: config.base_attack.roll(rng),
            armor: config.armor.roll(rng).max(0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Character {
    id: CharacterId,
    name: String,
    team: Team,
    baseline: CharacterStats,
    config: CharacterConfig,

    current_health: u32,
    max_health: u32,
    current_armor: i32,
    max_armor: i32,
    current_energy: f32,

    attacks: AttackTable,
    attack_type: AttackType,
    range_override: Option<u32>,

    alive: bool,
    position: Option<Position>,
    traversal: Option<Traversal>,
    outbox: Vec<CharacterEvent>,
}

impl Character {
    pub fn new(
        id: CharacterId,
        name: impl Into<String>,
        team: Team,
        stats: CharacterStats,
        config: &CharacterConfig,
    ) -> Self {
        let mut character = Self {
            id,
            name: name.into(),
            team,
            baseline: stats,
            config: config.clone(),
            current_health: 0,
            max_health: 0,
            current_armor: 0,
            max_armor: 0,
            current_energy: 0.0,
            attacks: AttackTable::from_base(stats.base_attack, config),
            attack_type: config.default_attack_type,
            range_override: None,
            alive: true,
            position: None,
            traversal: None,
            outbox: Vec::new(),
        };
        character.restore_baseline();
        character
    }

    /// Creates a character with stats rolled from the configured ranges.
    pub fn spawn<R: Rng + ?Sized>(
        id: CharacterId,
        name: impl Into<String>,
        team: Team,
        config: &CharacterConfig,
        rng: &mut R,
    ) -> Self {
        let stats = CharacterStats::roll(config, rng);
        Self::new(id, name, team, stats, config)
    }

    fn restore_baseline(&mut self) {
        self.max_health = self.baseline.max_health;
        self.current_health = self.baseline.max_health;
        self.max_armor = self.baseline.armor;
        self.current_armor = self.baseline.armor;
        self.current_energy = 0.0;
        self.attacks = AttackTable::from_base(self.baseline.base_attack, &self.config);
        self.attack_type = self.config.default_attack_type;
        self.range_override = None;
        self.alive = true;
        self.position = None;
        self.traversal = None;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn current_health(&self) -> u32 {
        self.current_health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn current_armor(&self) -> i32 {
        self.current_armor
    }

    pub fn max_armor(&self) -> i32 {
        self.max_armor
    }

    pub fn current_energy(&self) -> f32 {
        self.current_energy
    }

    pub fn max_energy(&self) -> f32 {
        self.config.max_energy
    }

    pub fn attack_type(&self) -> AttackType {
        self.attack_type
    }

    /// Damage of the active attack-type entry.
    pub fn attack_power(&self) -> i32 {
        self.attacks.get(self.attack_type).damage
    }

    pub fn attack_table(&self) -> &AttackTable {
        &self.attacks
    }

    /// Range used for target validation: the temporary override if set,
    /// otherwise the active attack-type entry.
    pub fn attack_range(&self) -> u32 {
        self.range_override
            .unwrap_or_else(|| self.attacks.get(self.attack_type).range)
    }

    pub fn range_override(&self) -> Option<u32> {
        self.range_override
    }

    pub fn super_attack_power(&self) -> i32 {
        self.config.super_attack_power
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Only the grid writes positions, so occupancy and character stay in sync.
    pub(crate) fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }

    pub fn is_moving(&self) -> bool {
        self.traversal.is_some()
    }

    pub fn traversal(&self) -> Option<&Traversal> {
        self.traversal.as_ref()
    }

    /// Takes every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<CharacterEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn emit(&mut self, event: CharacterEvent) {
        trace!(
            target: "tactics_core::character",
            character = %self.id,
            ?event,
            "character event"
        );
        self.outbox.push(event);
    }

    fn emit_health(&mut self) {
        self.emit(CharacterEvent::HealthChanged {
            current: self.current_health,
            max: self.max_health,
        });
    }

    fn emit_armor(&mut self) {
        self.emit(CharacterEvent::ArmorChanged {
            current: self.current_armor,
            max: self.max_armor,
        });
    }

    fn emit_energy(&mut self) {
        self.emit(CharacterEvent::EnergyChanged {
            current: self.current_energy,
            max: self.config.max_energy,
        });
    }

    fn emit_attack(&mut self) {
        self.emit(CharacterEvent::AttackChanged {
            attack_type: self.attack_type,
            power: self.attack_power(),
            range: self.attack_range(),
        });
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Applies armor-mitigated damage and returns the amount removed.
    ///
    /// Returns 0 without touching state when the character is already dead.
    pub fn take_damage(&mut self, raw: i32) -> u32 {
        if !self.alive {
            debug!(
                target: "tactics_core::character",
                character = %self.id,
                "ignoring damage on dead character"
            );
            return 0;
        }

        let amount = mitigate(raw, self.current_armor);
        let before = self.current_health;
        self.current_health = apply_damage(before, amount);
        debug!(
            target: "tactics_core::character",
            character = %self.id,
            raw,
            armor = self.current_armor,
            amount,
            health = self.current_health,
            "damage taken"
        );
        self.emit_health();
        self.emit(CharacterEvent::DamageTaken {
            amount: before - self.current_health,
        });

        if self.current_health == 0 {
            self.die();
        }
        amount
    }

    /// Restores up to `amount` health, capped at max.
    pub fn heal(&mut self, amount: u32) {
        if !self.alive {
            return;
        }
        self.current_health = self.current_health.saturating_add(amount).min(self.max_health);
        self.emit_health();
    }

    /// Heals a percentage of **max** health, rounded to the nearest point.
    pub fn heal_percentage(&mut self, percentage: f32) {
        if percentage <= 0.0 {
            return;
        }
        self.heal(percent_of(self.max_health, percentage).max(0) as u32);
    }

    /// Shifts health by `delta`, clamped to `[0, max]`. Reaching zero kills.
    pub fn modify_health(&mut self, delta: i32) {
        if !self.alive {
            return;
        }
        let next = (self.current_health as i64 + delta as i64).clamp(0, self.max_health as i64);
        self.current_health = next as u32;
        self.emit_health();
        if self.current_health == 0 {
            self.die();
        }
    }

    fn die(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.traversal = None;
        self.range_override = None;
        debug!(
            target: "tactics_core::character",
            character = %self.id,
            name = %self.name,
            "character died"
        );
        self.emit(CharacterEvent::Died);
    }

    // ========================================================================
    // Attacks
    // ========================================================================

    /// Hits `target` with the active attack type.
    ///
    /// No-op (returns `None`) when either side is dead. On a hit the attacker
    /// always gains its per-hit energy, however much armor absorbed.
    pub fn perform_attack(&mut self, target: &mut Character) -> Option<AttackReport> {
        if !self.alive || !target.is_alive() {
            debug!(
                target: "tactics_core::character",
                attacker = %self.id,
                defender = %target.id(),
                "attack skipped: participant not alive"
            );
            return None;
        }

        let damage = target.take_damage(self.attack_power());
        self.modify_energy(self.config.energy_gain_per_hit);

        Some(AttackReport {
            attacker: self.id,
            target: target.id(),
            kind: AttackKind::Weapon(self.attack_type),
            damage,
            target_killed: !target.is_alive(),
        })
    }

    pub fn can_perform_super_attack(&self) -> bool {
        self.alive && self.current_energy >= self.config.max_energy
    }

    /// Spends all energy on a fixed-damage hit that also heals the attacker.
    pub fn perform_super_attack(&mut self, target: &mut Character) -> Option<AttackReport> {
        if !self.can_perform_super_attack() || !target.is_alive() {
            debug!(
                target: "tactics_core::character",
                attacker = %self.id,
                energy = self.current_energy,
                target_alive = target.is_alive(),
                "super attack skipped: preconditions not met"
            );
            return None;
        }

        self.current_energy = 0.0;
        self.emit_energy();

        let damage = target.take_damage(self.config.super_attack_power);
        self.heal(self.config.super_attack_heal);

        Some(AttackReport {
            attacker: self.id,
            target: target.id(),
            kind: AttackKind::Super,
            damage,
            target_killed: !target.is_alive(),
        })
    }

    pub fn set_attack_type(&mut self, attack_type: AttackType) {
        self.attack_type = attack_type;
        self.emit_attack();
    }

    /// Temporarily replaces the attack range used for target validation.
    pub fn set_range_override(&mut self, range: Option<u32>) {
        if self.range_override == range {
            return;
        }
        self.range_override = range;
        self.emit_attack();
    }

    // ========================================================================
    // Modifiers
    // ========================================================================

    /// Adds `delta` to every attack-type entry, not just the active one.
    pub fn modify_attack_power(&mut self, delta: i32) {
        self.attacks.shift_damage(delta);
        self.emit_attack();
    }

    /// Shifts the armor ceiling by `delta`.
    ///
    /// Positive deltas also raise current armor. Negative deltas only lower the
    /// ceiling; current armor drops only if it now exceeds it.
    pub fn modify_armor(&mut self, delta: i32) {
        self.max_armor = (self.max_armor + delta).max(0);
        if delta > 0 {
            self.current_armor += delta;
        }
        self.current_armor = self.current_armor.min(self.max_armor);
        self.emit_armor();
    }

    /// Refills current armor up to the ceiling.
    pub fn restore_armor(&mut self, amount: i32) {
        if !self.alive {
            return;
        }
        self.current_armor = (self.current_armor + amount.max(0)).min(self.max_armor);
        self.emit_armor();
    }

    pub fn modify_energy(&mut self, delta: f32) {
        self.current_energy = (self.current_energy + delta).clamp(0.0, self.config.max_energy);
        self.emit_energy();
    }

    // ========================================================================
    // Movement
    // ========================================================================

    /// Starts a straight-line walk toward `target`.
    ///
    /// Returns `Ok(true)` when a traversal began and `Ok(false)` when the very
    /// first step is blocked. The stored position stays at the origin until
    /// the engine commits the traversal.
    pub fn try_move_to(
        &mut self,
        grid: &Grid,
        target: Position,
        max_distance: u32,
        per_cell: Tick,
    ) -> Result<bool, MoveError> {
        if !self.alive {
            return Err(MoveError::Dead);
        }
        if self.traversal.is_some() {
            return Err(MoveError::AlreadyMoving);
        }
        let from = self.position.ok_or(MoveError::NotPlaced)?;
        if from == target || !from.is_axis_aligned_with(target) {
            return Err(MoveError::NotStraight { from, to: target });
        }
        let distance = from.manhattan_distance(target);
        if distance > max_distance {
            return Err(MoveError::TooFar {
                distance,
                max: max_distance,
            });
        }

        let path = grid.compute_straight_path(from, target, max_distance)?;
        if path.is_empty() {
            debug!(
                target: "tactics_core::character",
                character = %self.id,
                %from,
                %target,
                "move blocked at first step"
            );
            return Ok(false);
        }

        trace!(
            target: "tactics_core::character",
            character = %self.id,
            %from,
            steps = path.len(),
            "traversal started"
        );
        self.traversal = Some(Traversal::new(from, path, per_cell));
        Ok(true)
    }

    /// Advances the in-flight traversal and returns unused ticks.
    pub(crate) fn advance_movement(&mut self, dt: Tick) -> Tick {
        match self.traversal.as_mut() {
            Some(traversal) => traversal.advance(dt),
            None => dt,
        }
    }

    /// Ends a completed traversal, yielding the cell to commit.
    pub(crate) fn finish_movement(&mut self) -> Option<Position> {
        if !self.traversal.as_ref().is_some_and(Traversal::is_complete) {
            return None;
        }
        self.traversal.take().map(|traversal| traversal.destination())
    }

    /// Aborts the traversal, yielding the last fully reached path node.
    pub(crate) fn cancel_movement(&mut self) -> Option<Position> {
        self.traversal
            .take()
            .map(|traversal| traversal.last_completed_node())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Restores post-construction stats, revives, and clears outbox and position.
    pub fn reset_state(&mut self) {
        self.restore_baseline();
        self.outbox.clear();
        debug!(
            target: "tactics_core::character",
            character = %self.id,
            "character reset"
        );
    }
}

/// `round(max * percentage / 100)`.
pub(crate) fn percent_of(max: u32, percentage: f32) -> i32 {
    (max as f32 * percentage / 100.0).round() as i32
}


#[cfg(test)]
mod tests {
    use super::test_support::{character, with_stats};
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn died_count(character: &mut Character) -> usize {
        character
            .drain_events()
            .iter()
            .filter(|event| matches!(event, CharacterEvent::Died))
            .count()
    }

    #[test]
    fn sword_hit_through_armor() {
        let mut attacker = with_stats(1, Team::Player, 100, 30, 0);
        let mut target = with_stats(2, Team::Enemy, 100, 20, 10);
        attacker.set_attack_type(AttackType::Sword);

        let report = attacker.perform_attack(&mut target).unwrap();

        assert_eq!(report.damage, 40);
        assert_eq!(target.current_health(), 60);
        assert_eq!(attacker.current_energy(), 35.0);
    }

    #[test]
    fn fully_absorbed_hit_still_deals_one_and_grants_energy() {
        let mut attacker = with_stats(1, Team::Player, 100, 1, 0);
        let mut target = with_stats(2, Team::Enemy, 100, 20, 15);
        attacker.set_attack_type(AttackType::Bow);

        let report = attacker.perform_attack(&mut target).unwrap();
        assert_eq!(report.damage, 1);
        assert_eq!(attacker.current_energy(), 35.0);
    }

    #[test]
    fn energy_clamps_at_max() {
        let mut attacker = character(1, Team::Player);
        let mut target = with_stats(2, Team::Enemy, 1000, 20, 0);
        for _ in 0..4 {
            attacker.perform_attack(&mut target);
        }
        assert_eq!(attacker.current_energy(), 100.0);
        assert!(attacker.can_perform_super_attack());
    }

    #[test]
    fn super_attack_resets_energy_then_hits_and_heals() {
        let mut attacker = character(1, Team::Player);
        let mut target = with_stats(2, Team::Enemy, 100, 20, 5);
        attacker.modify_energy(100.0);
        attacker.take_damage(10);
        assert_eq!(attacker.current_health(), 90);
        attacker.drain_events();

        let report = attacker.perform_super_attack(&mut target).unwrap();

        assert_eq!(report.kind, AttackKind::Super);
        assert_eq!(report.damage, 35);
        assert_eq!(target.current_health(), 65);
        assert_eq!(attacker.current_energy(), 0.0);
        assert_eq!(attacker.current_health(), 100);
        assert_eq!(
            attacker.drain_events().first(),
            Some(&CharacterEvent::EnergyChanged {
                current: 0.0,
                max: 100.0
            })
        );
    }

    #[test]
    fn super_attack_without_energy_is_a_no_op() {
        let mut attacker = character(1, Team::Player);
        let mut target = character(2, Team::Enemy);
        attacker.modify_energy(99.0);

        assert!(attacker.perform_super_attack(&mut target).is_none());
        assert_eq!(target.current_health(), 100);
        assert_eq!(attacker.current_energy(), 99.0);
    }

    #[test]
    fn death_triggers_once_and_blocks_further_changes() {
        let mut target = with_stats(2, Team::Enemy, 30, 20, 0);
        target.take_damage(50);
        assert!(!target.is_alive());
        assert_eq!(target.current_health(), 0);

        assert_eq!(target.take_damage(50), 0);
        target.heal(20);
        target.modify_health(-5);
        assert_eq!(target.current_health(), 0);
        assert_eq!(died_count(&mut target), 1);
    }

    #[test]
    fn attacking_dead_target_changes_nothing() {
        let mut attacker = character(1, Team::Player);
        let mut target = with_stats(2, Team::Enemy, 1, 20, 0);
        target.take_damage(5);

        assert!(attacker.perform_attack(&mut target).is_none());
        assert_eq!(attacker.current_energy(), 0.0);
    }

    #[test]
    fn heal_percentage_uses_max_health() {
        let mut unit = with_stats(1, Team::Player, 120, 20, 0);
        unit.take_damage(60);
        unit.heal_percentage(15.0);
        assert_eq!(unit.current_health(), 78);
        unit.heal_percentage(100.0);
        assert_eq!(unit.current_health(), 120);
    }

    #[test]
    fn modify_health_can_kill() {
        let mut unit = with_stats(1, Team::Player, 50, 20, 0);
        unit.modify_health(-70);
        assert!(!unit.is_alive());
        assert_eq!(died_count(&mut unit), 1);
    }

    #[test]
    fn attack_power_modifiers_touch_every_entry() {
        let mut unit = character(1, Team::Player);
        unit.modify_attack_power(5);
        unit.modify_attack_power(-2);

        assert_eq!(unit.attack_table().get(AttackType::Sword).damage, 53);
        assert_eq!(unit.attack_table().get(AttackType::Bow).damage, 33);
        assert_eq!(unit.attack_power(), 43);
    }

    #[test]
    fn negative_armor_only_lowers_ceiling() {
        let mut unit = with_stats(1, Team::Player, 100, 20, 10);
        unit.take_damage(0);
        unit.modify_armor(-2);
        assert_eq!(unit.max_armor(), 8);
        assert_eq!(unit.current_armor(), 8);

        unit.modify_armor(5);
        assert_eq!((unit.current_armor(), unit.max_armor()), (13, 13));

        unit.modify_armor(-40);
        assert_eq!((unit.current_armor(), unit.max_armor()), (0, 0));
    }

    #[test]
    fn range_override_wins_over_weapon_range() {
        let mut unit = character(1, Team::Player);
        unit.set_attack_type(AttackType::Sword);
        assert_eq!(unit.attack_range(), 1);
        unit.set_range_override(Some(3));
        assert_eq!(unit.attack_range(), 3);
        unit.set_range_override(None);
        assert_eq!(unit.attack_range(), 1);
    }

    #[test]
    fn move_rejects_too_far_diagonal_and_unplaced() {
        let mut grid = Grid::new(10, 10);
        let mut unit = character(1, Team::Player);

        assert_eq!(
            unit.try_move_to(&grid, Position::new(2, 3), 3, Tick(200)),
            Err(MoveError::NotPlaced)
        );

        grid.place_character(&mut unit, Position::new(2, 2)).unwrap();
        assert_eq!(
            unit.try_move_to(&grid, Position::new(2, 6), 3, Tick(200)),
            Err(MoveError::TooFar {
                distance: 4,
                max: 3
            })
        );
        assert!(matches!(
            unit.try_move_to(&grid, Position::new(3, 3), 3, Tick(200)),
            Err(MoveError::NotStraight { .. })
        ));
        assert!(!unit.is_moving());
        assert_eq!(unit.position(), Some(Position::new(2, 2)));
    }

    #[test]
    fn move_keeps_origin_until_committed() {
        let mut grid = Grid::new(10, 10);
        let mut unit = character(1, Team::Player);
        grid.place_character(&mut unit, Position::new(2, 2)).unwrap();

        assert_eq!(
            unit.try_move_to(&grid, Position::new(2, 5), 3, Tick(200)),
            Ok(true)
        );
        assert_eq!(
            unit.try_move_to(&grid, Position::new(2, 4), 3, Tick(200)),
            Err(MoveError::AlreadyMoving)
        );
        assert_eq!(unit.position(), Some(Position::new(2, 2)));

        assert_eq!(unit.advance_movement(Tick(500)), Tick::ZERO);
        assert_eq!(unit.finish_movement(), None);
        assert_eq!(unit.advance_movement(Tick(150)), Tick(50));
        assert_eq!(unit.finish_movement(), Some(Position::new(2, 5)));
        assert!(!unit.is_moving());
    }

    #[test]
    fn blocked_first_step_does_not_start_moving() {
        let mut grid = Grid::new(10, 10);
        let mut unit = character(1, Team::Player);
        let mut wall = character(2, Team::Enemy);
        grid.place_character(&mut unit, Position::new(2, 2)).unwrap();
        grid.place_character(&mut wall, Position::new(3, 2)).unwrap();

        assert_eq!(
            unit.try_move_to(&grid, Position::new(5, 2), 3, Tick(200)),
            Ok(false)
        );
        assert!(!unit.is_moving());
    }

    #[test]
    fn reset_restores_rolled_stats() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = CharacterConfig::default();
        let mut unit = Character::spawn(CharacterId(4), "Rook", Team::Enemy, &config, &mut rng);
        let max = unit.max_health();
        assert!((100..=125).contains(&max));

        unit.modify_attack_power(7);
        unit.modify_armor(-3);
        unit.modify_energy(50.0);
        unit.take_damage(500);
        unit.reset_state();

        assert!(unit.is_alive());
        assert_eq!(unit.current_health(), max);
        assert_eq!(unit.current_energy(), 0.0);
        assert_eq!(unit.attack_type(), AttackType::Magic);
        assert!(unit.drain_events().is_empty());
    }
}
