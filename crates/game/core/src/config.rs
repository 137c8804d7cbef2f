//! Battle configuration constants and tunable parameters.

use crate::character::AttackType;
use crate::types::Tick;

/// Engine-level tunables: board size, turn budget, ranges and timing.
///
/// All durations are expressed in ticks (1 tick = 1 ms of presentation time).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    pub grid_width: i32,
    pub grid_height: i32,
    /// Edge length of one cell in world units (presentation transform only).
    pub cell_size: f32,

    /// Soft cap enforced by the outer game loop, not by the engine itself.
    pub max_turns: u32,
    pub actions_per_turn: u32,
    /// Distance at which the enemy policy engages instead of moving.
    pub attack_range: u32,
    pub super_attack_range: u32,
    pub max_move_distance: u32,
    pub cards_per_draw: usize,

    pub move_ticks_per_cell: u64,
    pub action_delay_ticks: u64,
    pub turn_handoff_ticks: u64,
    pub message_duration_ticks: u64,

    pub seed: u64,
}

impl BattleConfig {
    pub const DEFAULT_GRID_SIZE: i32 = 10;
    pub const DEFAULT_MAX_TURNS: u32 = 10;
    pub const DEFAULT_ACTIONS_PER_TURN: u32 = 3;
    pub const DEFAULT_ATTACK_RANGE: u32 = 2;
    pub const DEFAULT_SUPER_ATTACK_RANGE: u32 = 3;
    pub const DEFAULT_MAX_MOVE_DISTANCE: u32 = 3;
    pub const DEFAULT_CARDS_PER_DRAW: usize = 2;
    pub const DEFAULT_SEED: u64 = 42;

    pub fn new() -> Self {
        Self {
            grid_width: Self::DEFAULT_GRID_SIZE,
            grid_height: Self::DEFAULT_GRID_SIZE,
            cell_size: 1.0,
            max_turns: Self::DEFAULT_MAX_TURNS,
            actions_per_turn: Self::DEFAULT_ACTIONS_PER_TURN,
            attack_range: Self::DEFAULT_ATTACK_RANGE,
            super_attack_range: Self::DEFAULT_SUPER_ATTACK_RANGE,
            max_move_distance: Self::DEFAULT_MAX_MOVE_DISTANCE,
            cards_per_draw: Self::DEFAULT_CARDS_PER_DRAW,
            move_ticks_per_cell: 200,
            action_delay_ticks: 500,
            turn_handoff_ticks: 2_000,
            message_duration_ticks: 1_500,
            seed: Self::DEFAULT_SEED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn move_ticks_per_cell(&self) -> Tick {
        Tick(self.move_ticks_per_cell)
    }

    pub fn action_delay(&self) -> Tick {
        Tick(self.action_delay_ticks)
    }

    pub fn turn_handoff_delay(&self) -> Tick {
        Tick(self.turn_handoff_ticks)
    }

    pub fn message_duration(&self) -> Tick {
        Tick(self.message_duration_ticks)
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Inclusive integer range a stat is rolled from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatRange {
    pub min: i32,
    pub max: i32,
}

impl StatRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn roll<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

/// Range and damage bonus of one attack type, relative to the base attack roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackTypeSpec {
    pub range: u32,
    pub bonus: i32,
}

/// Character stat rolls and fixed combat numbers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CharacterConfig {
    pub health: StatRange,
    pub base_attack: StatRange,
    pub armor: StatRange,

    pub max_energy: f32,
    pub energy_gain_per_hit: f32,
    pub super_attack_power: i32,
    pub super_attack_heal: u32,

    pub sword: AttackTypeSpec,
    pub bow: AttackTypeSpec,
    pub magic: AttackTypeSpec,
    pub default_attack_type: AttackType,
}

impl CharacterConfig {
    pub fn new() -> Self {
        Self {
            health: StatRange::new(100, 125),
            base_attack: StatRange::new(20, 30),
            armor: StatRange::new(5, 15),
            max_energy: 100.0,
            energy_gain_per_hit: 35.0,
            super_attack_power: 40,
            super_attack_heal: 20,
            sword: AttackTypeSpec { range: 1, bonus: 20 },
            bow: AttackTypeSpec { range: 3, bonus: 0 },
            magic: AttackTypeSpec { range: 2, bonus: 10 },
            default_attack_type: AttackType::Magic,
        }
    }

    pub fn attack_spec(&self, attack_type: AttackType) -> AttackTypeSpec {
        match attack_type {
            AttackType::Sword => self.sword,
            AttackType::Bow => self.bow,
            AttackType::Magic => self.magic,
        }
    }
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn stat_range_rolls_stay_inclusive() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = StatRange::new(100, 125);
        for _ in 0..200 {
            let value = range.roll(&mut rng);
            assert!((100..=125).contains(&value));
        }
    }

    #[test]
    fn degenerate_range_returns_min() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(StatRange::new(5, 5).roll(&mut rng), 5);
        assert_eq!(StatRange::new(9, 3).roll(&mut rng), 9);
    }

    #[test]
    fn defaults_match_documented_tuning() {
        let config = BattleConfig::default();
        assert_eq!(config.actions_per_turn, 3);
        assert_eq!(config.max_move_distance, 3);
        assert_eq!(config.super_attack_range, 3);
        assert_eq!(config.turn_handoff_delay(), Tick(2_000));

        let character = CharacterConfig::default();
        assert_eq!(character.attack_spec(AttackType::Sword).bonus, 20);
        assert_eq!(character.attack_spec(AttackType::Bow).range, 3);
        assert_eq!(character.default_attack_type, AttackType::Magic);
    }
}
