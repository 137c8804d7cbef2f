//! Attack types and the per-character attack table.

use crate::config::CharacterConfig;

/// Weapon family a character can attack with.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttackType {
    Sword,
    Bow,
    Magic,
}

impl AttackType {
    /// Weapon the enemy policy reaches for at a given distance.
    pub fn for_distance(distance: u32) -> Self {
        match distance {
            0 | 1 => AttackType::Sword,
            2 => AttackType::Magic,
            _ => AttackType::Bow,
        }
    }
}

/// Range and damage of one attack type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackEntry {
    pub range: u32,
    pub damage: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackTable {
    sword: AttackEntry,
    bow: AttackEntry,
    magic: AttackEntry,
}

impl AttackTable {
    /// Builds the table from a rolled base attack and the configured offsets.
    pub fn from_base(base_attack: i32, config: &CharacterConfig) -> Self {
        let entry = |kind: AttackType| {
            let spec = config.attack_spec(kind);
            AttackEntry {
                range: spec.range,
                damage: base_attack + spec.bonus,
            }
        };
        Self {
            sword: entry(AttackType::Sword),
            bow: entry(AttackType::Bow),
            magic: entry(AttackType::Magic),
        }
    }

    pub fn get(&self, kind: AttackType) -> AttackEntry {
        match kind {
            AttackType::Sword => self.sword,
            AttackType::Bow => self.bow,
            AttackType::Magic => self.magic,
        }
    }

    /// Adds `delta` to every entry's damage.
    pub fn shift_damage(&mut self, delta: i32) {
        for entry in [&mut self.sword, &mut self.bow, &mut self.magic] {
            entry.damage += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn table_offsets_follow_config() {
        let table = AttackTable::from_base(30, &CharacterConfig::default());
        assert_eq!(table.get(AttackType::Sword), AttackEntry { range: 1, damage: 50 });
        assert_eq!(table.get(AttackType::Bow), AttackEntry { range: 3, damage: 30 });
        assert_eq!(table.get(AttackType::Magic), AttackEntry { range: 2, damage: 40 });
    }

    #[test]
    fn damage_shifts_are_additive() {
        let config = CharacterConfig::default();
        let mut stepwise = AttackTable::from_base(25, &config);
        stepwise.shift_damage(5);
        stepwise.shift_damage(-2);

        let mut once = AttackTable::from_base(25, &config);
        once.shift_damage(3);

        for kind in AttackType::iter() {
            assert_eq!(stepwise.get(kind), once.get(kind));
        }
    }

    #[test]
    fn distance_bands() {
        assert_eq!(AttackType::for_distance(1), AttackType::Sword);
        assert_eq!(AttackType::for_distance(2), AttackType::Magic);
        assert_eq!(AttackType::for_distance(3), AttackType::Bow);
        assert_eq!("BOW".parse::<AttackType>().unwrap(), AttackType::Bow);
    }
}
