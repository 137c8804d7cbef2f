use tracing::trace;

use crate::character::{Character, percent_of};

/// Four optional modifiers; zero means "not present".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CardEffect {
    /// Percent of max health.
    pub health_percentage: f32,
    pub attack: i32,
    pub armor: i32,
    pub energy: f32,
}

impl CardEffect {
    pub fn is_empty(&self) -> bool {
        self.health_percentage == 0.0 && self.attack == 0 && self.armor == 0 && self.energy == 0.0
    }

    /// Signed modifier lines, e.g. `+5 attack` / `-2 armor`, newline separated.
    pub fn describe(&self) -> String {
        let mut lines = Vec::new();
        if self.health_percentage != 0.0 {
            lines.push(format!("{}% health", signed(self.health_percentage)));
        }
        if self.attack != 0 {
            lines.push(format!("{} attack", signed(self.attack)));
        }
        if self.armor != 0 {
            lines.push(format!("{} armor", signed(self.armor)));
        }
        if self.energy != 0.0 {
            lines.push(format!("{} energy", signed(self.energy)));
        }
        lines.join("\n")
    }

    /// Single-target application used when a side plays a card.
    ///
    /// The health modifier is `round(max * pct / 100)` through
    /// [`Character::modify_health`], so negative percentages can kill.
    pub fn apply_to(&self, character: &mut Character) {
        trace!(
            target: "tactics_core::card",
            character = %character.id(),
            effect = ?self,
            "applying card effect"
        );
        if self.health_percentage != 0.0 {
            character.modify_health(percent_of(character.max_health(), self.health_percentage));
        }
        if self.attack != 0 {
            character.modify_attack_power(self.attack);
        }
        if self.armor != 0 {
            character.modify_armor(self.armor);
        }
        if self.energy != 0.0 {
            character.modify_energy(self.energy);
        }
    }

    /// Squad-wide application: health only ever heals here.
    pub(crate) fn apply_to_member(&self, character: &mut Character) {
        character.heal_percentage(self.health_percentage);
        if self.attack != 0 {
            character.modify_attack_power(self.attack);
        }
        if self.armor != 0 {
            character.modify_armor(self.armor);
        }
        if self.energy > 0.0 {
            character.modify_energy(self.energy);
        }
    }
}

fn signed<T: PartialOrd + Default + std::fmt::Display>(value: T) -> String {
    if value > T::default() {
        format!("+{value}")
    } else {
        value.to_string()
    }
}
