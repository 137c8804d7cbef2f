//! Combat resolution.
//!
//! Pure damage math lives in [`damage`]; the stat mutation itself happens on
//! [`crate::Character`], which reports what it did through [`AttackReport`].

pub mod damage;

pub use damage::{apply_damage, mitigate};

use crate::character::AttackType;
use crate::types::CharacterId;

/// Which attack path produced a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackKind {
    Weapon(AttackType),
    Super,
}

/// Result of a resolved attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackReport {
    pub attacker: CharacterId,
    pub target: CharacterId,
    pub kind: AttackKind,
    /// Damage after armor.
    pub damage: u32,
    pub target_killed: bool,
}
