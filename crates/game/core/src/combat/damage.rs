//! Armor mitigation shared by every damage source.

/// Damage that gets through armor: `max(1, raw - armor)`.
///
/// A hit always lands for at least one point, even when armor exceeds the raw
/// damage or the raw damage was driven negative by debuffs.
pub fn mitigate(raw: i32, armor: i32) -> u32 {
    raw.saturating_sub(armor).max(1) as u32
}

/// Health left after `damage`, floored at zero.
pub fn apply_damage(current_health: u32, damage: u32) -> u32 {
    current_health.saturating_sub(damage)
}
