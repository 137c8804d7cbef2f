//! Asynchronous abstraction for sourcing player intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so a battle can
//! run with human input, scripted fixtures, or automated policies. The enemy
//! side is always played by the engine itself.
use async_trait::async_trait;
use tactics_core::BattleEngine;

use super::errors::Result;
use super::intent::PlayerIntent;

/// Trait for choosing the player's next move from a battle snapshot.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - Scripted/replayed intents
/// - Automated play
/// - Testing fixtures
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Provide the next intent while it is the player's turn.
    ///
    /// # Arguments
    /// * `battle` - Read-only snapshot taken when the engine became idle
    async fn provide_intent(&self, battle: &BattleEngine) -> Result<PlayerIntent>;
}
