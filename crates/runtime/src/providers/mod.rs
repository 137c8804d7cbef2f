//! Stock player policies.

mod auto;

pub use auto::AutoPlayer;

use async_trait::async_trait;
use tactics_core::BattleEngine;

use crate::api::{ActionProvider, PlayerIntent, Result};

/// Ends every player turn immediately.
///
/// Useful as a fallback and in tests that only exercise the enemy side.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassTurnProvider;

#[async_trait]
impl ActionProvider for PassTurnProvider {
    async fn provide_intent(&self, _battle: &BattleEngine) -> Result<PlayerIntent> {
        Ok(PlayerIntent::EndTurn)
    }
}
