//! Event types for the runtime-owned topics.

use serde::{Deserialize, Serialize};

use tactics_core::{BattleSummary, Team, Tick};

use crate::api::PlayerIntent;

/// Published whenever a side takes over the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEvent {
    pub turn: u32,
    pub team: Team,
    /// Engine clock at the moment the turn opened
    pub clock: Tick,
}

/// Lifecycle of the session itself rather than of the battle rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuntimeEvent {
    /// The engine refused a player intent; the battle state is unchanged.
    IntentRejected { intent: PlayerIntent, error: String },

    /// The turn counter passed the configured cap and the battle was closed.
    TurnLimitReached { max_turns: u32 },

    /// The battle was reset and bootstrapped again.
    Restarted { seed: u64 },

    Finished(BattleSummary),
}
