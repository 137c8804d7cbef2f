//! One complete player decision, expressed as a single value.
//!
//! The engine takes input as a sequence of UI-level calls (select an action,
//! pick a weapon, pick a target). [`PlayerIntent`] bundles such a sequence so
//! providers can answer with one value and the worker can apply it atomically.
use serde::{Deserialize, Serialize};
use tracing::debug;

use tactics_core::{
    ActionError, ActionType, AttackType, BattleEngine, CharacterId, Position,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerIntent {
    Move { to: Position },
    Attack { weapon: AttackType, target: CharacterId },
    SuperAttack { target: CharacterId },
    /// Plays the offered card at `index`. Does not consume an action.
    UseCard { index: usize },
    EndTurn,
}

impl PlayerIntent {
    /// Feeds the intent to the engine.
    ///
    /// A rejection part-way through leaves no targeting behind, so the next
    /// intent starts from a clean state.
    pub(crate) fn apply(self, engine: &mut BattleEngine) -> Result<(), ActionError> {
        let result = match self {
            Self::Move { to } => engine
                .select_action(ActionType::Move)
                .and_then(|()| engine.on_cell_selected(to)),
            Self::Attack { weapon, target } => engine
                .select_action(ActionType::Attack)
                .and_then(|()| engine.select_weapon(weapon))
                .and_then(|()| engine.select_target(target)),
            Self::SuperAttack { target } => engine
                .select_action(ActionType::SuperAttack)
                .and_then(|()| engine.select_target(target)),
            Self::UseCard { index } => engine.use_player_card(index).map(|_| ()),
            Self::EndTurn => engine.end_turn_button_clicked(),
        };
        if result.is_err()
            && engine.pending_action().is_some()
            && let Err(error) = engine.cancel_pending_action()
        {
            debug!(target: "tactics_runtime::worker", intent = %self, %error, "targeting cleanup failed");
        }
        result
    }
}

impl std::fmt::Display for PlayerIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Move { to } => write!(f, "move to {to}"),
            Self::Attack { weapon, target } => write!(f, "{weapon} attack on {target}"),
            Self::SuperAttack { target } => write!(f, "super attack on {target}"),
            Self::UseCard { index } => write!(f, "use card {index}"),
            Self::EndTurn => f.write_str("end turn"),
        }
    }
}
