//! Deterministic rules for a turn-based tactical battle on a square grid.
//!
//! `tactics-core` owns the grid, the characters and their squads, the card
//! system and the [`BattleEngine`] state machine. It performs no I/O: callers
//! feed inputs, advance time with [`BattleEngine::advance`], and drain
//! [`Notification`]s to render the result. Given the same seed and inputs a
//! battle always plays out identically.
pub mod card;
pub mod character;
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod grid;
pub mod movement;
pub mod squad;
pub mod types;

pub use card::{Card, CardEffect, CardError, CardHand, CardPool, draw_cards};
pub use character::{AttackEntry, AttackTable, AttackType, Character, CharacterStats};
pub use combat::{AttackKind, AttackReport};
pub use config::{AttackTypeSpec, BattleConfig, CharacterConfig, StatRange};
pub use engine::{
    ActionError, ActionType, AfterMove, BattleEngine, BattleEngineBuilder, BattleOutcome,
    BattlePhase, BattleStatistics, BattleSummary, EnemyDecision, Resume, SetupError, Suspension,
    decide_enemy_action, determine_battle_result,
};
pub use error::{ErrorSeverity, GameError};
pub use event::{CharacterEvent, Notification};
pub use grid::{Grid, GridError, HighlightMode, Placement};
pub use movement::{MoveError, Traversal};
pub use squad::Squad;
pub use types::{CardinalDirection, CharacterId, Position, Team, Tick};
