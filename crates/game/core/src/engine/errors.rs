//! Error types for battle setup and player input.

use crate::card::CardError;
use crate::error::{ErrorSeverity, GameError};
use crate::grid::GridError;
use crate::movement::MoveError;
use crate::types::{CharacterId, Team};

use super::ActionType;

/// Configuration problems that prevent a battle from being constructed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("battle has no grid")]
    MissingGrid,

    #[error("invalid grid size {width}x{height}")]
    InvalidGrid { width: i32, height: i32 },

    #[error("missing {team} squad")]
    MissingSquad { team: Team },

    #[error("{team} squad has no members")]
    EmptySquad { team: Team },

    #[error("squad tagged {found} was supplied as the {expected} squad")]
    TeamMismatch { expected: Team, found: Team },

    #[error("character {id} appears more than once")]
    DuplicateCharacter { id: CharacterId },

    #[error("card pool is empty")]
    EmptyCardPool,

    #[error("actions per turn must be at least 1")]
    NoActionsPerTurn,

    #[error("grid too small to place both squads")]
    GridTooSmall,
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingGrid => "SETUP_MISSING_GRID",
            Self::InvalidGrid { .. } => "SETUP_INVALID_GRID",
            Self::MissingSquad { .. } => "SETUP_MISSING_SQUAD",
            Self::EmptySquad { .. } => "SETUP_EMPTY_SQUAD",
            Self::TeamMismatch { .. } => "SETUP_TEAM_MISMATCH",
            Self::DuplicateCharacter { .. } => "SETUP_DUPLICATE_CHARACTER",
            Self::EmptyCardPool => "SETUP_EMPTY_CARD_POOL",
            Self::NoActionsPerTurn => "SETUP_NO_ACTIONS",
            Self::GridTooSmall => "SETUP_GRID_TOO_SMALL",
        }
    }
}

/// Rejected engine input. State is unchanged and no action is consumed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("battle has not started")]
    NotStarted,

    #[error("battle is over")]
    BattleOver,

    #[error("battle already started")]
    AlreadyStarted,

    #[error("not the player's turn")]
    NotPlayerTurn,

    #[error("engine is busy resolving a previous action")]
    Busy,

    #[error("no actions remaining this turn")]
    NoActionsRemaining,

    #[error("{team} squad has no active character")]
    NoActiveCharacter { team: Team },

    #[error("no action is pending")]
    NoPendingAction,

    #[error("expected pending {expected}, found {found:?}")]
    UnexpectedPendingAction {
        expected: ActionType,
        found: Option<ActionType>,
    },

    #[error("choose a weapon before picking a target")]
    WeaponNotSelected,

    #[error("super attack is not ready")]
    SuperAttackUnavailable,

    #[error("target {target} is not a valid enemy")]
    InvalidTarget { target: CharacterId },

    #[error("target is {distance} cells away, range is {range}")]
    OutOfRange { distance: u32, range: u32 },

    #[error("no movement in progress")]
    NotMoving,

    #[error("no delay is pending")]
    NotWaiting,

    #[error("no free cell to place a character")]
    NoFreeCell,

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Card(#[from] CardError),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Move(error) => error.severity(),
            Self::Grid(error) => error.severity(),
            Self::Card(error) => error.severity(),
            Self::OutOfRange { .. }
            | Self::InvalidTarget { .. }
            | Self::UnexpectedPendingAction { .. }
            | Self::WeaponNotSelected => ErrorSeverity::Validation,
            Self::NoFreeCell => ErrorSeverity::Internal,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotStarted => "ACTION_NOT_STARTED",
            Self::BattleOver => "ACTION_BATTLE_OVER",
            Self::AlreadyStarted => "ACTION_ALREADY_STARTED",
            Self::NotPlayerTurn => "ACTION_NOT_PLAYER_TURN",
            Self::Busy => "ACTION_BUSY",
            Self::NoActionsRemaining => "ACTION_NO_ACTIONS",
            Self::NoActiveCharacter { .. } => "ACTION_NO_ACTIVE_CHARACTER",
            Self::NoPendingAction => "ACTION_NO_PENDING",
            Self::UnexpectedPendingAction { .. } => "ACTION_UNEXPECTED_PENDING",
            Self::WeaponNotSelected => "ACTION_WEAPON_NOT_SELECTED",
            Self::SuperAttackUnavailable => "ACTION_SUPER_UNAVAILABLE",
            Self::InvalidTarget { .. } => "ACTION_INVALID_TARGET",
            Self::OutOfRange { .. } => "ACTION_OUT_OF_RANGE",
            Self::NotMoving => "ACTION_NOT_MOVING",
            Self::NotWaiting => "ACTION_NOT_WAITING",
            Self::NoFreeCell => "ACTION_NO_FREE_CELL",
            Self::Move(error) => error.error_code(),
            Self::Grid(error) => error.error_code(),
            Self::Card(error) => error.error_code(),
        }
    }
}
