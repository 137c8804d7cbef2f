//! Straight-line movement: validation errors and timed traversals.
//!
//! A [`Traversal`] is the suspension a moving character is in. Its position on
//! the board stays at the origin until the traversal completes; only then does
//! the engine commit the final cell to the grid.

use crate::error::{ErrorSeverity, GameError};
use crate::types::{Position, Tick};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("character is already moving")]
    AlreadyMoving,

    #[error("character is dead")]
    Dead,

    #[error("character is not on the board")]
    NotPlaced,

    #[error("move from {from} to {to} is not a straight line")]
    NotStraight { from: Position, to: Position },

    #[error("move distance {distance} exceeds the limit of {max}")]
    TooFar { distance: u32, max: u32 },

    #[error("path from {from} is blocked")]
    Blocked { from: Position },

    #[error("destination {destination} is not reachable in move mode")]
    Unreachable { destination: Position },
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyMoving | Self::Blocked { .. } => ErrorSeverity::Recoverable,
            Self::Dead | Self::NotPlaced => ErrorSeverity::Recoverable,
            Self::NotStraight { .. } | Self::TooFar { .. } | Self::Unreachable { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyMoving => "MOVE_ALREADY_MOVING",
            Self::Dead => "MOVE_DEAD",
            Self::NotPlaced => "MOVE_NOT_PLACED",
            Self::NotStraight { .. } => "MOVE_NOT_STRAIGHT",
            Self::TooFar { .. } => "MOVE_TOO_FAR",
            Self::Blocked { .. } => "MOVE_BLOCKED",
            Self::Unreachable { .. } => "MOVE_UNREACHABLE",
        }
    }
}

/// An in-flight walk along a precomputed path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Traversal {
    origin: Position,
    path: Vec<Position>,
    per_cell: Tick,
    elapsed: Tick,
}

impl Traversal {
    /// Starts a traversal; `path` excludes the origin and must be non-empty.
    pub fn new(origin: Position, path: Vec<Position>, per_cell: Tick) -> Self {
        Self {
            origin,
            path,
            per_cell,
            elapsed: Tick::ZERO,
        }
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    /// Final cell of the walk.
    pub fn destination(&self) -> Position {
        self.path.last().copied().unwrap_or(self.origin)
    }

    pub fn duration(&self) -> Tick {
        Tick(self.per_cell.0 * self.path.len() as u64)
    }

    pub fn elapsed(&self) -> Tick {
        self.elapsed
    }

    pub fn remaining(&self) -> Tick {
        self.duration().saturating_sub(self.elapsed)
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration()
    }

    /// Advances the walk, returning the ticks left over once it completes.
    pub fn advance(&mut self, dt: Tick) -> Tick {
        let remaining = self.remaining();
        if dt >= remaining {
            self.elapsed = self.duration();
            dt.saturating_sub(remaining)
        } else {
            self.elapsed += dt;
            Tick::ZERO
        }
    }

    /// Last path node fully reached so far; the origin if none.
    pub fn last_completed_node(&self) -> Position {
        if self.per_cell == Tick::ZERO {
            return self.destination();
        }
        let completed = (self.elapsed.0 / self.per_cell.0) as usize;
        match completed.min(self.path.len()) {
            0 => self.origin,
            n => self.path[n - 1],
        }
    }
}
