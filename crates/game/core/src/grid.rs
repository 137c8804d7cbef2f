//! Fixed-size battle board: bounds, occupancy, ranges and straight paths.
//!
//! The grid only tracks *which* character stands on a cell. Characters keep
//! their own copy of their position; [`Grid::place_character`] keeps the two
//! in sync and is the only way a character changes cells.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::character::Character;
use crate::error::{ErrorSeverity, GameError};
use crate::movement::MoveError;
use crate::types::{CardinalDirection, CharacterId, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridError {
    #[error("position {position} is outside the board")]
    InvalidPosition { position: Position },

    #[error("position {position} is occupied by {occupant}")]
    Occupied {
        position: Position,
        occupant: CharacterId,
    },
}

impl GameError for GridError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPosition { .. } => "GRID_INVALID_POSITION",
            Self::Occupied { .. } => "GRID_OCCUPIED",
        }
    }
}

/// Which kind of range a highlight request describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HighlightMode {
    /// Straight rays up to the first obstruction.
    Move,
    /// Full Manhattan diamond, obstruction ignored.
    Attack,
}

/// Result of a successful placement, handed to the engine's movement hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub character: CharacterId,
    pub from: Option<Position>,
    pub to: Position,
}

#[derive(Clone, Debug)]
pub struct Grid {
    width: i32,
    height: i32,
    cell_size: f32,
    occupants: HashMap<Position, CharacterId>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_cell_size(width, height, 1.0)
    }

    pub fn with_cell_size(width: i32, height: i32, cell_size: f32) -> Self {
        Self {
            width,
            height,
            cell_size,
            occupants: HashMap::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Bounds check only.
    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.occupants.contains_key(&pos)
    }

    pub fn character_at(&self, pos: Position) -> Option<CharacterId> {
        self.occupants.get(&pos).copied()
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.occupants.len()
    }

    /// Centre of a cell in world space; the board is centred on the origin.
    pub fn world_position(&self, pos: Position) -> (f32, f32) {
        let (offset_x, offset_y) = self.world_offset();
        (
            pos.x as f32 * self.cell_size + offset_x + self.cell_size / 2.0,
            pos.y as f32 * self.cell_size + offset_y + self.cell_size / 2.0,
        )
    }

    /// Inverse of [`Grid::world_position`]; `None` when the point is off the board.
    pub fn grid_position(&self, world: (f32, f32)) -> Option<Position> {
        let (offset_x, offset_y) = self.world_offset();
        let pos = Position::new(
            ((world.0 - offset_x) / self.cell_size).floor() as i32,
            ((world.1 - offset_y) / self.cell_size).floor() as i32,
        );
        self.is_valid_position(pos).then_some(pos)
    }

    fn world_offset(&self) -> (f32, f32) {
        (
            -(self.width as f32 * self.cell_size) / 2.0,
            -(self.height as f32 * self.cell_size) / 2.0,
        )
    }

    /// Moves `character` onto `pos`, vacating its previous cell.
    pub fn place_character(
        &mut self,
        character: &mut Character,
        pos: Position,
    ) -> Result<Placement, GridError> {
        if !self.is_valid_position(pos) {
            return Err(GridError::InvalidPosition { position: pos });
        }
        if let Some(occupant) = self.character_at(pos)
            && occupant != character.id()
        {
            return Err(GridError::Occupied {
                position: pos,
                occupant,
            });
        }

        let from = character.position();
        if let Some(old) = from
            && self.character_at(old) == Some(character.id())
        {
            self.occupants.remove(&old);
        }
        self.occupants.insert(pos, character.id());
        character.set_position(Some(pos));

        Ok(Placement {
            character: character.id(),
            from,
            to: pos,
        })
    }

    /// Clears the character's cell, if it holds one.
    pub fn remove_character(&mut self, character: &mut Character) -> Option<Position> {
        let pos = character.position()?;
        if self.character_at(pos) == Some(character.id()) {
            self.occupants.remove(&pos);
        }
        character.set_position(None);
        Some(pos)
    }

    pub fn clear(&mut self) {
        self.occupants.clear();
    }

    /// Cells walked from `from` toward `to`, stopping before the first blocked cell.
    ///
    /// The walk length is the Manhattan distance capped at `max_distance`. An
    /// empty path means the very first step is blocked.
    pub fn compute_straight_path(
        &self,
        from: Position,
        to: Position,
        max_distance: u32,
    ) -> Result<Vec<Position>, MoveError> {
        let direction =
            CardinalDirection::between(from, to).ok_or(MoveError::NotStraight { from, to })?;
        let steps = from.manhattan_distance(to).min(max_distance);
        Ok(self.walk(from, direction, steps))
    }

    fn walk(&self, from: Position, direction: CardinalDirection, steps: u32) -> Vec<Position> {
        let (dx, dy) = direction.delta();
        let mut path = Vec::with_capacity(steps as usize);
        let mut cursor = from;
        for _ in 0..steps {
            let next = cursor.offset(dx, dy);
            if !self.is_valid_position(next) || self.is_occupied(next) {
                break;
            }
            path.push(next);
            cursor = next;
        }
        path
    }

    /// Cells a presentation layer should highlight around `origin`.
    pub fn highlightable_range(
        &self,
        origin: Position,
        range: u32,
        mode: HighlightMode,
    ) -> Vec<Position> {
        match mode {
            HighlightMode::Move => CardinalDirection::ALL
                .into_iter()
                .flat_map(|direction| self.walk(origin, direction, range))
                .collect(),
            HighlightMode::Attack => {
                let r = range as i32;
                let mut cells = Vec::new();
                for dx in -r..=r {
                    for dy in -r..=r {
                        let distance = dx.unsigned_abs() + dy.unsigned_abs();
                        if distance == 0 || distance > range {
                            continue;
                        }
                        let pos = origin.offset(dx, dy);
                        if self.is_valid_position(pos) {
                            cells.push(pos);
                        }
                    }
                }
                cells
            }
        }
    }

    /// Uniformly random empty cell, `None` on a full board.
    pub fn random_empty_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        let empty: Vec<Position> = (0..self.width)
            .flat_map(|x| (0..self.height).map(move |y| Position::new(x, y)))
            .filter(|pos| !self.is_occupied(*pos))
            .collect();
        empty.choose(rng).copied()
    }
}
