//! Grid positions and cardinal directions.
//!
//! A [`Position`] is an integer 2D vector with the origin at the bottom-left
//! of the board. Restricted to one of the four canonical unit vectors it also
//! serves as a facing direction, and relative geometry is rotated into
//! board-absolute offsets with [`Position::rotate`].

use std::fmt;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a facing vector is not one of the four canonical
/// directions. This is a contract violation, not a recoverable condition.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DirectionError {
    #[error("facing {0} is not one of the four canonical directions")]
    InvalidDirection(Position),
}

/// An integer cell coordinate, also used as a direction vector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Facing toward increasing `y` (the relative-geometry identity).
pub const FORWARD: Position = Position::new(0, 1);
/// Facing toward increasing `x`.
pub const RIGHT: Position = Position::new(1, 0);
/// Facing toward decreasing `y`.
pub const BACKWARD: Position = Position::new(0, -1);
/// Facing toward decreasing `x`.
pub const LEFT: Position = Position::new(-1, 0);

/// The four legal facing vectors.
pub const CANONICAL_DIRECTIONS: [Position; 4] = [FORWARD, RIGHT, BACKWARD, LEFT];

impl Position {
    /// Creates a position from its coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Returns true iff the position lies on a `rows` x `cols` board,
    /// i.e. `0 <= x < cols` and `0 <= y < rows`.
    pub fn in_bounds(self, rows: i32, cols: i32) -> bool {
        0 <= self.x && self.x < cols && 0 <= self.y && self.y < rows
    }

    /// Returns true iff this vector is one of the four canonical directions.
    pub fn is_canonical_direction(self) -> bool {
        CANONICAL_DIRECTIONS.contains(&self)
    }

    /// Rotates a forward-relative offset into a board-absolute-relative
    /// offset for a unit with the given facing.
    ///
    /// Facing forward leaves the offset unchanged; the other three canonical
    /// facings apply the matching multiple of a 90-degree rotation. Any other
    /// facing is rejected with [`DirectionError::InvalidDirection`].
    pub fn rotate(self, facing: Position) -> Result<Position, DirectionError> {
        if facing == FORWARD {
            Ok(self)
        } else if facing == RIGHT {
            Ok(Position::new(self.y, -self.x))
        } else if facing == BACKWARD {
            Ok(Position::new(-self.x, -self.y))
        } else if facing == LEFT {
            Ok(Position::new(-self.y, self.x))
        } else {
            Err(DirectionError::InvalidDirection(facing))
        }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Position {
    type Output = Position;

    fn neg(self) -> Position {
        Position::new(-self.x, -self.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
