//! Grid coordinates and cardinal directions.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A cell on the grid, addressed as (column, row), both 0-indexed.
///
/// Solver output speaks (row, column); convert with [`Position::from_row_col`]
/// at the boundary and keep (column, row) everywhere else.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_new::new,
)]
pub struct Position {
    /// Column (x).
    pub col: usize,
    /// Row (y).
    pub row: usize,
}

impl Position {
    /// Builds a position from a solver-style (row, column) pair.
    pub fn from_row_col(row: usize, col: usize) -> Self {
        Self { col, row }
    }

    /// Manhattan distance between two cells, saturating at `usize::MAX`.
    pub fn manhattan(self, other: Position) -> usize {
        self.col
            .abs_diff(other.col)
            .saturating_add(self.row.abs_diff(other.row))
    }

    /// True when `other` is exactly one orthogonal step away.
    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan(other) == 1
    }

    /// The neighbouring cell in `direction`, or `None` when it would leave
    /// the non-negative quadrant. Upper bounds are the grid's business.
    #[instrument(level = "trace")]
    pub fn step(self, direction: Direction) -> Option<Position> {
        let (dc, dr) = direction.delta();
        let col = self.col.checked_add_signed(dc)?;
        let row = self.row.checked_add_signed(dr)?;
        Some(Position { col, row })
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// One of the four orthogonal moves. Diagonals are not part of the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// Column and row offsets for this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Parses keyboard-style input: `w/a/s/d` or the direction name.
    pub fn from_key(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "w" | "up" => Some(Direction::Up),
            "s" | "down" => Some(Direction::Down),
            "a" | "left" => Some(Direction::Left),
            "d" | "right" => Some(Direction::Right),
            _ => None,
        }
    }
}
