//! Immutable puzzle grid and its wire description.

use crate::Position;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// What occupies a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Open floor.
    Empty,
    /// Wall or trap; impassable for both agents.
    Wall,
    /// Starting cell of the player-controlled pursuer.
    Pursuer,
    /// Starting cell of the plan-driven quarry.
    Quarry,
    /// The exit the quarry is trying to reach.
    Exit,
}

impl CellKind {
    /// Single-character wire code.
    pub fn code(self) -> char {
        match self {
            CellKind::Empty => '.',
            CellKind::Wall => 'X',
            CellKind::Pursuer => 'C',
            CellKind::Quarry => 'M',
            CellKind::Exit => 'D',
        }
    }

    /// Decodes a wire code. Older solver maps spell walls `#` and the goal
    /// `G`; both are accepted but never emitted.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '.' => Some(CellKind::Empty),
            'X' | '#' => Some(CellKind::Wall),
            'C' => Some(CellKind::Pursuer),
            'M' => Some(CellKind::Quarry),
            'D' | 'G' => Some(CellKind::Exit),
            _ => None,
        }
    }

    /// True for cells an agent may stand on.
    pub fn is_passable(self) -> bool {
        self != CellKind::Wall
    }
}

impl std::fmt::Display for CellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CellKind::Empty => "empty",
            CellKind::Wall => "wall",
            CellKind::Pursuer => "pursuer",
            CellKind::Quarry => "quarry",
            CellKind::Exit => "exit",
        };
        write!(f, "{}", name)
    }
}

/// Errors raised while building or querying a [`GridModel`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GridError {
    /// Shape or entity cardinality is wrong.
    #[display("Invalid grid: {reason}")]
    InvalidGrid {
        /// What was wrong with the description.
        reason: String,
    },

    /// A lookup fell outside the grid.
    #[display("Position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        /// The offending position.
        position: Position,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// A required entity is not on the grid.
    #[display("No {kind} cell on the grid")]
    MissingEntity {
        /// Which entity was looked up.
        kind: CellKind,
    },
}

impl std::error::Error for GridError {}

impl GridError {
    fn invalid(reason: impl Into<String>) -> Self {
        GridError::InvalidGrid {
            reason: reason.into(),
        }
    }
}

/// The transmitted grid shape: `{width, height, grid}` with one character
/// per cell. This is what the editor emits and what the solver reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDescription {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Rows of cell codes, top row first.
    #[serde(alias = "map")]
    pub grid: Vec<Vec<char>>,
}

/// Snapshot of a puzzle grid.
///
/// Holds exactly one pursuer, exactly one quarry, and at most one exit.
/// There are no mutators; [`GridModel::with_cell`] returns a new, revalidated
/// model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridDescription", into = "GridDescription")]
pub struct GridModel {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
}

impl GridModel {
    /// Builds a model from a wire description, enforcing shape and
    /// cardinality.
    #[instrument(skip(description), fields(width = description.width, height = description.height))]
    pub fn from_description(description: &GridDescription) -> Result<Self, GridError> {
        let GridDescription {
            width,
            height,
            grid,
        } = description;

        if *width == 0 || *height == 0 {
            return Err(GridError::invalid("grid must have at least one row and column"));
        }
        if grid.len() != *height {
            return Err(GridError::invalid(format!(
                "expected {} rows, found {}",
                height,
                grid.len()
            )));
        }

        if let Some((row, line)) = grid.iter().enumerate().find(|(_, line)| line.len() != *width) {
            return Err(GridError::invalid(format!(
                "row {} has {} cells, expected {}",
                row,
                line.len(),
                width
            )));
        }

        // Rows are checked, so this counts cells that actually exist
        let mut cells = Vec::with_capacity(grid.iter().map(Vec::len).sum());
        for (row, line) in grid.iter().enumerate() {
            for (col, code) in line.iter().enumerate() {
                let kind = CellKind::from_code(*code).ok_or_else(|| {
                    GridError::invalid(format!("unknown cell code {:?} at ({}, {})", code, col, row))
                })?;
                cells.push(kind);
            }
        }

        let model = Self {
            width: *width,
            height: *height,
            cells,
        };
        model.check_cardinality()?;
        debug!("Grid validated");
        Ok(model)
    }

    /// Builds a model from text rows such as `"C.M"`. Handy for fixtures.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GridError> {
        let grid: Vec<Vec<char>> = rows.iter().map(|r| r.chars().collect()).collect();
        let width = grid.first().map(Vec::len).unwrap_or(0);
        Self::from_description(&GridDescription {
            width,
            height: grid.len(),
            grid,
        })
    }

    fn check_cardinality(&self) -> Result<(), GridError> {
        let count = |kind: CellKind| self.cells.iter().filter(|c| **c == kind).count();

        let pursuers = count(CellKind::Pursuer);
        let quarries = count(CellKind::Quarry);
        let exits = count(CellKind::Exit);

        if pursuers != 1 {
            warn!(pursuers, "Pursuer cardinality violated");
            return Err(GridError::invalid(format!(
                "expected exactly one pursuer, found {}",
                pursuers
            )));
        }
        if quarries != 1 {
            warn!(quarries, "Quarry cardinality violated");
            return Err(GridError::invalid(format!(
                "expected exactly one quarry, found {}",
                quarries
            )));
        }
        if exits > 1 {
            warn!(exits, "Exit cardinality violated");
            return Err(GridError::invalid(format!(
                "expected at most one exit, found {}",
                exits
            )));
        }
        Ok(())
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// True when `pos` lies inside the grid.
    pub fn contains(&self, pos: Position) -> bool {
        pos.col < self.width && pos.row < self.height
    }

    /// The cell kind at `pos`.
    pub fn cell(&self, pos: Position) -> Result<CellKind, GridError> {
        if !self.contains(pos) {
            return Err(GridError::OutOfBounds {
                position: pos,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.cells[pos.row * self.width + pos.col])
    }

    /// True when `pos` is inside the grid and not a wall.
    pub fn is_open(&self, pos: Position) -> bool {
        self.cell(pos).map(CellKind::is_passable).unwrap_or(false)
    }

    fn locate(&self, kind: CellKind) -> Option<Position> {
        self.cells
            .iter()
            .position(|c| *c == kind)
            .map(|idx| Position::new(idx % self.width, idx / self.width))
    }

    /// Starting cell of the pursuer.
    pub fn pursuer(&self) -> Result<Position, GridError> {
        self.locate(CellKind::Pursuer)
            .ok_or(GridError::MissingEntity {
                kind: CellKind::Pursuer,
            })
    }

    /// Starting cell of the quarry.
    pub fn quarry(&self) -> Result<Position, GridError> {
        self.locate(CellKind::Quarry)
            .ok_or(GridError::MissingEntity {
                kind: CellKind::Quarry,
            })
    }

    /// The exit, if one was placed.
    pub fn exit(&self) -> Option<Position> {
        self.locate(CellKind::Exit)
    }

    /// Number of wall/trap cells.
    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == CellKind::Wall).count()
    }

    /// Returns a new grid with `pos` set to `kind`, revalidated.
    #[instrument(skip(self))]
    pub fn with_cell(&self, pos: Position, kind: CellKind) -> Result<Self, GridError> {
        self.cell(pos)?;
        let mut description = self.to_description();
        description.grid[pos.row][pos.col] = kind.code();
        Self::from_description(&description)
    }

    /// The wire description of this grid.
    pub fn to_description(&self) -> GridDescription {
        let grid = self
            .cells
            .chunks(self.width)
            .map(|row| row.iter().map(|c| c.code()).collect())
            .collect();
        GridDescription {
            width: self.width,
            height: self.height,
            grid,
        }
    }

    /// Renders the grid one row per line, codes separated by spaces.
    pub fn render(&self) -> String {
        self.cells
            .chunks(self.width)
            .map(|row| {
                row.iter()
                    .map(|c| c.code().to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TryFrom<GridDescription> for GridModel {
    type Error = GridError;

    fn try_from(description: GridDescription) -> Result<Self, Self::Error> {
        Self::from_description(&description)
    }
}

impl From<GridModel> for GridDescription {
    fn from(model: GridModel) -> Self {
        model.to_description()
    }
}
