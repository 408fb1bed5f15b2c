//! Strictly Pursuit - a tile-grid chase with a solver-planned quarry
//!
//! The player builds a grid holding one pursuer, one quarry, an optional
//! exit, and any number of walls. An external solver plans the quarry's
//! escape; this crate turns its output into a [`PlanResult`] and plays the
//! game out turn by turn.
//!
//! # Architecture
//!
//! - **Grid**: immutable [`GridModel`] and its wire [`GridDescription`]
//! - **Plan**: the [`PlanRequest`]/[`PlanResult`] contract with the solver
//! - **Parser**: [`ResultParser`] reading either solver dialect
//! - **Pursuit**: the [`PursuitSession`] turn machine and its contracts
//! - **Slot**: [`SessionSlot`], which discards plans for abandoned attempts
//!
//! Nothing here does I/O; transports live in `strictly_planner`.
//!
//! # Example
//!
//! ```
//! use strictly_pursuit::{GridModel, Outcome, Position, ResultParser};
//! use strictly_pursuit::{PursuitSession, TurnState};
//!
//! let grid = GridModel::from_rows(&["M.D", "...", "..C"])?;
//! let output = r#"{"success": true, "path": [[0, 0], [0, 1], [0, 2]]}"#;
//! let plan = ResultParser::new().parse(output, &grid);
//! assert!(plan.is_safe());
//!
//! let mut session = PursuitSession::new(grid, plan)?;
//! session.play_turn(Position::new(2, 1));
//! let report = session.play_turn(Position::new(2, 0));
//! assert_eq!(report.state(), TurnState::GameOver(Outcome::Captured));
//! # Ok::<(), strictly_pursuit::GridError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod grid;
mod parser;
mod plan;
mod position;
mod pursuit;
mod slot;

// Crate-level exports - Geometry
pub use position::{Direction, Position};

// Crate-level exports - Grid
pub use grid::{CellKind, GridDescription, GridError, GridModel};

// Crate-level exports - Solver contract
pub use plan::{PlanRequest, PlanResult};

// Crate-level exports - Output parsing
pub use parser::{
    Dialect, GoalKind, JsonRecordDialect, LabeledTextDialect, ParseStrategy, RawPlan,
    ResultParser, classify,
};

// Crate-level exports - Turn machine
pub use pursuit::{
    AdjacentStep, Applied, Contract, InvariantSet, InvariantViolation, LegalPursuerMove, OpenCell,
    Outcome, PlanIndexInBounds, PursuerMoveContract, PursuerOnOpenCell, PursuersTurn,
    PursuitEvent, PursuitInvariants, PursuitSession, QuarryOnPlan, QuarryStepContract, Rejection,
    SessionInvariant, TurnReport, Transition, TurnState, WithinGrid,
};

// Crate-level exports - Session ownership
pub use slot::{Completion, PlanTicket, SessionSlot, SlotError};
