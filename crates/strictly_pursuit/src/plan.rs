//! The data contract exchanged with the external solver.

use crate::slot::PlanTicket;
use crate::{GridDescription, GridModel, Position};
use serde::{Deserialize, Serialize};

/// A request to plan the quarry's route for one grid.
///
/// Carries the ticket the owning [`SessionSlot`](crate::SessionSlot) issued,
/// so the answer can be matched back to the attempt that asked for it.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct PlanRequest {
    /// Token identifying this request within its slot.
    ticket: PlanTicket,
    /// The grid being solved.
    grid: GridModel,
}

impl PlanRequest {
    pub(crate) fn new(ticket: PlanTicket, grid: GridModel) -> Self {
        Self { ticket, grid }
    }

    /// The payload persisted for the solver.
    pub fn description(&self) -> GridDescription {
        self.grid.to_description()
    }
}

/// The quarry's resolved route, in one of three tiers.
///
/// Every non-empty path starts on the quarry's cell, moves one orthogonal
/// step at a time, and never enters a wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanResult {
    /// The quarry can reach the exit unharmed.
    SafePath {
        /// Cells from the quarry's start to the exit.
        path: Vec<Position>,
        /// Traps the route steers around.
        traps_avoided: usize,
    },
    /// No safe route exists, but the quarry still has somewhere to run.
    /// May end short of the exit.
    BestEffortPath {
        /// Cells from the quarry's start.
        path: Vec<Position>,
    },
    /// The quarry is trapped where it stands.
    NoPath {
        /// Why no route was produced.
        reason: String,
    },
}

impl PlanResult {
    /// Creates a no-path result.
    pub fn no_path(reason: impl Into<String>) -> Self {
        PlanResult::NoPath {
            reason: reason.into(),
        }
    }

    /// The planned cells; empty for [`PlanResult::NoPath`].
    pub fn path(&self) -> &[Position] {
        match self {
            PlanResult::SafePath { path, .. } | PlanResult::BestEffortPath { path } => path,
            PlanResult::NoPath { .. } => &[],
        }
    }

    /// Number of quarry moves in the plan.
    pub fn moves(&self) -> usize {
        self.path().len().saturating_sub(1)
    }

    /// Last planned cell, if any.
    pub fn final_cell(&self) -> Option<Position> {
        self.path().last().copied()
    }

    /// True for [`PlanResult::SafePath`].
    pub fn is_safe(&self) -> bool {
        matches!(self, PlanResult::SafePath { .. })
    }

    /// True when the quarry can never leave its starting cell: no plan at
    /// all, or a best-effort plan with no move in it.
    pub fn is_trapped(&self) -> bool {
        match self {
            PlanResult::NoPath { .. } => true,
            PlanResult::BestEffortPath { path } => path.len() < 2,
            PlanResult::SafePath { .. } => false,
        }
    }
}

impl std::fmt::Display for PlanResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanResult::SafePath {
                path,
                traps_avoided,
            } => write!(
                f,
                "Safe path: {} moves, {} traps avoided",
                path.len().saturating_sub(1),
                traps_avoided
            ),
            PlanResult::BestEffortPath { path } => {
                write!(f, "Best-effort path: {} moves", path.len().saturating_sub(1))
            }
            PlanResult::NoPath { reason } => write!(f, "No path: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(cells: &[(usize, usize)]) -> Vec<Position> {
        cells.iter().map(|&(c, r)| Position::new(c, r)).collect()
    }

    #[test]
    fn test_path_accessors() {
        let plan = PlanResult::SafePath {
            path: walk(&[(0, 0), (1, 0), (2, 0)]),
            traps_avoided: 4,
        };
        assert_eq!(plan.moves(), 2);
        assert_eq!(plan.final_cell(), Some(Position::new(2, 0)));
        assert!(plan.is_safe());
        assert!(!plan.is_trapped());
    }

    #[test]
    fn test_no_path_is_empty_and_trapped() {
        let plan = PlanResult::no_path("cornered");
        assert!(plan.path().is_empty());
        assert_eq!(plan.moves(), 0);
        assert_eq!(plan.final_cell(), None);
        assert!(plan.is_trapped());
        assert_eq!(plan.to_string(), "No path: cornered");
    }

    #[test]
    fn test_single_cell_best_effort_counts_as_trapped() {
        let stuck = PlanResult::BestEffortPath {
            path: walk(&[(3, 3)]),
        };
        assert!(stuck.is_trapped());

        let running = PlanResult::BestEffortPath {
            path: walk(&[(3, 3), (3, 4)]),
        };
        assert!(!running.is_trapped());
    }

    #[test]
    fn test_serde_tagging() {
        let plan = PlanResult::BestEffortPath {
            path: walk(&[(1, 2)]),
        };
        let json = serde_json::to_value(&plan).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"kind": "best_effort_path", "path": [{"col": 1, "row": 2}]})
        );
    }
}
