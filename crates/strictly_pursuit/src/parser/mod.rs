//! Turns raw solver output into a [`PlanResult`].
//!
//! The solver's stdout is free text that may interleave diagnostics with the
//! actual answer, and two output dialects have been observed in the wild.
//! Each dialect is a [`ParseStrategy`]; the [`ResultParser`] tries them in
//! order and the first one that claims the output wins. Whatever comes back
//! is then checked against the grid and sorted into a tier.
//!
//! Nothing in here fails. Output nobody can read degrades to
//! [`PlanResult::NoPath`].

mod json_record;
mod labeled_text;

pub use json_record::JsonRecordDialect;
pub use labeled_text::LabeledTextDialect;

use crate::{GridModel, PlanResult, Position};
use tracing::{debug, info, instrument, warn};

/// Which output shape a plan was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Dialect {
    /// One self-describing JSON record per line.
    JsonRecord,
    /// Labeled human-readable lines (`Path length:`, `Path:` ...).
    LabeledText,
}

/// Where the solver says the route ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
pub enum GoalKind {
    /// The route ends on the exit.
    Door,
    /// The route ends somewhere else, typically the grid edge.
    #[default]
    Edge,
}

/// A plan as a dialect read it, before any grid checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPlan {
    /// The dialect that produced this plan.
    pub dialect: Dialect,
    /// Whether the solver itself claims a safe route to the exit.
    pub claims_safe: bool,
    /// Route cells in solver order: (row, column).
    pub path_rc: Vec<(usize, usize)>,
    /// Trap count, when the dialect reports one.
    pub traps: Option<usize>,
    /// Move count, when the dialect reports one.
    pub reported_moves: Option<usize>,
    /// Reported goal type.
    pub goal: GoalKind,
    /// Free-form solver message, if any.
    pub message: Option<String>,
}

impl RawPlan {
    /// An empty plan from `dialect` with every optional field unset.
    pub fn empty(dialect: Dialect) -> Self {
        Self {
            dialect,
            claims_safe: false,
            path_rc: Vec::new(),
            traps: None,
            reported_moves: None,
            goal: GoalKind::default(),
            message: None,
        }
    }

    /// The route in (column, row) order.
    pub fn positions(&self) -> Vec<Position> {
        self.path_rc
            .iter()
            .map(|&(row, col)| Position::from_row_col(row, col))
            .collect()
    }
}

/// One recognizable solver output shape.
pub trait ParseStrategy: Send + Sync {
    /// Short name for logs.
    fn dialect(&self) -> Dialect;

    /// Claims the output and extracts a plan, or returns `None` when the
    /// output is not in this dialect.
    fn parse(&self, raw: &str) -> Option<RawPlan>;
}

/// Reads solver output in any registered dialect.
pub struct ResultParser {
    strategies: Vec<Box<dyn ParseStrategy>>,
}

impl std::fmt::Debug for ResultParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dialects: Vec<Dialect> = self.strategies.iter().map(|s| s.dialect()).collect();
        f.debug_struct("ResultParser")
            .field("strategies", &dialects)
            .finish()
    }
}

impl Default for ResultParser {
    fn default() -> Self {
        Self::with_strategies(vec![
            Box::new(JsonRecordDialect),
            Box::new(LabeledTextDialect),
        ])
    }
}

impl ResultParser {
    /// Parser with both known dialects, JSON records first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser with a custom strategy order.
    pub fn with_strategies(strategies: Vec<Box<dyn ParseStrategy>>) -> Self {
        Self { strategies }
    }

    /// Maps raw solver output to a plan for `grid`.
    #[instrument(skip(self, raw, grid), fields(raw_len = raw.len()))]
    pub fn parse(&self, raw: &str, grid: &GridModel) -> PlanResult {
        let claimed = self.strategies.iter().find_map(|strategy| {
            let plan = strategy.parse(raw);
            debug!(dialect = %strategy.dialect(), claimed = plan.is_some(), "Tried dialect");
            plan
        });

        match claimed {
            Some(raw_plan) => classify(raw_plan, grid),
            None => {
                info!("No dialect recognised the solver output");
                PlanResult::no_path("solver reported no usable result")
            }
        }
    }
}

/// Sorts a dialect's plan into a tier, checking it against the grid.
#[instrument(skip(raw_plan, grid), fields(dialect = %raw_plan.dialect, cells = raw_plan.path_rc.len()))]
pub fn classify(raw_plan: RawPlan, grid: &GridModel) -> PlanResult {
    let path = raw_plan.positions();

    if path.is_empty() {
        let reason = raw_plan
            .message
            .unwrap_or_else(|| "solver returned an empty path".to_string());
        info!(%reason, "Plan has no path");
        return PlanResult::NoPath { reason };
    }

    if let Err(problem) = check_walk(&path, grid) {
        warn!(%problem, "Solver path rejected");
        return PlanResult::no_path(format!("solver path is not a legal walk: {}", problem));
    }

    match raw_plan.reported_moves {
        Some(moves) if moves + 1 != path.len() => {
            debug!(moves, cells = path.len(), "Reported length disagrees with path");
        }
        _ => {}
    }

    let reaches_exit = grid.exit().is_some() && path.last().copied() == grid.exit();
    if raw_plan.claims_safe && reaches_exit {
        let traps_avoided = raw_plan.traps.unwrap_or_else(|| grid.wall_count());
        info!(moves = path.len() - 1, traps_avoided, "Safe path");
        PlanResult::SafePath {
            path,
            traps_avoided,
        }
    } else {
        info!(moves = path.len() - 1, reaches_exit, "Best-effort path");
        PlanResult::BestEffortPath { path }
    }
}

/// Checks that `path` is a walk the quarry could take on `grid`.
pub(crate) fn check_walk(path: &[Position], grid: &GridModel) -> Result<(), String> {
    let start = grid.quarry().map_err(|e| e.to_string())?;
    if path.first() != Some(&start) {
        return Err(format!("route does not start on the quarry at {}", start));
    }
    if let Some(blocked) = path.iter().find(|p| !grid.is_open(**p)) {
        return Err(format!("{} is a wall or outside the grid", blocked));
    }
    if let Some(pair) = path.windows(2).find(|w| !w[0].is_adjacent(w[1])) {
        return Err(format!("{} to {} is not a single step", pair[0], pair[1]));
    }
    Ok(())
}
