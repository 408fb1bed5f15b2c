//! The planner seam: anything that can turn a grid into raw solver output.

use crate::{HttpPlanner, PlannerConfig, ProcessPlanner, TransportError, TransportKind};
use std::sync::Arc;
use strictly_pursuit::{GridModel, PlanResult, ResultParser};
use tracing::{info, instrument, warn};

/// Sends a grid to the external solver and returns its raw output.
///
/// One attempt per call; retrying is the caller's decision.
#[async_trait::async_trait]
pub trait PlannerClient: Send + Sync {
    /// Runs the solver for `grid`.
    async fn solve(&self, grid: &GridModel) -> Result<String, TransportError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Solves and parses in one step.
///
/// Transport failures come back as errors; only a solver that answered can
/// produce [`PlanResult::NoPath`].
#[instrument(skip_all, fields(planner = client.name()))]
pub async fn plan_with(
    client: &dyn PlannerClient,
    parser: &ResultParser,
    grid: &GridModel,
) -> Result<PlanResult, TransportError> {
    let raw = client.solve(grid).await.inspect_err(|e| {
        warn!(error = %e, "Planner unreachable");
    })?;
    let plan = parser.parse(&raw, grid);
    info!(%plan, "Plan ready");
    Ok(plan)
}

/// Builds the planner the configuration asks for.
pub fn planner_from_config(config: &PlannerConfig) -> Arc<dyn PlannerClient> {
    match config.transport() {
        TransportKind::Http => Arc::new(HttpPlanner::new(config.base_url().clone())),
        TransportKind::Process => Arc::new(ProcessPlanner::from_config(config)),
    }
}
