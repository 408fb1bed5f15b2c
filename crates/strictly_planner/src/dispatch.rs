//! Runs planning off the caller's task.

use crate::{PlannerClient, TransportError, plan_with};
use std::sync::Arc;
use strictly_pursuit::{PlanRequest, PlanResult, PlanTicket, ResultParser};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info_span};

/// A finished planning round trip, addressed to the ticket that asked.
#[derive(Debug)]
pub struct PlanResponse {
    /// Ticket from the originating [`PlanRequest`].
    pub ticket: PlanTicket,
    /// Parsed plan, or why the solver could not be reached.
    pub outcome: Result<PlanResult, TransportError>,
}

/// Spawns the solve-and-parse round trip for `request` on the runtime.
///
/// The caller keeps running; hand the response to
/// [`SessionSlot::complete`](strictly_pursuit::SessionSlot::complete), which
/// drops it if the ticket has gone stale meanwhile.
pub fn spawn_plan(
    client: Arc<dyn PlannerClient>,
    parser: Arc<ResultParser>,
    request: PlanRequest,
) -> JoinHandle<PlanResponse> {
    let ticket = *request.ticket();
    let span = info_span!("plan", %ticket, planner = client.name());
    tokio::spawn(
        async move {
            let outcome = plan_with(client.as_ref(), &parser, request.grid()).await;
            debug!(ok = outcome.is_ok(), "Planning finished");
            PlanResponse { ticket, outcome }
        }
        .instrument(span),
    )
}
