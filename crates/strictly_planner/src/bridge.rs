//! HTTP bridge in front of a command-line solver.
//!
//! Browsers and remote players cannot spawn processes, so the bridge
//! persists the map a client posts and runs the solver on request.
//!
//! | Route | Effect |
//! |-------|--------|
//! | `POST /save_map` | write the JSON body to the configured map file |
//! | `POST /run_solver` | run the solver in the work directory |
//! | `GET /health` | liveness |

use crate::envelope::{HealthResponse, SaveMapResponse, SolverEnvelope};
use crate::process::{run_solver, write_map};
use crate::PlannerConfig;
use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::{get, post},
};
use std::sync::Arc;
use strictly_pursuit::{GridDescription, GridModel, PlanResult, ResultParser};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::{debug, info, instrument, warn};

/// Shared bridge state.
#[derive(Debug, Clone)]
pub struct BridgeState {
    config: Arc<PlannerConfig>,
    parser: Arc<ResultParser>,
}

impl BridgeState {
    /// Creates bridge state from a configuration.
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config: Arc::new(config),
            parser: Arc::new(ResultParser::new()),
        }
    }
}

/// Builds the bridge router.
pub fn router(state: BridgeState) -> Router {
    Router::new()
        .route("/save_map", post(save_map))
        .route("/run_solver", post(run_solver_handler))
        .route("/health", get(health))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming bridge request");
            req
        }))
        .with_state(state)
}

/// Serves the bridge on an already-bound listener until the task is dropped.
#[instrument(skip_all)]
pub async fn serve(listener: TcpListener, state: BridgeState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Solver bridge listening");
    }
    axum::serve(listener, router(state)).await
}

#[instrument(skip_all)]
async fn save_map(
    State(state): State<BridgeState>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<SaveMapResponse>) {
    let path = state.config.map_path();
    match write_map(&path, &body).await {
        Ok(()) => {
            info!(path = %path.display(), "Map saved");
            (
                StatusCode::OK,
                Json(SaveMapResponse {
                    success: true,
                    message: Some("Map saved successfully".to_string()),
                    error: None,
                }),
            )
        }
        Err(e) => {
            warn!(error = %e, "Failed to save map");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveMapResponse {
                    success: false,
                    message: None,
                    error: Some(e.message),
                }),
            )
        }
    }
}

#[instrument(skip_all)]
async fn run_solver_handler(State(state): State<BridgeState>) -> Json<SolverEnvelope> {
    let config = &state.config;
    let run = match run_solver(config.solver_command(), config.work_dir()).await {
        Ok(run) => run,
        Err(e) => {
            warn!(error = %e, "Solver could not be started");
            return Json(SolverEnvelope {
                success: false,
                output: None,
                error: Some(e.message),
                solution: None,
            });
        }
    };

    let solution = if run.succeeded {
        read_solution(&state, &run.stdout).await
    } else {
        None
    };
    let error = if run.succeeded {
        None
    } else if run.stderr.trim().is_empty() {
        Some("Solver failed".to_string())
    } else {
        Some(run.stderr)
    };

    Json(SolverEnvelope {
        success: run.succeeded,
        output: (!run.stdout.trim().is_empty()).then_some(run.stdout),
        error,
        solution,
    })
}

/// Parses the output against the saved map, when the map is readable.
async fn read_solution(state: &BridgeState, output: &str) -> Option<PlanResult> {
    let path = state.config.map_path();
    let text = tokio::fs::read_to_string(&path).await.ok()?;
    let description: GridDescription = match serde_json::from_str(&text) {
        Ok(description) => description,
        Err(e) => {
            debug!(error = %e, "Saved map is not a grid description");
            return None;
        }
    };
    let grid = match GridModel::try_from(description) {
        Ok(grid) => grid,
        Err(e) => {
            debug!(error = %e, "Saved map is not a valid grid");
            return None;
        }
    };
    Some(state.parser.parse(output, &grid))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Server is working!".to_string(),
    })
}
