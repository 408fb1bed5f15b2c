//! JSON bodies exchanged with the solver bridge.

use serde::{Deserialize, Serialize};
use strictly_pursuit::PlanResult;

/// Reply to `POST /save_map`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveMapResponse {
    /// Whether the map was persisted.
    pub success: bool,
    /// Human-readable confirmation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reply to `POST /run_solver`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverEnvelope {
    /// True when the solver ran and exited cleanly.
    pub success: bool,
    /// Captured solver stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Failure reason or captured stderr.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The bridge's own reading of the output against the saved map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<PlanResult>,
}

/// Reply to `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Liveness message.
    pub message: String,
}
