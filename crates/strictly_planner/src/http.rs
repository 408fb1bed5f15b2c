//! Planner that talks to a solver bridge over HTTP.

use crate::envelope::{SaveMapResponse, SolverEnvelope};
use crate::{PlannerClient, TransportError};
use strictly_pursuit::GridModel;
use tracing::{debug, info, instrument, warn};

/// Two-step HTTP planner: persist the map, then run the solver.
#[derive(Debug, Clone)]
pub struct HttpPlanner {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPlanner {
    /// Creates a planner for the bridge at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Creates a planner sharing an existing HTTP client.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    /// The bridge base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self, grid))]
    async fn save_map(&self, grid: &GridModel) -> Result<(), TransportError> {
        let response = self
            .client
            .post(format!("{}/save_map", self.base_url))
            .json(&grid.to_description())
            .send()
            .await?;

        let status = response.status();
        let body: SaveMapResponse = response
            .json()
            .await
            .map_err(|e| TransportError::new(format!("Unreadable save_map reply ({}): {}", status, e)))?;

        if !status.is_success() || !body.success {
            let reason = body.error.unwrap_or_else(|| status.to_string());
            warn!(%status, %reason, "Bridge refused map");
            return Err(TransportError::new(format!("save_map failed: {}", reason)));
        }

        debug!(message = ?body.message, "Map saved");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn run_solver(&self) -> Result<String, TransportError> {
        let response = self
            .client
            .post(format!("{}/run_solver", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Solver run rejected");
            return Err(TransportError::new(format!("run_solver returned {}", status)));
        }

        let envelope: SolverEnvelope = response
            .json()
            .await
            .map_err(|e| TransportError::new(format!("Unreadable run_solver reply: {}", e)))?;

        let output = envelope.output.filter(|text| !text.trim().is_empty());
        match (envelope.success, output) {
            // A failed run that still printed something is for the parser to judge
            (_, Some(output)) => Ok(output),
            (true, None) => Ok(String::new()),
            (false, None) => {
                debug!(error = ?envelope.error, "Solver failed without output");
                let reason = envelope
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| "no output".to_string());
                Err(TransportError::new(format!(
                    "Solver produced no output: {}",
                    reason.trim()
                )))
            }
        }
    }
}

#[async_trait::async_trait]
impl PlannerClient for HttpPlanner {
    #[instrument(skip(self, grid), fields(base_url = %self.base_url))]
    async fn solve(&self, grid: &GridModel) -> Result<String, TransportError> {
        self.save_map(grid).await?;
        let output = self.run_solver().await?;
        info!(bytes = output.len(), "Solver output received");
        Ok(output)
    }

    fn name(&self) -> &str {
        "http"
    }
}
