//! Running the solver as a local child process.

use crate::{PlannerClient, PlannerConfig, TransportError};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use strictly_pursuit::GridModel;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Captured result of one solver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverRun {
    /// True when the solver exited with status 0.
    pub succeeded: bool,
    /// Everything written to stdout.
    pub stdout: String,
    /// Everything written to stderr.
    pub stderr: String,
}

/// Writes `value` as pretty JSON to `path`.
#[instrument(skip(path, value), fields(path = %path.display()))]
pub async fn write_map<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), TransportError> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json).await?;
    debug!("Map written");
    Ok(())
}

/// Runs `command` in `work_dir` and captures its output.
#[instrument(skip(work_dir), fields(work_dir = %work_dir.display()))]
pub async fn run_solver(command: &[String], work_dir: &Path) -> Result<SolverRun, TransportError> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| TransportError::new("Solver command is empty"))?;

    let output = Command::new(program)
        .args(args)
        .current_dir(work_dir)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| TransportError::new(format!("Failed to start solver {}: {}", program, e)))?;

    let run = SolverRun {
        succeeded: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if run.succeeded {
        debug!(bytes = run.stdout.len(), "Solver finished");
    } else {
        warn!(status = %output.status, stderr = %run.stderr.trim(), "Solver exited with failure");
    }
    Ok(run)
}

/// Planner that writes the map file and runs the solver itself.
#[derive(Debug, Clone)]
pub struct ProcessPlanner {
    command: Vec<String>,
    work_dir: PathBuf,
    map_file: String,
}

impl ProcessPlanner {
    /// Creates a planner running `command` in `work_dir`, reading `map_file`.
    pub fn new(command: Vec<String>, work_dir: impl Into<PathBuf>, map_file: impl Into<String>) -> Self {
        Self {
            command,
            work_dir: work_dir.into(),
            map_file: map_file.into(),
        }
    }

    /// Creates a planner from the solver settings in `config`.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(
            config.solver_command().clone(),
            config.work_dir().clone(),
            config.map_file().clone(),
        )
    }
}

#[async_trait::async_trait]
impl PlannerClient for ProcessPlanner {
    #[instrument(skip(self, grid), fields(command = ?self.command))]
    async fn solve(&self, grid: &GridModel) -> Result<String, TransportError> {
        write_map(&self.work_dir.join(&self.map_file), &grid.to_description()).await?;

        let run = run_solver(&self.command, &self.work_dir).await?;
        if !run.succeeded && run.stdout.trim().is_empty() {
            let reason = if run.stderr.trim().is_empty() {
                "solver failed without output".to_string()
            } else {
                run.stderr.trim().to_string()
            };
            return Err(TransportError::new(reason));
        }

        info!(bytes = run.stdout.len(), succeeded = run.succeeded, "Solver output captured");
        Ok(run.stdout)
    }

    fn name(&self) -> &str {
        "process"
    }
}
