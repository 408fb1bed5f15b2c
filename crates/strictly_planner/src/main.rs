//! Strictly Pursuit - Unified CLI
//!
//! Solve a map, play it in the terminal, or run the solver bridge.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use std::sync::Arc;
use strictly_planner::bridge::{self, BridgeState};
use strictly_planner::{PlannerConfig, plan_with, planner_from_config, run_play};
use strictly_pursuit::{GridDescription, GridModel, ResultParser};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Solve { map, config } => run_solve(&map, config.as_deref()).await,
        Command::Play { map, config } => run_terminal_game(&map, config.as_deref()).await,
        Command::Serve { port, host, config } => run_bridge(host, port, config.as_deref()).await,
    }
}

/// Reads a grid description file.
#[instrument]
fn read_grid(path: &Path) -> Result<GridModel> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read map {}", path.display()))?;
    let description: GridDescription =
        serde_json::from_str(&text).context("Map is not a grid description")?;
    let grid = GridModel::try_from(description).context("Map is not a playable grid")?;
    info!(width = grid.width(), height = grid.height(), "Map loaded");
    Ok(grid)
}

/// Plan once and print the result
async fn run_solve(map: &Path, config: Option<&Path>) -> Result<()> {
    let config = PlannerConfig::load(config)?;
    let grid = read_grid(map)?;
    let client = planner_from_config(&config);

    let plan = plan_with(client.as_ref(), &ResultParser::new(), &grid)
        .await
        .context("Planner unavailable")?;

    println!("{}", grid.render());
    println!("{}", plan);
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

/// Play in the terminal
async fn run_terminal_game(map: &Path, config: Option<&Path>) -> Result<()> {
    let config = PlannerConfig::load(config)?;
    let grid = read_grid(map)?;
    let client = planner_from_config(&config);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let outcome = run_play(grid, client, Arc::new(ResultParser::new()), stdin, &mut stdout).await?;

    info!(?outcome, "Game finished");
    Ok(())
}

/// Run the solver bridge
async fn run_bridge(host: String, port: Option<u16>, config: Option<&Path>) -> Result<()> {
    let config = PlannerConfig::load(config)?;
    let port = port.unwrap_or(*config.bridge_port());

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    info!(%host, port, work_dir = %config.work_dir().display(), "Starting solver bridge");

    bridge::serve(listener, BridgeState::new(config)).await?;
    Ok(())
}
