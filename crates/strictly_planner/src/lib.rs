//! Strictly Planner - getting quarry routes out of an external solver
//!
//! The solver is a separate program that reads a map file and prints a
//! route. This crate reaches it, either through an HTTP bridge or by running
//! it directly, and plays the resulting game in a terminal.
//!
//! # Architecture
//!
//! - **Client**: the [`PlannerClient`] seam, with [`HttpPlanner`] and
//!   [`ProcessPlanner`]
//! - **Dispatch**: [`spawn_plan`] runs a round trip without blocking
//! - **Bridge**: the axum server fronting a command-line solver
//! - **Config**: [`PlannerConfig`] from TOML and the environment
//! - **Play**: [`run_play`], the line-based game loop

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod client;
mod config;
mod dispatch;
mod envelope;
mod error;
mod http;
mod play;
mod process;

/// The solver bridge server.
pub mod bridge;

// Crate-level exports - Planner seam
pub use client::{PlannerClient, plan_with, planner_from_config};
pub use http::HttpPlanner;
pub use process::{ProcessPlanner, SolverRun, run_solver, write_map};

// Crate-level exports - Dispatch
pub use dispatch::{PlanResponse, spawn_plan};

// Crate-level exports - Wire bodies
pub use envelope::{HealthResponse, SaveMapResponse, SolverEnvelope};

// Crate-level exports - Configuration and errors
pub use config::{BASE_URL_ENV, ConfigError, PlannerConfig, TransportKind};
pub use error::TransportError;

// Crate-level exports - Terminal play
pub use play::run_play;
