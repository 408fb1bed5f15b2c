//! Planner configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Environment variable overriding [`PlannerConfig::base_url`].
pub const BASE_URL_ENV: &str = "STRICTLY_PURSUIT_BASE_URL";

/// How plans are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransportKind {
    /// Talk to a solver bridge over HTTP.
    Http,
    /// Run the solver as a local child process.
    Process,
}

/// Where the solver lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Transport used by `solve` and `play`.
    #[serde(default = "default_transport")]
    transport: TransportKind,

    /// Bridge base URL for the HTTP transport.
    #[serde(default = "default_base_url")]
    base_url: String,

    /// Solver command line (program then arguments).
    #[serde(default = "default_solver_command")]
    solver_command: Vec<String>,

    /// Directory the solver runs in and reads its map from.
    #[serde(default = "default_work_dir")]
    work_dir: PathBuf,

    /// Map file name inside `work_dir`.
    #[serde(default = "default_map_file")]
    map_file: String,

    /// Port the bridge listens on.
    #[serde(default = "default_bridge_port")]
    bridge_port: u16,
}

fn default_transport() -> TransportKind {
    TransportKind::Http
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_solver_command() -> Vec<String> {
    vec!["python".to_string(), "bfs.py".to_string()]
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_map_file() -> String {
    "map_data.json".to_string()
}

fn default_bridge_port() -> u16 {
    5000
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            base_url: default_base_url(),
            solver_command: default_solver_command(),
            work_dir: default_work_dir(),
            map_file: default_map_file(),
            bridge_port: default_bridge_port(),
        }
    }
}

impl PlannerConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        info!(transport = %config.transport, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if given, otherwise defaults, then applies the
    /// environment override.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_base_url_override(std::env::var(BASE_URL_ENV).ok()))
    }

    /// Replaces `base_url` when an override is present and non-empty.
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            debug!(%url, "Overriding base URL from environment");
            self.base_url = url;
        }
        self
    }

    /// Returns a copy using `transport`.
    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    /// Returns a copy running the solver from `work_dir`.
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    /// Returns a copy with a different solver command line.
    pub fn with_solver_command(mut self, command: Vec<String>) -> Self {
        self.solver_command = command;
        self
    }

    /// Full path of the map file the solver reads.
    pub fn map_path(&self) -> PathBuf {
        self.work_dir.join(&self.map_file)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.solver_command.is_empty() {
            return Err(ConfigError::new("solver_command must not be empty".to_string()));
        }
        if self.map_file.trim().is_empty() {
            return Err(ConfigError::new("map_file must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
