//! Command-line interface for strictly_pursuit.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Pursuit - chase a solver-planned quarry across a tile grid
#[derive(Parser, Debug)]
#[command(name = "strictly_pursuit")]
#[command(about = "Tile-grid pursuit puzzle with an external route planner", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan the quarry's route for a map and print the result
    Solve {
        /// Grid description file (JSON)
        #[arg(short, long)]
        map: PathBuf,

        /// Planner configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Play a map in the terminal
    Play {
        /// Grid description file (JSON)
        #[arg(short, long)]
        map: PathBuf,

        /// Planner configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run the HTTP solver bridge
    Serve {
        /// Port to bind to (defaults to the configured bridge port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Planner configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["strictly_pursuit", "solve", "--map", "level1.json"]);
        assert!(matches!(cli.command, Command::Solve { ref map, config: None } if map == &PathBuf::from("level1.json")));

        let cli = Cli::parse_from(["strictly_pursuit", "serve", "-p", "5050"]);
        match cli.command {
            Command::Serve { port, host, config } => {
                assert_eq!(port, Some(5050));
                assert_eq!(host, "127.0.0.1");
                assert!(config.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_map_is_required() {
        assert!(Cli::try_parse_from(["strictly_pursuit", "play"]).is_err());
    }
}
