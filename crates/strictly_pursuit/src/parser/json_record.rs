//! Dialect A: the solver prints one JSON record per line.

use super::{Dialect, GoalKind, ParseStrategy, RawPlan};
use serde::Deserialize;
use tracing::{debug, instrument};

/// The record shape. Unknown keys (`mouse_start`, `cat_start`, `door_pos`)
/// are ignored.
#[derive(Debug, Deserialize)]
struct SolverRecord {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    path: Option<Vec<(usize, usize)>>,
    #[serde(default, alias = "trapsAvoided")]
    traps_avoided: Option<usize>,
}

/// Scans output lines from the end and takes the last one that decodes as a
/// record with a `success` flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRecordDialect;

impl ParseStrategy for JsonRecordDialect {
    fn dialect(&self) -> Dialect {
        Dialect::JsonRecord
    }

    #[instrument(skip_all)]
    fn parse(&self, raw: &str) -> Option<RawPlan> {
        let lines: Vec<&str> = raw.lines().collect();
        let (line_no, record) = lines.iter().enumerate().rev().find_map(|(idx, line)| {
            serde_json::from_str::<SolverRecord>(line.trim())
                .ok()
                .map(|record| (idx, record))
        })?;

        debug!(line_no, success = record.success, "Found solver record");

        let path_rc = record.path.unwrap_or_default();
        Some(RawPlan {
            dialect: Dialect::JsonRecord,
            claims_safe: record.success,
            reported_moves: None,
            goal: if record.success {
                GoalKind::Door
            } else {
                GoalKind::Edge
            },
            traps: record.traps_avoided,
            message: record.message,
            path_rc,
        })
    }
}
