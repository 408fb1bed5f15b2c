//! Dialect B: the solver prints a human-readable report.
//!
//! ```text
//! [SUCCESS] Solution found!
//! Door found! Mouse needs to reach the door to escape.
//! Number of traps: 2
//! Path length: 4 moves
//! Path: (5, 8) -> (4, 8) -> (4, 7) -> (4, 6) -> (4, 5)
//! ```

use super::{Dialect, GoalKind, ParseStrategy, RawPlan};
use tracing::{debug, instrument};

const SUCCESS_MARKER: &str = "[SUCCESS]";
const DOOR_MARKER: &str = "Door found";
const PATH_LENGTH_LABEL: &str = "Path length:";
const TRAP_COUNT_LABEL: &str = "Number of traps:";
const PATH_LABEL: &str = "Path:";

/// Reads the labeled report. Only attempted when the success marker is
/// present; each labeled line is read on its own and malformed lines are
/// skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabeledTextDialect;

impl ParseStrategy for LabeledTextDialect {
    fn dialect(&self) -> Dialect {
        Dialect::LabeledText
    }

    #[instrument(skip_all)]
    fn parse(&self, raw: &str) -> Option<RawPlan> {
        if !raw.contains(SUCCESS_MARKER) {
            return None;
        }

        let mut plan = RawPlan::empty(Dialect::LabeledText);
        let mut moves = None;
        let mut traps = None;

        for line in raw.lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix(PATH_LENGTH_LABEL) {
                moves = leading_number(rest).or(moves);
            } else if let Some(rest) = line.strip_prefix(TRAP_COUNT_LABEL) {
                traps = leading_number(rest).or(traps);
            } else if let Some(rest) = line.strip_prefix(PATH_LABEL) {
                match parse_pairs(rest) {
                    Some(pairs) => plan.path_rc = pairs,
                    None => debug!(line, "Skipping malformed path line"),
                }
            }
            if line.contains(DOOR_MARKER) {
                plan.goal = GoalKind::Door;
            }
        }

        plan.reported_moves = Some(moves.unwrap_or(0));
        plan.traps = Some(traps.unwrap_or(0));
        plan.claims_safe = plan.goal == GoalKind::Door;
        if plan.path_rc.is_empty() {
            plan.message = Some("solver reported success without a path".to_string());
        }

        debug!(
            cells = plan.path_rc.len(),
            goal = %plan.goal,
            traps = ?plan.traps,
            "Read labeled report"
        );
        Some(plan)
    }
}

fn leading_number(text: &str) -> Option<usize> {
    text.split_whitespace().next()?.parse().ok()
}

/// Parses `(r, c) -> (r, c) -> ...`. Any malformed pair rejects the line.
fn parse_pairs(text: &str) -> Option<Vec<(usize, usize)>> {
    text.split("->")
        .map(|segment| {
            let inner = segment
                .trim()
                .strip_prefix('(')?
                .strip_suffix(')')?;
            let (row, col) = inner.split_once(',')?;
            Some((row.trim().parse().ok()?, col.trim().parse().ok()?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_report() {
        let output = "Map size: 3 x 2\n\
                      Door found! Mouse needs to reach the door to escape.\n\
                      Number of traps: 2\n\
                      [SUCCESS] Solution found!\n\
                      Path length: 2 moves\n\
                      \n\
                      Path: (0,0)->(0,1)->(1,1)\n";
        let plan = LabeledTextDialect.parse(output).expect("claimed");
        assert_eq!(plan.path_rc, vec![(0, 0), (0, 1), (1, 1)]);
        assert_eq!(plan.reported_moves, Some(2));
        assert_eq!(plan.traps, Some(2));
        assert_eq!(plan.goal, GoalKind::Door);
        assert!(plan.claims_safe);
    }

    #[test]
    fn test_requires_success_marker() {
        let output = "Door found!\nPath: (0, 0) -> (0, 1)\n";
        assert!(LabeledTextDialect.parse(output).is_none());
        assert!(LabeledTextDialect.parse("[FAILED] No solution found!").is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let output = "[SUCCESS]\nPath length: lots\nPath: (4, 4) -> (4, 5)\n";
        let plan = LabeledTextDialect.parse(output).expect("claimed");
        assert_eq!(plan.reported_moves, Some(0));
        assert_eq!(plan.traps, Some(0));
        assert_eq!(plan.goal, GoalKind::Edge);
        assert!(!plan.claims_safe);
        assert_eq!(plan.path_rc, vec![(4, 4), (4, 5)]);
    }

    #[test]
    fn test_malformed_path_line_leaves_path_empty() {
        let output = "[SUCCESS]\nDoor found!\nPath: (0, 0) -> (zero, 1)\n";
        let plan = LabeledTextDialect.parse(output).expect("claimed");
        assert!(plan.path_rc.is_empty());
        assert!(plan.message.is_some());

        let no_path_line = LabeledTextDialect.parse("[SUCCESS]\nDoor found!\n").expect("claimed");
        assert!(no_path_line.path_rc.is_empty());
    }

    #[test]
    fn test_parse_pairs_tolerates_spacing() {
        assert_eq!(
            parse_pairs(" (8, 5) ->  (7, 5)->(7,4) "),
            Some(vec![(8, 5), (7, 5), (7, 4)])
        );
        assert_eq!(parse_pairs(""), None);
        assert_eq!(parse_pairs("(1, 2) -> 3, 4"), None);
    }
}
