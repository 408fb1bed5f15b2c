//! Consistency checks a live session must pass after every applied event.
//!
//! Each check looks at where the agents stand against the grid and the
//! plan, and says what is wrong when it fails rather than just that it
//! failed.

use super::session::PursuitSession;

/// A consistency rule over a [`PursuitSession`].
pub trait SessionInvariant {
    /// Short name used in logs and violation reports.
    const NAME: &'static str;

    /// Inspects `session`, describing the inconsistency found, if any.
    fn inspect(session: &PursuitSession) -> Result<(), String>;
}

/// A rule a session failed, with what was observed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{invariant}: {detail}")]
pub struct InvariantViolation {
    /// [`SessionInvariant::NAME`] of the failed rule.
    pub invariant: &'static str,
    /// What the session looked like when the rule failed.
    pub detail: String,
}

/// Runs one rule and records its violation.
fn record<I: SessionInvariant>(session: &PursuitSession, found: &mut Vec<InvariantViolation>) {
    if let Err(detail) = I::inspect(session) {
        found.push(InvariantViolation {
            invariant: I::NAME,
            detail,
        });
    }
}

/// Several rules checked together. Implemented for pairs and triples.
pub trait InvariantSet {
    /// Returns every violation found, or `Ok(())` when the session is
    /// consistent.
    fn check_all(session: &PursuitSession) -> Result<(), Vec<InvariantViolation>>;
}

impl<A: SessionInvariant, B: SessionInvariant> InvariantSet for (A, B) {
    fn check_all(session: &PursuitSession) -> Result<(), Vec<InvariantViolation>> {
        let mut found = Vec::new();
        record::<A>(session, &mut found);
        record::<B>(session, &mut found);
        if found.is_empty() { Ok(()) } else { Err(found) }
    }
}

impl<A: SessionInvariant, B: SessionInvariant, C: SessionInvariant> InvariantSet for (A, B, C) {
    fn check_all(session: &PursuitSession) -> Result<(), Vec<InvariantViolation>> {
        let mut found = Vec::new();
        record::<A>(session, &mut found);
        record::<B>(session, &mut found);
        record::<C>(session, &mut found);
        if found.is_empty() { Ok(()) } else { Err(found) }
    }
}

/// The plan index never runs past the plan.
pub struct PlanIndexInBounds;

impl SessionInvariant for PlanIndexInBounds {
    const NAME: &'static str = "plan index in bounds";

    fn inspect(session: &PursuitSession) -> Result<(), String> {
        let len = session.plan().path().len();
        let index = session.path_index();
        // An empty plan pins the index at zero
        if index < len.max(1) {
            Ok(())
        } else {
            Err(format!("index {} on a plan of {} cells", index, len))
        }
    }
}

/// The quarry stands on the plan cell its index names, or on its grid cell
/// when there is no plan.
pub struct QuarryOnPlan;

impl SessionInvariant for QuarryOnPlan {
    const NAME: &'static str = "quarry on plan";

    fn inspect(session: &PursuitSession) -> Result<(), String> {
        let expected = match session.plan().path().get(session.path_index()) {
            Some(cell) => *cell,
            None => session.grid().quarry().map_err(|e| e.to_string())?,
        };
        if expected == session.quarry() {
            Ok(())
        } else {
            Err(format!(
                "quarry at {} but step {} expects {}",
                session.quarry(),
                session.path_index(),
                expected
            ))
        }
    }
}

/// The pursuer never stands in a wall or off the grid.
pub struct PursuerOnOpenCell;

impl SessionInvariant for PursuerOnOpenCell {
    const NAME: &'static str = "pursuer on open cell";

    fn inspect(session: &PursuitSession) -> Result<(), String> {
        if session.grid().is_open(session.pursuer()) {
            Ok(())
        } else {
            Err(format!("pursuer at blocked cell {}", session.pursuer()))
        }
    }
}

/// Every pursuit rule as one set.
pub type PursuitInvariants = (PlanIndexInBounds, QuarryOnPlan, PursuerOnOpenCell);
