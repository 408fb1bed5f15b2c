//! Preconditions guarding each event.
//!
//! Contracts follow the Hoare shape `{P} action {Q}`: `pre` decides whether
//! an event may be applied at all, `post` re-checks the session invariants
//! once it has been.

use super::invariants::{InvariantSet, InvariantViolation, PursuitInvariants};
use super::session::PursuitSession;
use super::state::{Rejection, TurnState};
use crate::Position;
use tracing::instrument;

/// Pre- and postconditions for applying action `A` to state `S`.
pub trait Contract<S, A> {
    /// Checks that `action` may be applied to `state`.
    fn pre(state: &S, action: &A) -> Result<(), Rejection>;

    /// Checks that `state` is still consistent after the action.
    fn post(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

// ─────────────────────────────────────────────────────────────
//  Pursuer move preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the machine is waiting for the pursuer.
pub struct PursuersTurn;

impl PursuersTurn {
    /// Checks the turn.
    pub fn check(session: &PursuitSession) -> Result<(), Rejection> {
        match session.turn() {
            TurnState::AwaitingPursuerMove => Ok(()),
            other => Err(Rejection::OutOfTurn(other)),
        }
    }
}

/// Precondition: the target is on the grid.
pub struct WithinGrid;

impl WithinGrid {
    /// Checks bounds.
    pub fn check(target: Position, session: &PursuitSession) -> Result<(), Rejection> {
        if session.grid().contains(target) {
            Ok(())
        } else {
            Err(Rejection::OutsideGrid(target))
        }
    }
}

/// Precondition: the target is exactly one orthogonal step away.
pub struct AdjacentStep;

impl AdjacentStep {
    /// Checks Manhattan distance.
    pub fn check(target: Position, session: &PursuitSession) -> Result<(), Rejection> {
        let from = session.pursuer();
        if from.is_adjacent(target) {
            Ok(())
        } else {
            Err(Rejection::NotAdjacent { from, to: target })
        }
    }
}

/// Precondition: the target is not a wall or trap.
pub struct OpenCell;

impl OpenCell {
    /// Checks the cell kind.
    pub fn check(target: Position, session: &PursuitSession) -> Result<(), Rejection> {
        if session.grid().is_open(target) {
            Ok(())
        } else {
            Err(Rejection::Blocked(target))
        }
    }
}

/// All pursuer-move preconditions, in the order they are reported.
pub struct LegalPursuerMove;

impl LegalPursuerMove {
    /// Validates all preconditions for a pursuer move.
    #[instrument(skip(session))]
    pub fn check(target: Position, session: &PursuitSession) -> Result<(), Rejection> {
        PursuersTurn::check(session)?;
        WithinGrid::check(target, session)?;
        AdjacentStep::check(target, session)?;
        OpenCell::check(target, session)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Contracts
// ─────────────────────────────────────────────────────────────

/// Contract for [`PursuitEvent::PursuerMove`](super::PursuitEvent::PursuerMove).
pub struct PursuerMoveContract;

impl Contract<PursuitSession, Position> for PursuerMoveContract {
    fn pre(session: &PursuitSession, target: &Position) -> Result<(), Rejection> {
        LegalPursuerMove::check(*target, session)
    }

    fn post(session: &PursuitSession) -> Result<(), Vec<InvariantViolation>> {
        PursuitInvariants::check_all(session)
    }
}

/// Contract for [`PursuitEvent::QuarryStep`](super::PursuitEvent::QuarryStep).
pub struct QuarryStepContract;

impl Contract<PursuitSession, ()> for QuarryStepContract {
    fn pre(session: &PursuitSession, _action: &()) -> Result<(), Rejection> {
        match session.turn() {
            TurnState::AwaitingQuarryStep => Ok(()),
            other => Err(Rejection::OutOfTurn(other)),
        }
    }

    fn post(session: &PursuitSession) -> Result<(), Vec<InvariantViolation>> {
        PursuitInvariants::check_all(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GridModel, PlanResult};

    fn session() -> PursuitSession {
        let grid = GridModel::from_rows(&["C.X", "..M"]).expect("valid grid");
        PursuitSession::new(grid, PlanResult::no_path("test")).expect("session")
    }

    #[test]
    fn test_legal_step_passes() {
        let session = session();
        assert!(PursuerMoveContract::pre(&session, &Position::new(1, 0)).is_ok());
        assert!(PursuerMoveContract::pre(&session, &Position::new(0, 1)).is_ok());
    }

    #[test]
    fn test_each_precondition_reports_its_rejection() {
        let session = session();
        assert_eq!(
            LegalPursuerMove::check(Position::new(5, 0), &session),
            Err(Rejection::OutsideGrid(Position::new(5, 0)))
        );
        assert_eq!(
            LegalPursuerMove::check(Position::new(1, 1), &session),
            Err(Rejection::NotAdjacent {
                from: Position::new(0, 0),
                to: Position::new(1, 1)
            })
        );
        assert_eq!(
            LegalPursuerMove::check(Position::new(0, 0), &session),
            Err(Rejection::NotAdjacent {
                from: Position::new(0, 0),
                to: Position::new(0, 0)
            })
        );
    }

    #[test]
    fn test_wall_is_blocked() {
        let grid = GridModel::from_rows(&["CXM"]).expect("valid grid");
        let session = PursuitSession::new(grid, PlanResult::no_path("test")).expect("session");
        assert_eq!(
            OpenCell::check(Position::new(1, 0), &session),
            Err(Rejection::Blocked(Position::new(1, 0)))
        );
    }

    #[test]
    fn test_quarry_step_needs_its_turn() {
        let session = session();
        assert_eq!(
            QuarryStepContract::pre(&session, &()),
            Err(Rejection::OutOfTurn(TurnState::AwaitingPursuerMove))
        );
        assert!(QuarryStepContract::post(&session).is_ok());
    }
}
