//! The live game: one pursuer, one plan-driven quarry, strict alternation.

use super::contracts::{Contract, PursuerMoveContract, QuarryStepContract};
use super::state::{Applied, Outcome, PursuitEvent, Rejection, Transition, TurnState};
use crate::parser::check_walk;
use crate::{Direction, GridError, GridModel, PlanResult, Position};
use tracing::{debug, error, info, instrument, warn};

/// One play attempt.
///
/// Owns a read-only grid and the resolved plan, and is the only mutable
/// piece of game state. Every change goes through [`PursuitSession::apply`].
#[derive(Debug, Clone)]
pub struct PursuitSession {
    pub(super) grid: GridModel,
    pub(super) plan: PlanResult,
    pub(super) pursuer: Position,
    pub(super) quarry: Position,
    pub(super) path_index: usize,
    pub(super) turn: TurnState,
}

/// Both halves of a full turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    /// The pursuer's move.
    pub pursuer: Transition,
    /// The quarry's reply, if the game was still running.
    pub quarry: Option<Transition>,
}

impl TurnReport {
    /// State after the whole turn.
    pub fn state(&self) -> TurnState {
        self.quarry.unwrap_or(self.pursuer).state
    }
}

impl PursuitSession {
    /// Starts a session, waiting on the pursuer.
    ///
    /// The quarry starts on the first plan cell; with no plan it stays on
    /// its grid cell for the whole game. A plan that is not a legal walk
    /// from the quarry is refused.
    #[instrument(skip(grid, plan), fields(plan = %plan))]
    pub fn new(grid: GridModel, plan: PlanResult) -> Result<Self, GridError> {
        let pursuer = grid.pursuer()?;
        let quarry = grid.quarry()?;
        if !plan.path().is_empty() {
            check_walk(plan.path(), &grid).map_err(|problem| {
                warn!(%problem, "Refusing illegal plan");
                GridError::InvalidGrid {
                    reason: format!("illegal plan: {}", problem),
                }
            })?;
        }

        info!(%pursuer, %quarry, moves = plan.moves(), "Pursuit session started");
        Ok(Self {
            grid,
            plan,
            pursuer,
            quarry,
            path_index: 0,
            turn: TurnState::AwaitingPursuerMove,
        })
    }

    /// Applies one event. Illegal events leave the session untouched and
    /// come back as [`Applied::Ignored`].
    #[instrument(skip(self), fields(turn = ?self.turn))]
    pub fn apply(&mut self, event: PursuitEvent) -> Transition {
        let applied = match event {
            PursuitEvent::PursuerMove(target) => self.move_pursuer(target),
            PursuitEvent::QuarryStep => self.step_quarry(),
        };

        if let Applied::Ignored(rejection) = applied {
            debug!(%rejection, "Event ignored");
        } else {
            self.check_invariants(event);
        }

        Transition {
            applied,
            state: self.turn,
        }
    }

    /// Moves the pursuer one cell in `direction`.
    pub fn step_pursuer(&mut self, direction: Direction) -> Transition {
        match self.pursuer.step(direction) {
            Some(target) => self.apply(PursuitEvent::PursuerMove(target)),
            None => {
                let rejection = match self.turn {
                    TurnState::AwaitingPursuerMove => Rejection::OffEdge(direction),
                    other => Rejection::OutOfTurn(other),
                };
                debug!(%rejection, "Event ignored");
                Transition {
                    applied: Applied::Ignored(rejection),
                    state: self.turn,
                }
            }
        }
    }

    /// Plays a full turn: the pursuer's move, then the quarry's reply if the
    /// move was accepted and did not end the game.
    pub fn play_turn(&mut self, target: Position) -> TurnReport {
        let pursuer = self.apply(PursuitEvent::PursuerMove(target));
        let quarry = (pursuer.state == TurnState::AwaitingQuarryStep)
            .then(|| self.apply(PursuitEvent::QuarryStep));
        TurnReport { pursuer, quarry }
    }

    fn move_pursuer(&mut self, target: Position) -> Applied {
        if let Err(rejection) = PursuerMoveContract::pre(self, &target) {
            return Applied::Ignored(rejection);
        }

        let from = self.pursuer;
        self.pursuer = target;
        self.turn = match self.terminal() {
            Some(outcome) => TurnState::GameOver(outcome),
            None => TurnState::AwaitingQuarryStep,
        };

        debug!(%from, to = %target, turn = ?self.turn, "Pursuer moved");
        Applied::PursuerMoved { from, to: target }
    }

    fn step_quarry(&mut self) -> Applied {
        if let Err(rejection) = QuarryStepContract::pre(self, &()) {
            return Applied::Ignored(rejection);
        }

        let next = self.path_index + 1;
        let Some(&to) = self.plan.path().get(next) else {
            // Out of plan: the quarry is cornered and waits for a replan
            // that never comes on its own.
            self.turn = TurnState::AwaitingPursuerMove;
            debug!(path_index = self.path_index, "Quarry plan exhausted");
            return Applied::QuarryStalled;
        };

        let from = self.quarry;
        self.quarry = to;
        self.path_index = next;
        self.turn = match self.terminal() {
            Some(outcome) => TurnState::GameOver(outcome),
            None => TurnState::AwaitingPursuerMove,
        };

        debug!(%from, %to, path_index = next, turn = ?self.turn, "Quarry moved");
        Applied::QuarryMoved { from, to }
    }

    /// Capture beats escape when both hold.
    fn terminal(&self) -> Option<Outcome> {
        if self.pursuer == self.quarry {
            info!(cell = %self.pursuer, "Quarry captured");
            Some(Outcome::Captured)
        } else if Some(self.quarry) == self.grid.exit() {
            info!(cell = %self.quarry, "Quarry escaped");
            Some(Outcome::Escaped)
        } else {
            None
        }
    }

    fn check_invariants(&self, event: PursuitEvent) {
        let result = match event {
            PursuitEvent::PursuerMove(_) => PursuerMoveContract::post(self),
            PursuitEvent::QuarryStep => QuarryStepContract::post(self),
        };
        if let Err(violations) = result {
            error!(?violations, "Pursuit invariants violated");
            debug_assert!(false, "Pursuit invariants violated: {:?}", violations);
        }
    }

    /// The grid this session plays on.
    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    /// The quarry's plan.
    pub fn plan(&self) -> &PlanResult {
        &self.plan
    }

    /// Current pursuer cell.
    pub fn pursuer(&self) -> Position {
        self.pursuer
    }

    /// Current quarry cell.
    pub fn quarry(&self) -> Position {
        self.quarry
    }

    /// Index of the quarry's current cell in the plan.
    pub fn path_index(&self) -> usize {
        self.path_index
    }

    /// Planned quarry steps not yet taken.
    pub fn remaining_steps(&self) -> usize {
        self.plan.moves().saturating_sub(self.path_index)
    }

    /// Current turn.
    pub fn turn(&self) -> TurnState {
        self.turn
    }

    /// The grid with the agents drawn at their current cells. A captured
    /// quarry is hidden under the pursuer.
    pub fn render(&self) -> String {
        self.grid
            .to_description()
            .grid
            .iter()
            .enumerate()
            .map(|(row, codes)| {
                codes
                    .iter()
                    .enumerate()
                    .map(|(col, &code)| {
                        let here = Position::new(col, row);
                        if here == self.pursuer {
                            'C'
                        } else if here == self.quarry {
                            'M'
                        } else if code == 'C' || code == 'M' {
                            '.'
                        } else {
                            code
                        }
                    })
                    .map(String::from)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(list: &[(usize, usize)]) -> Vec<Position> {
        list.iter().map(|&(c, r)| Position::new(c, r)).collect()
    }

    #[test]
    fn test_starts_awaiting_pursuer() {
        let grid = GridModel::from_rows(&["C.M"]).expect("valid grid");
        let session = PursuitSession::new(grid, PlanResult::no_path("test")).expect("session");
        assert_eq!(session.turn(), TurnState::AwaitingPursuerMove);
        assert_eq!(session.pursuer(), Position::new(0, 0));
        assert_eq!(session.quarry(), Position::new(2, 0));
    }

    #[test]
    fn test_illegal_plans_refused() {
        let grid = GridModel::from_rows(&["MX.D", "...C"]).expect("valid grid");

        let jumps_wall = PlanResult::BestEffortPath {
            path: cells(&[(0, 0), (3, 0)]),
        };
        let err = PursuitSession::new(grid.clone(), jumps_wall).unwrap_err();
        assert!(matches!(err, GridError::InvalidGrid { .. }));
        assert!(err.to_string().contains("not a single step"), "{err}");

        let through_wall = PlanResult::BestEffortPath {
            path: cells(&[(0, 0), (1, 0)]),
        };
        assert!(PursuitSession::new(grid.clone(), through_wall).is_err());

        let wrong_start = PlanResult::SafePath {
            path: cells(&[(2, 0), (3, 0)]),
            traps_avoided: 1,
        };
        assert!(PursuitSession::new(grid.clone(), wrong_start).is_err());

        let legal = PlanResult::BestEffortPath {
            path: cells(&[(0, 0), (0, 1), (1, 1)]),
        };
        assert!(PursuitSession::new(grid, legal).is_ok());
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let grid = GridModel::from_rows(&["CXM", "..."]).expect("valid grid");
        let mut session = PursuitSession::new(grid, PlanResult::no_path("test")).expect("session");

        for target in [Position::new(1, 0), Position::new(1, 1), Position::new(0, 2)] {
            let t = session.apply(PursuitEvent::PursuerMove(target));
            assert!(t.was_ignored(), "{target} should be ignored");
            assert_eq!(t.state, TurnState::AwaitingPursuerMove);
            assert_eq!(session.pursuer(), Position::new(0, 0));
        }
    }

    #[test]
    fn test_quarry_step_out_of_turn_is_ignored() {
        let grid = GridModel::from_rows(&["C..", "M.D"]).expect("valid grid");
        let plan = PlanResult::SafePath {
            path: cells(&[(0, 1), (1, 1), (2, 1)]),
            traps_avoided: 0,
        };
        let mut session = PursuitSession::new(grid, plan).expect("session");

        let t = session.apply(PursuitEvent::QuarryStep);
        assert_eq!(
            t.applied,
            Applied::Ignored(Rejection::OutOfTurn(TurnState::AwaitingPursuerMove))
        );
        assert_eq!(session.quarry(), Position::new(0, 1));

        session.apply(PursuitEvent::PursuerMove(Position::new(1, 0)));
        let t = session.apply(PursuitEvent::PursuerMove(Position::new(2, 0)));
        assert!(t.was_ignored());
        assert_eq!(t.state, TurnState::AwaitingQuarryStep);
    }

    #[test]
    fn test_quarry_walking_into_pursuer_is_capture() {
        let grid = GridModel::from_rows(&["M.C"]).expect("valid grid");
        let plan = PlanResult::BestEffortPath {
            path: cells(&[(0, 0), (1, 0), (2, 0)]),
        };
        let mut session = PursuitSession::new(grid, plan).expect("session");

        let report = session.play_turn(Position::new(1, 0));
        assert_eq!(report.pursuer.outcome(), None);
        let quarry = report.quarry.expect("quarry replied");
        assert_eq!(quarry.outcome(), Some(Outcome::Captured));
    }

    #[test]
    fn test_capture_on_exit_beats_escape() {
        let grid = GridModel::from_rows(&["M.D", "...", "..C"]).expect("valid grid");
        let plan = PlanResult::SafePath {
            path: cells(&[(0, 0), (1, 0), (2, 0)]),
            traps_avoided: 0,
        };
        let mut session = PursuitSession::new(grid, plan).expect("session");

        let report = session.play_turn(Position::new(2, 1));
        assert_eq!(report.state(), TurnState::AwaitingPursuerMove);
        assert_eq!(session.quarry(), Position::new(1, 0));

        // Pursuer parks on the exit, quarry walks into it
        let report = session.play_turn(Position::new(2, 0));
        assert_eq!(report.pursuer.state, TurnState::AwaitingQuarryStep);
        assert_eq!(report.state(), TurnState::GameOver(Outcome::Captured));
        assert_eq!(session.render(), ". . C\n. . .\n. . .");
    }

    #[test]
    fn test_step_pursuer_off_edge() {
        let grid = GridModel::from_rows(&["C.M"]).expect("valid grid");
        let mut session = PursuitSession::new(grid, PlanResult::no_path("test")).expect("session");
        let t = session.step_pursuer(Direction::Up);
        assert_eq!(t.applied, Applied::Ignored(Rejection::OffEdge(Direction::Up)));

        let t = session.step_pursuer(Direction::Right);
        assert_eq!(
            t.applied,
            Applied::PursuerMoved {
                from: Position::new(0, 0),
                to: Position::new(1, 0)
            }
        );
    }

    #[test]
    fn test_game_over_is_absorbing() {
        let grid = GridModel::from_rows(&["CM."]).expect("valid grid");
        let mut session = PursuitSession::new(grid, PlanResult::no_path("test")).expect("session");
        let t = session.apply(PursuitEvent::PursuerMove(Position::new(1, 0)));
        assert_eq!(t.outcome(), Some(Outcome::Captured));

        let t = session.apply(PursuitEvent::PursuerMove(Position::new(2, 0)));
        assert!(t.was_ignored());
        let t = session.apply(PursuitEvent::QuarryStep);
        assert!(t.was_ignored());
        assert_eq!(session.turn(), TurnState::GameOver(Outcome::Captured));
    }

    #[test]
    fn test_render_tracks_agents() {
        let grid = GridModel::from_rows(&["C..", "M.D"]).expect("valid grid");
        let plan = PlanResult::SafePath {
            path: cells(&[(0, 1), (1, 1), (2, 1)]),
            traps_avoided: 0,
        };
        let mut session = PursuitSession::new(grid, plan).expect("session");
        session.play_turn(Position::new(1, 0));
        assert_eq!(session.render(), ". C .\n. M D");
        assert_eq!(session.remaining_steps(), 1);
    }
}
