//! States, events, and transition reports for the pursuit machine.

use crate::{Direction, Position};
use serde::{Deserialize, Serialize};

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The pursuer and quarry share a cell.
    Captured,
    /// The quarry stands on the exit.
    Escaped,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Captured => write!(f, "The quarry was captured"),
            Outcome::Escaped => write!(f, "The quarry escaped"),
        }
    }
}

/// Whose turn it is. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnState {
    /// No session is live (planning, or nothing started yet).
    Idle,
    /// Waiting for the player to move the pursuer.
    AwaitingPursuerMove,
    /// Waiting for the quarry to take its next planned step.
    AwaitingQuarryStep,
    /// Terminal.
    GameOver(Outcome),
}

impl TurnState {
    /// The outcome, if the game is over.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            TurnState::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// True once the game has ended.
    pub fn is_over(self) -> bool {
        matches!(self, TurnState::GameOver(_))
    }
}

/// Input to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PursuitEvent {
    /// The player asks to move the pursuer to this cell.
    PursuerMove(Position),
    /// The quarry takes its next planned step.
    QuarryStep,
}

/// Why an event had no effect. Rejections are not errors; they are
/// reported for logging and UI hints only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Rejection {
    /// The event arrived in the wrong turn.
    #[display("Not accepted while {:?}", _0)]
    OutOfTurn(TurnState),
    /// The target lies outside the grid.
    #[display("{} is outside the grid", _0)]
    OutsideGrid(Position),
    /// The target is not one orthogonal step away.
    #[display("{} is not adjacent to {}", to, from)]
    NotAdjacent {
        /// Current pursuer cell.
        from: Position,
        /// Requested cell.
        to: Position,
    },
    /// The target is a wall or trap.
    #[display("{} is blocked", _0)]
    Blocked(Position),
    /// The pursuer stands on the grid edge and asked to step off it.
    #[display("Cannot move {} from the grid edge", _0)]
    OffEdge(Direction),
}

/// What an event actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Applied {
    /// Nothing changed.
    Ignored(Rejection),
    /// The pursuer moved.
    PursuerMoved {
        /// Previous cell.
        from: Position,
        /// New cell.
        to: Position,
    },
    /// The quarry advanced along its plan.
    QuarryMoved {
        /// Previous cell.
        from: Position,
        /// New cell.
        to: Position,
    },
    /// The quarry has no planned steps left and stayed put.
    QuarryStalled,
}

/// Result of [`PursuitSession::apply`](crate::PursuitSession::apply).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    /// Effect of the event.
    pub applied: Applied,
    /// State after the event.
    pub state: TurnState,
}

impl Transition {
    /// The terminal outcome, if this transition ended (or found) the game over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome()
    }

    /// True when the event changed nothing.
    pub fn was_ignored(&self) -> bool {
        matches!(self.applied, Applied::Ignored(_))
    }
}
