//! The pursuit turn machine.
//!
//! A [`PursuitSession`] alternates strictly between the player's pursuer and
//! the plan-driven quarry. Each event is guarded by a [`Contract`]; illegal
//! events are ignored and reported, never applied.

mod contracts;
mod invariants;
mod session;
mod state;

pub use contracts::{
    AdjacentStep, Contract, LegalPursuerMove, OpenCell, PursuerMoveContract, PursuersTurn,
    QuarryStepContract, WithinGrid,
};
pub use invariants::{
    InvariantSet, InvariantViolation, PlanIndexInBounds, PursuerOnOpenCell, PursuitInvariants,
    QuarryOnPlan, SessionInvariant,
};
pub use session::{PursuitSession, TurnReport};
pub use state::{Applied, Outcome, PursuitEvent, Rejection, Transition, TurnState};
