//! Owner of the single live play attempt.
//!
//! Planning is asynchronous, so a result may arrive after the player has
//! already edited the grid or started over. Each planning request carries a
//! [`PlanTicket`]; only the newest ticket is accepted and everything else is
//! discarded on arrival.

use crate::{GridError, GridModel, PlanRequest, PlanResult, PursuitSession, TurnState};
use tracing::{debug, info, instrument, warn};

/// Generation token for one planning request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanTicket {
    generation: u64,
}

impl PlanTicket {
    /// Monotonic generation number within the issuing slot.
    pub fn generation(self) -> u64 {
        self.generation
    }
}

impl std::fmt::Display for PlanTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "plan#{}", self.generation)
    }
}

/// Misuse of the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SlotError {
    /// A plan is already being computed for this slot.
    #[display("Planning already in flight ({})", _0)]
    PlanInFlight(PlanTicket),
}

impl std::error::Error for SlotError {}

/// What happened to a delivered plan.
#[derive(Debug)]
pub enum Completion<E> {
    /// A session started from the plan.
    Ready,
    /// The planner failed; no session was started and the grid is handed
    /// back so the player can retry.
    Failed {
        /// Transport failure.
        error: E,
        /// The grid that was being planned.
        grid: GridModel,
    },
    /// The ticket was stale; nothing changed.
    Discarded,
}

/// Holds at most one pending plan and at most one live session.
#[derive(Debug, Default)]
pub struct SessionSlot {
    generation: u64,
    pending: Option<(PlanTicket, GridModel)>,
    session: Option<PursuitSession>,
}

impl SessionSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket for planning `grid`. Any live session ends.
    #[instrument(skip(self, grid))]
    pub fn begin_planning(&mut self, grid: GridModel) -> Result<PlanRequest, SlotError> {
        if let Some((ticket, _)) = &self.pending {
            warn!(%ticket, "Planning requested while another plan is in flight");
            return Err(SlotError::PlanInFlight(*ticket));
        }

        self.generation += 1;
        let ticket = PlanTicket {
            generation: self.generation,
        };
        if self.session.take().is_some() {
            debug!("Ending live session for replanning");
        }
        self.pending = Some((ticket, grid.clone()));

        info!(%ticket, "Planning started");
        Ok(PlanRequest::new(ticket, grid))
    }

    /// Delivers a planner answer.
    ///
    /// Stale tickets are dropped. A success starts the session; a transport
    /// failure clears the pending plan and returns the grid.
    #[instrument(skip(self, result))]
    pub fn complete<E: std::fmt::Display>(
        &mut self,
        ticket: PlanTicket,
        result: Result<PlanResult, E>,
    ) -> Result<Completion<E>, GridError> {
        let grid = match self.pending.take() {
            Some((pending, grid)) if pending == ticket => grid,
            other => {
                debug!(%ticket, pending = ?other.as_ref().map(|(t, _)| *t), "Discarding stale plan");
                self.pending = other;
                return Ok(Completion::Discarded);
            }
        };

        match result {
            Ok(plan) => {
                self.start(grid, plan)?;
                Ok(Completion::Ready)
            }
            Err(error) => {
                warn!(%ticket, %error, "Planning failed");
                Ok(Completion::Failed { error, grid })
            }
        }
    }

    /// Starts a session directly from a known plan, replacing whatever was
    /// live or pending.
    pub fn start(&mut self, grid: GridModel, plan: PlanResult) -> Result<(), GridError> {
        if let Some((ticket, _)) = self.pending.take() {
            debug!(%ticket, "Superseding pending plan");
        }
        self.session = Some(PursuitSession::new(grid, plan)?);
        Ok(())
    }

    /// Drops any pending plan and live session. Results already in flight
    /// will be discarded when they arrive.
    #[instrument(skip(self))]
    pub fn abandon(&mut self) {
        let pending = self.pending.take().map(|(ticket, _)| ticket);
        let live = self.session.take().is_some();
        info!(?pending, live, "Slot abandoned");
    }

    /// The ticket currently awaited, if any.
    pub fn pending(&self) -> Option<PlanTicket> {
        self.pending.as_ref().map(|(ticket, _)| *ticket)
    }

    /// The live session.
    pub fn session(&self) -> Option<&PursuitSession> {
        self.session.as_ref()
    }

    /// The live session, for applying events.
    pub fn session_mut(&mut self) -> Option<&mut PursuitSession> {
        self.session.as_mut()
    }

    /// [`TurnState::Idle`] when no session is live.
    pub fn turn_state(&self) -> TurnState {
        self.session
            .as_ref()
            .map(PursuitSession::turn)
            .unwrap_or(TurnState::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn grid() -> GridModel {
        GridModel::from_rows(&["C..", "M.D"]).expect("valid grid")
    }

    fn plan() -> PlanResult {
        PlanResult::SafePath {
            path: vec![Position::new(0, 1), Position::new(1, 1), Position::new(2, 1)],
            traps_avoided: 0,
        }
    }

    #[test]
    fn test_idle_until_plan_arrives() {
        let mut slot = SessionSlot::new();
        assert_eq!(slot.turn_state(), TurnState::Idle);

        let request = slot.begin_planning(grid()).expect("ticket");
        assert_eq!(slot.turn_state(), TurnState::Idle);
        assert_eq!(slot.pending(), Some(*request.ticket()));

        let done = slot
            .complete::<String>(*request.ticket(), Ok(plan()))
            .expect("session");
        assert!(matches!(done, Completion::Ready));
        assert_eq!(slot.turn_state(), TurnState::AwaitingPursuerMove);
        assert_eq!(slot.pending(), None);
    }

    #[test]
    fn test_second_request_while_pending_is_refused() {
        let mut slot = SessionSlot::new();
        let first = slot.begin_planning(grid()).expect("ticket");
        assert_eq!(
            slot.begin_planning(grid()).unwrap_err(),
            SlotError::PlanInFlight(*first.ticket())
        );
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut slot = SessionSlot::new();
        let old = slot.begin_planning(grid()).expect("ticket");
        slot.abandon();
        let new = slot.begin_planning(grid()).expect("ticket");
        assert!(new.ticket().generation() > old.ticket().generation());

        let done = slot
            .complete::<String>(*old.ticket(), Ok(plan()))
            .expect("no grid error");
        assert!(matches!(done, Completion::Discarded));
        assert_eq!(slot.pending(), Some(*new.ticket()));
        assert!(slot.session().is_none());
    }

    #[test]
    fn test_failure_returns_grid_without_session() {
        let mut slot = SessionSlot::new();
        let request = slot.begin_planning(grid()).expect("ticket");
        let done = slot
            .complete(*request.ticket(), Err("connection refused".to_string()))
            .expect("no grid error");
        match done {
            Completion::Failed { error, grid: back } => {
                assert_eq!(error, "connection refused");
                assert_eq!(back, grid());
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(slot.turn_state(), TurnState::Idle);
        assert!(slot.begin_planning(grid()).is_ok());
    }

    #[test]
    fn test_replanning_ends_live_session() {
        let mut slot = SessionSlot::new();
        slot.start(grid(), plan()).expect("session");
        assert!(slot.session().is_some());
        slot.begin_planning(grid()).expect("ticket");
        assert!(slot.session().is_none());
        assert_eq!(slot.turn_state(), TurnState::Idle);
    }
}
