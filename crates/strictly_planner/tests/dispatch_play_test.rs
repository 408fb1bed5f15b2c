//! Tests for background planning, stale-result handling, and the terminal loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use strictly_planner::{PlannerClient, TransportError, run_play, spawn_plan};
use strictly_pursuit::{
    Completion, GridModel, Outcome, ResultParser, SessionSlot, TurnState,
};

/// Planner answering with canned output after an optional delay.
struct CannedPlanner {
    output: Option<String>,
    delay: Duration,
    calls: AtomicUsize,
}

impl CannedPlanner {
    fn answering(output: &str) -> Self {
        Self {
            output: Some(output.to_string()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    fn unreachable() -> Self {
        Self {
            output: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl PlannerClient for CannedPlanner {
    async fn solve(&self, _grid: &GridModel) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.output
            .clone()
            .ok_or_else(|| TransportError::new("connection refused"))
    }

    fn name(&self) -> &str {
        "canned"
    }
}

fn corridor() -> GridModel {
    GridModel::from_rows(&["C.M"]).unwrap()
}

#[tokio::test]
async fn test_spawned_plan_starts_session() {
    let mut slot = SessionSlot::new();
    let client = Arc::new(CannedPlanner::answering(r#"{"success": false, "path": [[0,2]]}"#));
    let request = slot.begin_planning(corridor()).unwrap();

    let response = spawn_plan(client, Arc::new(ResultParser::new()), request)
        .await
        .unwrap();
    let done = slot.complete(response.ticket, response.outcome).unwrap();
    assert!(matches!(done, Completion::Ready));
    assert_eq!(slot.turn_state(), TurnState::AwaitingPursuerMove);
}

#[tokio::test]
async fn test_late_plan_for_abandoned_attempt_is_dropped() {
    let mut slot = SessionSlot::new();
    let slow = Arc::new(CannedPlanner {
        output: Some("[SUCCESS]\nPath: (0, 2)\n".to_string()),
        delay: Duration::from_millis(50),
        calls: AtomicUsize::new(0),
    });
    let parser = Arc::new(ResultParser::new());

    let first = slot.begin_planning(corridor()).unwrap();
    let stale = spawn_plan(slow.clone(), parser.clone(), first);

    // Player gives up and starts over before the first answer lands
    slot.abandon();
    let second = slot.begin_planning(corridor()).unwrap();
    let fresh = spawn_plan(slow.clone(), parser, second);

    let stale = stale.await.unwrap();
    assert!(matches!(
        slot.complete(stale.ticket, stale.outcome).unwrap(),
        Completion::Discarded
    ));
    assert_eq!(slot.turn_state(), TurnState::Idle);

    let fresh = fresh.await.unwrap();
    assert!(matches!(
        slot.complete(fresh.ticket, fresh.outcome).unwrap(),
        Completion::Ready
    ));
    assert_eq!(slow.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_transport_failure_leaves_slot_idle() {
    let mut slot = SessionSlot::new();
    let request = slot.begin_planning(corridor()).unwrap();
    let response = spawn_plan(
        Arc::new(CannedPlanner::unreachable()),
        Arc::new(ResultParser::new()),
        request,
    )
    .await
    .unwrap();

    match slot.complete(response.ticket, response.outcome).unwrap() {
        Completion::Failed { error, grid } => {
            assert!(error.message.contains("connection refused"));
            assert_eq!(grid, corridor());
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(slot.turn_state(), TurnState::Idle);
}

#[tokio::test]
async fn test_terminal_game_to_capture() {
    let client = Arc::new(CannedPlanner::answering("no dialect here"));
    let input: &[u8] = b"w\nbogus\nd\nd\n";
    let mut output = Vec::new();

    let outcome = run_play(
        corridor(),
        client,
        Arc::new(ResultParser::new()),
        tokio::io::BufReader::new(input),
        &mut output,
    )
    .await
    .unwrap();

    assert_eq!(outcome, Some(Outcome::Captured));
    let transcript = String::from_utf8(output).unwrap();
    assert!(transcript.contains("No path: solver reported no usable result"));
    assert!(transcript.contains("Cannot move up from the grid edge"));
    assert!(transcript.contains("Unknown command"));
    assert!(transcript.contains(". C M"));
    assert!(transcript.trim_end().ends_with("The quarry was captured"));
}

#[tokio::test]
async fn test_terminal_game_retries_after_transport_failure() {
    let client = Arc::new(CannedPlanner::unreachable());
    let input: &[u8] = b"r\nq\n";
    let mut output = Vec::new();

    let outcome = run_play(
        corridor(),
        client.clone(),
        Arc::new(ResultParser::new()),
        tokio::io::BufReader::new(input),
        &mut output,
    )
    .await
    .unwrap();

    assert_eq!(outcome, None);
    assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    let transcript = String::from_utf8(output).unwrap();
    assert_eq!(transcript.matches("Planner unavailable").count(), 2);
}
