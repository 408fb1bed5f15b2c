//! Line-based terminal driver for one pursuit game.

use crate::{PlannerClient, spawn_plan};
use anyhow::{Context, Result};
use std::sync::Arc;
use strictly_pursuit::{
    Applied, Completion, Direction, GridModel, Outcome, PursuitEvent, ResultParser, SessionSlot,
    TurnState,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

const HELP: &str = "Move with w/a/s/d (or up/down/left/right), r to replan, q to quit.";

async fn say<W: AsyncWrite + Unpin>(out: &mut W, text: impl AsRef<str>) -> Result<()> {
    out.write_all(text.as_ref().as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(())
}

/// Plans the quarry's route for `grid` and plays the game on `input`/`output`.
///
/// Returns the outcome, or `None` if the player quit or input ran out.
#[instrument(skip_all, fields(planner = client.name()))]
pub async fn run_play<R, W>(
    grid: GridModel,
    client: Arc<dyn PlannerClient>,
    parser: Arc<ResultParser>,
    input: R,
    output: &mut W,
) -> Result<Option<Outcome>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut slot = SessionSlot::new();
    let mut lines = input.lines();

    'attempt: loop {
        let request = slot.begin_planning(grid.clone())?;
        say(output, "Planning the quarry's route...").await?;
        let response = spawn_plan(client.clone(), parser.clone(), request)
            .await
            .context("Planning task failed")?;

        match slot.complete(response.ticket, response.outcome)? {
            Completion::Ready => {}
            Completion::Failed { error, .. } => {
                say(output, format!("Planner unavailable: {}", error.message)).await?;
                say(output, "Type r to retry, anything else to quit.").await?;
                match lines.next_line().await? {
                    Some(line) if line.trim() == "r" => continue 'attempt,
                    _ => return Ok(None),
                }
            }
            Completion::Discarded => {
                warn!("Plan arrived for a superseded request");
                continue 'attempt;
            }
        }

        let session = slot.session_mut().context("Session missing after plan")?;
        say(output, session.plan().to_string()).await?;
        say(output, session.render()).await?;
        say(output, HELP).await?;

        loop {
            let Some(line) = lines.next_line().await? else {
                debug!("Input closed");
                return Ok(None);
            };
            let command = line.trim();
            match command {
                "" => continue,
                "q" | "quit" => return Ok(None),
                "r" | "replan" => {
                    info!("Replanning on request");
                    continue 'attempt;
                }
                _ => {}
            }

            let Some(direction) = Direction::from_key(command) else {
                say(output, format!("Unknown command {:?}. {}", command, HELP)).await?;
                continue;
            };

            let moved = session.step_pursuer(direction);
            if let Applied::Ignored(rejection) = moved.applied {
                say(output, rejection.to_string()).await?;
                continue;
            }
            if moved.state == TurnState::AwaitingQuarryStep {
                let step = session.apply(PursuitEvent::QuarryStep);
                if step.applied == Applied::QuarryStalled {
                    debug!("Quarry holds position");
                }
            }

            say(output, session.render()).await?;
            if let Some(outcome) = session.turn().outcome() {
                say(output, outcome.to_string()).await?;
                return Ok(Some(outcome));
            }
        }
    }
}
