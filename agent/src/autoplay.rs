use std::pin::pin;
use std::time::Duration;

use futures_channel::oneshot;
use futures_util::future::{Either, select};
use mineai_core::{Actor, GameController, GameSession, GameStatus, MoveOutcome, StatsSink};
use mineai_protocol::Move;

use crate::*;

/// Pause between two requests so that AI play can be followed on screen.
pub const DEFAULT_PACING: Duration = Duration::from_millis(1000);

/// Creates a linked stop handle and signal for one autoplay run.
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (sender, receiver) = oneshot::channel();
    (StopHandle(sender), StopSignal(receiver))
}

/// Cancels the autoplay run holding the matching [`StopSignal`]. Dropping it has the same effect.
#[derive(Debug)]
pub struct StopHandle(oneshot::Sender<()>);

impl StopHandle {
    pub fn stop(self) {
        // the run may already be over
        let _ = self.0.send(());
    }
}

#[derive(Debug)]
pub struct StopSignal(oneshot::Receiver<()>);

impl StopSignal {
    fn is_raised(&mut self) -> bool {
        !matches!(self.0.try_recv(), Ok(None))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AutoplayExit {
    /// The game reached a terminal status.
    Finished(GameStatus),
    Cancelled,
}

/// Drives a game with moves from a [`MoveAdvisor`] until it ends, fails or is stopped.
///
/// Each round sends the current board state, applies the reply in order through the controller
/// (stopping at the first move that ends the game) and then waits `pacing`. The stop signal is
/// raced against both the request and the pause; a reply that arrives once stop was raised is
/// discarded. Any advisor error ends the run and is returned, nothing is retried.
#[derive(Debug)]
pub struct Autoplay<'a, A> {
    advisor: &'a A,
    pacing: Duration,
}

impl<'a, A: MoveAdvisor> Autoplay<'a, A> {
    pub fn new(advisor: &'a A) -> Self {
        Self {
            advisor,
            pacing: DEFAULT_PACING,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub async fn run<S: StatsSink>(
        &self,
        controller: &mut GameController<S>,
        mut stop: StopSignal,
        mut observe: impl FnMut(&GameSession, Move, MoveOutcome),
    ) -> Result<AutoplayExit> {
        let mut round = 0u32;
        loop {
            let status = controller.session().status();
            if status.is_finished() {
                return Ok(AutoplayExit::Finished(status));
            }

            round += 1;
            let state = controller.board_state();
            let request = pin!(self.advisor.suggest_moves(&state));
            let moves = match select(request, &mut stop.0).await {
                Either::Left((reply, _)) => reply,
                Either::Right(_) => {
                    log::info!("autoplay stopped while waiting for round {round}");
                    return Ok(AutoplayExit::Cancelled);
                }
            };
            if stop.is_raised() {
                log::info!("autoplay stopped, discarding reply for round {round}");
                return Ok(AutoplayExit::Cancelled);
            }

            let moves = moves.inspect_err(|err| log::warn!("autoplay round {round} failed: {err}"))?;
            if moves.is_empty() {
                return Err(AgentError::NoAiMove("empty move list".into()));
            }

            for mv in moves {
                let outcome = controller.apply(Actor::Ai, mv);
                observe(controller.session(), mv, outcome);
                if outcome.is_terminal() {
                    break;
                }
            }

            if controller.session().status().is_finished() {
                continue;
            }

            let pause = pin!(tokio::time::sleep(self.pacing));
            if let Either::Right(_) = select(pause, &mut stop.0).await {
                log::info!("autoplay stopped after round {round}");
                return Ok(AutoplayExit::Cancelled);
            }
        }
    }
}
