//! Single-turn execution.
//!
//! [`TurnExecutor`] runs exactly one job per call. Failures, panics and
//! timeouts of the caller's operation end up in that caller's result slot;
//! none of them reach the drain loop. Only scheduler shutdown interrupts a
//! running turn.

use super::error::TurnError;
use super::request::{ExecutedTurn, TurnJob, TurnOutcome};
use crate::ports::progress::TurnProgressNotifier;
use conclave_domain::{AgentId, ConversationId};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Run an operation, converting its failure modes into [`TurnError`].
pub(crate) async fn run_guarded<T, E, Fut>(
    operation: Fut,
    timeout: Option<Duration>,
) -> Result<T, TurnError<E>>
where
    Fut: Future<Output = Result<T, E>>,
{
    let guarded = AssertUnwindSafe(operation).catch_unwind();

    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, guarded).await {
            Ok(result) => result,
            Err(_) => return Err(TurnError::TimedOut(limit)),
        },
        None => guarded.await,
    };

    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(TurnError::Operation(e)),
        Err(_) => Err(TurnError::Panicked),
    }
}

/// Executes turns one at a time on behalf of a drain loop.
#[derive(Debug, Clone, Default)]
pub(crate) struct TurnExecutor {
    turn_timeout: Option<Duration>,
}

impl TurnExecutor {
    pub(crate) fn new(turn_timeout: Option<Duration>) -> Self {
        Self { turn_timeout }
    }

    /// Run one job to completion.
    ///
    /// Returns `None` if `shutdown` fired first; the job is dropped and its
    /// caller observes `SchedulerClosed`.
    pub(crate) async fn execute(
        &self,
        conversation_id: &ConversationId,
        agent_id: &AgentId,
        job: TurnJob,
        shutdown: &CancellationToken,
        progress: &dyn TurnProgressNotifier,
    ) -> Option<ExecutedTurn> {
        let started = Instant::now();
        progress.on_turn_started(conversation_id, agent_id);
        debug!(conversation = %conversation_id, agent = %agent_id, "Turn started");

        let executed = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                warn!(
                    conversation = %conversation_id,
                    agent = %agent_id,
                    "Turn interrupted by scheduler shutdown"
                );
                progress.on_turn_finished(conversation_id, agent_id, false);
                return None;
            }
            executed = job(self.turn_timeout) => executed,
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &executed.outcome {
            TurnOutcome::Completed => {
                info!(conversation = %conversation_id, agent = %agent_id, elapsed_ms, "Turn completed");
            }
            TurnOutcome::Failed(reason) => {
                warn!(conversation = %conversation_id, agent = %agent_id, elapsed_ms, "Turn failed: {}", reason);
            }
        }
        if !executed.delivered {
            debug!(conversation = %conversation_id, agent = %agent_id, "Caller stopped waiting; result dropped");
        }

        progress.on_turn_finished(conversation_id, agent_id, executed.outcome.is_success());
        Some(executed)
    }
}
