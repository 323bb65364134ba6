//! Run Round use case
//!
//! Gives every participant of a conversation one turn, in roster order.
//! All turns are enqueued up front, then awaited together; a failing agent
//! does not stop the agents after it.

use super::run_turn::{RunTurnError, RunTurnInput, RunTurnUseCase};
use crate::ports::agent_responder::AgentResponder;
use crate::ports::transcript_store::TranscriptStore;
use conclave_domain::{AgentId, Conversation, Message};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of one round
#[derive(Debug, Default)]
pub struct RoundOutcome {
    /// Messages produced, in turn order
    pub messages: Vec<Message>,
    /// Agents whose turn failed, with the reason
    pub failures: Vec<(AgentId, String)>,
}

impl RoundOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Use case for running a full round of a conversation
pub struct RunRoundUseCase<R: AgentResponder + 'static, S: TranscriptStore + 'static> {
    turns: RunTurnUseCase<R, S>,
}

impl<R: AgentResponder + 'static, S: TranscriptStore + 'static> RunRoundUseCase<R, S> {
    pub fn new(turns: RunTurnUseCase<R, S>) -> Self {
        Self { turns }
    }

    /// Run one round. Fails only if the turns could not be enqueued
    /// (scheduler shutting down); per-agent failures are collected.
    pub async fn execute(&self, conversation: Arc<Conversation>) -> Result<RoundOutcome, RunTurnError> {
        let mut pending = Vec::with_capacity(conversation.participants().len());
        for agent in conversation.participants() {
            let input = RunTurnInput::new(Arc::clone(&conversation), agent.id.clone());
            pending.push(self.turns.enqueue(input)?);
        }

        let mut outcome = RoundOutcome::default();
        for turn in pending {
            let agent_id = turn.agent_id().clone();
            match turn.await {
                Ok(message) => outcome.messages.push(message),
                Err(e) => {
                    let e = RunTurnError::from(e);
                    if matches!(e, RunTurnError::SchedulerClosed) {
                        return Err(e);
                    }
                    warn!(conversation = %conversation.id(), agent = %agent_id, "Turn failed: {}", e);
                    outcome.failures.push((agent_id, e.to_string()));
                }
            }
        }

        info!(
            conversation = %conversation.id(),
            messages = outcome.messages.len(),
            failures = outcome.failures.len(),
            "Round complete"
        );
        Ok(outcome)
    }
}
