//! Serializable summary of one conversation run

use conclave_application::RoundOutcome;
use conclave_domain::{AgentId, Conversation, ConversationId, Message};
use serde::Serialize;

/// A failed turn, tagged with the round it happened in (1-based)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTurn {
    pub round: usize,
    pub agent_id: AgentId,
    pub reason: String,
}

/// Everything produced by one conversation
#[derive(Debug, Clone, Serialize)]
pub struct ConversationReport {
    pub conversation_id: ConversationId,
    pub topic: String,
    pub participants: Vec<AgentId>,
    pub rounds: usize,
    pub messages: Vec<Message>,
    pub failures: Vec<FailedTurn>,
}

impl ConversationReport {
    pub fn new(conversation: &Conversation, rounds: Vec<RoundOutcome>) -> Self {
        let mut report = Self {
            conversation_id: conversation.id().clone(),
            topic: conversation.topic().to_string(),
            participants: conversation
                .participants()
                .iter()
                .map(|p| p.id.clone())
                .collect(),
            rounds: rounds.len(),
            messages: Vec::new(),
            failures: Vec::new(),
        };

        for (index, round) in rounds.into_iter().enumerate() {
            report.messages.extend(round.messages);
            report
                .failures
                .extend(round.failures.into_iter().map(|(agent_id, reason)| FailedTurn {
                    round: index + 1,
                    agent_id,
                    reason,
                }));
        }
        report
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
