//! Conversation entities

use super::value_objects::{AgentId, ConversationId, MessageId};
use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A configured agent persona (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: AgentId,
    /// Display name used in transcripts
    pub name: String,
    /// Instructions describing how the agent behaves
    pub persona: String,
}

impl AgentProfile {
    pub fn new(
        id: impl Into<AgentId>,
        name: impl Into<String>,
        persona: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        if id.as_str().trim().is_empty() {
            return Err(DomainError::EmptyIdentifier("agent id"));
        }
        Ok(Self {
            id,
            name: name.into(),
            persona: persona.into(),
        })
    }
}

/// A conversation and its roster of participants (Entity)
///
/// Participant order is the order in which a round hands out turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    topic: String,
    participants: Vec<AgentProfile>,
}

impl Conversation {
    pub fn new(
        id: impl Into<ConversationId>,
        topic: impl Into<String>,
        participants: Vec<AgentProfile>,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        if id.as_str().trim().is_empty() {
            return Err(DomainError::EmptyIdentifier("conversation id"));
        }
        if participants.is_empty() {
            return Err(DomainError::NoParticipants);
        }

        let mut seen = HashSet::new();
        for agent in &participants {
            if !seen.insert(agent.id.clone()) {
                return Err(DomainError::DuplicateParticipant(agent.id.to_string()));
            }
        }

        Ok(Self {
            id,
            topic: topic.into(),
            participants,
        })
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn participants(&self) -> &[AgentProfile] {
        &self.participants
    }

    pub fn participant(&self, agent_id: &AgentId) -> Option<&AgentProfile> {
        self.participants.iter().find(|a| &a.id == agent_id)
    }
}

/// A message produced by one agent's turn (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub agent_id: AgentId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        conversation_id: ConversationId,
        agent_id: AgentId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            conversation_id,
            agent_id,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}
