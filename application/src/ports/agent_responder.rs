//! Agent responder port
//!
//! Defines the interface for asking an agent to produce its next message.
//! Real implementations call an LLM provider with the agent's persona and the
//! conversation history; the scheduler treats the call as opaque work.

use async_trait::async_trait;
use conclave_domain::{AgentProfile, Conversation, Message};
use thiserror::Error;

/// Errors that can occur while an agent produces a response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Empty response from agent {0}")]
    EmptyResponse(String),
}

/// Produces the next message content for an agent.
#[async_trait]
pub trait AgentResponder: Send + Sync {
    /// Generate `agent`'s reply given everything said so far.
    async fn respond(
        &self,
        agent: &AgentProfile,
        conversation: &Conversation,
        history: &[Message],
    ) -> Result<String, ResponderError>;
}
