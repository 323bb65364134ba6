//! Transcript persistence port
//!
//! Stores the ordered messages of each conversation. Because turns of one
//! conversation are serialized, a turn always sees every message produced by
//! the turns enqueued before it.

use async_trait::async_trait;
use conclave_domain::{ConversationId, Message};
use thiserror::Error;

/// Errors raised by transcript storage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("Storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// All messages of a conversation, oldest first.
    async fn history(&self, conversation_id: &ConversationId) -> Result<Vec<Message>, TranscriptError>;

    /// Append a message to its conversation.
    async fn append(&self, message: Message) -> Result<(), TranscriptError>;
}
