//! In-memory transcript store.

use async_trait::async_trait;
use conclave_application::{TranscriptError, TranscriptStore};
use conclave_domain::{ConversationId, Message};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local transcript store. Messages are kept in append order.
#[derive(Default)]
pub struct InMemoryTranscriptStore {
    transcripts: RwLock<HashMap<ConversationId, Vec<Message>>>,
}

impl InMemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conversations that have at least one message, sorted by id
    pub async fn conversations(&self) -> Vec<ConversationId> {
        let mut ids: Vec<_> = self.transcripts.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl TranscriptStore for InMemoryTranscriptStore {
    async fn history(&self, conversation_id: &ConversationId) -> Result<Vec<Message>, TranscriptError> {
        Ok(self
            .transcripts
            .read()
            .await
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(&self, message: Message) -> Result<(), TranscriptError> {
        self.transcripts
            .write()
            .await
            .entry(message.conversation_id.clone())
            .or_default()
            .push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::AgentId;

    #[tokio::test]
    async fn test_append_and_history() {
        let store = InMemoryTranscriptStore::new();
        let c1 = ConversationId::new("c1");
        let c2 = ConversationId::new("c2");

        store
            .append(Message::new(c1.clone(), AgentId::new("a"), "first"))
            .await
            .unwrap();
        store
            .append(Message::new(c1.clone(), AgentId::new("b"), "second"))
            .await
            .unwrap();

        let history = store.history(&c1).await.unwrap();
        let contents: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert!(store.history(&c2).await.unwrap().is_empty());
        assert_eq!(store.conversations().await, vec![c1]);
    }
}
