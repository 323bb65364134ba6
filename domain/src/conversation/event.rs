//! Events broadcast to subscribers of a conversation.

use super::entities::Message;
use super::value_objects::AgentId;
use serde::{Deserialize, Serialize};

/// A change in a conversation that live subscribers should hear about.
///
/// Serialized with a `type` tag so the wire shape matches what real-time
/// clients expect (`new_message`, `turn_failed`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// An agent finished its turn and the message was persisted.
    NewMessage { message: Message },
    /// An agent's turn failed; the conversation carries on.
    TurnFailed { agent_id: AgentId, reason: String },
}

impl ConversationEvent {
    /// Event type identifier, identical to the serialized `type` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            ConversationEvent::NewMessage { .. } => "new_message",
            ConversationEvent::TurnFailed { .. } => "turn_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::value_objects::ConversationId;

    #[test]
    fn test_new_message_serializes_with_type_tag() {
        let message = Message::new(ConversationId::new("c1"), AgentId::new("a"), "hello");
        let event = ConversationEvent::NewMessage { message };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "new_message");
        assert_eq!(value["message"]["content"], "hello");
        assert_eq!(value["message"]["conversation_id"], "c1");
    }

    #[test]
    fn test_event_type_matches_tag() {
        let event = ConversationEvent::TurnFailed {
            agent_id: AgentId::new("a"),
            reason: "boom".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], event.event_type());
    }
}
