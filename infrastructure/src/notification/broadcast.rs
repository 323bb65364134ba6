//! Per-conversation broadcast groups backed by `tokio::sync::broadcast`.

use conclave_application::NotificationSink;
use conclave_domain::{ConversationEvent, ConversationId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::trace;

/// Delivers every event of a conversation to all of its current subscribers.
///
/// A group is created on first subscription and dropped once an event finds
/// no receivers left. Events for conversations without subscribers are
/// discarded. Slow subscribers that fall more than `capacity` events behind
/// observe `RecvError::Lagged`.
pub struct BroadcastNotificationSink {
    groups: Mutex<HashMap<ConversationId, broadcast::Sender<ConversationEvent>>>,
    capacity: usize,
}

impl BroadcastNotificationSink {
    /// `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            groups: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    fn groups(&self) -> MutexGuard<'_, HashMap<ConversationId, broadcast::Sender<ConversationEvent>>> {
        self.groups.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Join the group of `conversation_id`.
    pub fn subscribe(&self, conversation_id: &ConversationId) -> broadcast::Receiver<ConversationEvent> {
        self.groups()
            .entry(conversation_id.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Number of conversations with a live group
    pub fn group_count(&self) -> usize {
        self.groups().len()
    }
}

impl NotificationSink for BroadcastNotificationSink {
    fn notify(&self, conversation_id: &ConversationId, event: ConversationEvent) {
        let mut groups = self.groups();
        let Some(sender) = groups.get(conversation_id) else {
            return;
        };

        let event_type = event.event_type();
        match sender.send(event) {
            Ok(receivers) => {
                trace!(conversation = %conversation_id, event_type, receivers, "Event broadcast");
            }
            Err(_) => {
                groups.remove(conversation_id);
                trace!(conversation = %conversation_id, "Broadcast group closed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::AgentId;

    fn failed(agent: &str) -> ConversationEvent {
        ConversationEvent::TurnFailed {
            agent_id: AgentId::new(agent),
            reason: "down".to_string(),
        }
    }

    #[tokio::test]
    async fn test_subscribers_receive_only_their_conversation() {
        let sink = BroadcastNotificationSink::new(8);
        let c1 = ConversationId::new("c1");
        let c2 = ConversationId::new("c2");
        let mut first = sink.subscribe(&c1);
        let mut second = sink.subscribe(&c1);
        let mut other = sink.subscribe(&c2);

        sink.notify(&c1, failed("a"));

        assert_eq!(first.recv().await.unwrap(), failed("a"));
        assert_eq!(second.recv().await.unwrap(), failed("a"));
        assert!(matches!(
            other.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn test_events_without_subscribers_are_dropped() {
        let sink = BroadcastNotificationSink::new(8);
        sink.notify(&ConversationId::new("c1"), failed("a"));
        assert_eq!(sink.group_count(), 0);
    }

    #[test]
    fn test_group_removed_after_last_subscriber_leaves() {
        let sink = BroadcastNotificationSink::new(8);
        let c1 = ConversationId::new("c1");
        let receiver = sink.subscribe(&c1);
        assert_eq!(sink.group_count(), 1);

        drop(receiver);
        sink.notify(&c1, failed("a"));
        assert_eq!(sink.group_count(), 0);
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags() {
        let sink = BroadcastNotificationSink::new(1);
        let c1 = ConversationId::new("c1");
        let mut receiver = sink.subscribe(&c1);

        sink.notify(&c1, failed("a"));
        sink.notify(&c1, failed("b"));

        assert!(matches!(
            receiver.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        assert_eq!(receiver.recv().await.unwrap(), failed("b"));
    }
}
