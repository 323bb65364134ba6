//! Fan-out notification sink.

use conclave_application::NotificationSink;
use conclave_domain::{ConversationEvent, ConversationId};
use std::sync::Arc;

/// Forwards every event to each inner sink, in registration order.
#[derive(Default, Clone)]
pub struct FanoutNotificationSink {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl FanoutNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl NotificationSink for FanoutNotificationSink {
    fn notify(&self, conversation_id: &ConversationId, event: ConversationEvent) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.notify(conversation_id, event.clone());
            }
            last.notify(conversation_id, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::AgentId;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<String>>);

    impl NotificationSink for Collect {
        fn notify(&self, conversation_id: &ConversationId, event: ConversationEvent) {
            self.0
                .lock()
                .unwrap()
                .push(format!("{}:{}", conversation_id, event.event_type()));
        }
    }

    #[test]
    fn test_fanout_reaches_every_sink() {
        let a = Arc::new(Collect::default());
        let b = Arc::new(Collect::default());
        let fanout = FanoutNotificationSink::new()
            .with_sink(a.clone())
            .with_sink(b.clone());
        assert_eq!(fanout.len(), 2);

        fanout.notify(
            &ConversationId::new("c1"),
            ConversationEvent::TurnFailed {
                agent_id: AgentId::new("x"),
                reason: "r".to_string(),
            },
        );

        assert_eq!(*a.0.lock().unwrap(), vec!["c1:turn_failed"]);
        assert_eq!(*b.0.lock().unwrap(), vec!["c1:turn_failed"]);
    }

    #[test]
    fn test_empty_fanout_is_noop() {
        let fanout = FanoutNotificationSink::new();
        assert!(fanout.is_empty());
        fanout.notify(
            &ConversationId::new("c1"),
            ConversationEvent::TurnFailed {
                agent_id: AgentId::new("x"),
                reason: "r".to_string(),
            },
        );
    }
}
