//! Port for handing conversation events to the real-time delivery layer.
//!
//! The scheduler does not deliver anything itself: a finished turn hands its
//! message to a [`NotificationSink`], and whatever implements the sink
//! broadcasts it to live subscribers.

use conclave_domain::{ConversationEvent, ConversationId};

/// Receives events to broadcast to a conversation's subscribers.
///
/// The `notify` method is intentionally synchronous and non-fallible so a
/// slow or broken subscriber can never fail or stall a turn.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, conversation_id: &ConversationId, event: ConversationEvent);
}

/// No-op implementation for tests and when nobody is listening.
pub struct NoNotifications;

impl NotificationSink for NoNotifications {
    fn notify(&self, _conversation_id: &ConversationId, _event: ConversationEvent) {}
}
