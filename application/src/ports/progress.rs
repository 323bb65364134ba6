//! Turn progress notification port
//!
//! Defines the interface for reporting turn lifecycle events while the
//! scheduler works through conversation queues.

use conclave_domain::{AgentId, ConversationId};

/// Callback for turn lifecycle updates
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.). Calls arrive from
/// drain tasks on any worker thread, so implementations must be cheap and
/// must not block.
pub trait TurnProgressNotifier: Send + Sync {
    /// Called when a turn is being enqueued at `position` (0 = runs next),
    /// always before `on_turn_started` for the same turn. The position can
    /// overstate by one if the running turn finishes concurrently.
    fn on_turn_queued(&self, conversation_id: &ConversationId, agent_id: &AgentId, position: usize);

    /// Called when a turn starts executing
    fn on_turn_started(&self, _conversation_id: &ConversationId, _agent_id: &AgentId) {}

    /// Called when a turn has finished, successfully or not
    fn on_turn_finished(&self, conversation_id: &ConversationId, agent_id: &AgentId, success: bool);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoTurnProgress;

impl TurnProgressNotifier for NoTurnProgress {
    fn on_turn_queued(&self, _conversation_id: &ConversationId, _agent_id: &AgentId, _position: usize) {}
    fn on_turn_finished(&self, _conversation_id: &ConversationId, _agent_id: &AgentId, _success: bool) {}
}
