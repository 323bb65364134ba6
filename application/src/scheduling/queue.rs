//! Per-conversation FIFO of pending turns.
//!
//! The front of `pending` is the turn currently executing. It is popped only
//! after its result slot has been filled, so `len()` counts the running turn.
//! All state is guarded by the queue's own mutex, which is never held across
//! an `.await`.

use super::request::{TurnJob, TurnRequest};
use conclave_domain::{AgentId, ConversationId};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct QueueState {
    pending: VecDeque<TurnRequest>,
    draining: bool,
}

/// Outcome of pushing a request onto a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Admission {
    /// Zero-based position in the queue; 0 means it runs next.
    pub(crate) position: usize,
    /// True if the queue was idle and the caller must start a drain.
    pub(crate) start_drain: bool,
}

pub(crate) struct TurnQueue {
    conversation_id: ConversationId,
    state: Mutex<QueueState>,
}

impl TurnQueue {
    pub(crate) fn new(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            state: Mutex::new(QueueState::default()),
        }
    }

    pub(crate) fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a request. Marks the queue draining if it was idle.
    pub(crate) fn push(&self, request: TurnRequest) -> Admission {
        let mut state = self.lock();
        state.pending.push_back(request);

        let start_drain = !state.draining;
        state.draining = true;

        Admission {
            position: state.pending.len() - 1,
            start_drain,
        }
    }

    /// Take the job of the head request, leaving the request in place.
    ///
    /// Returns `None` when the queue is empty.
    pub(crate) fn head_job(&self) -> Option<(AgentId, TurnJob)> {
        let mut state = self.lock();
        let head = state.pending.front_mut()?;
        let job = head.take_job()?;
        Some((head.agent_id().clone(), job))
    }

    /// Pop the finished head. Returns true if more requests are waiting.
    pub(crate) fn complete_head(&self) -> bool {
        let mut state = self.lock();
        state.pending.pop_front();
        !state.pending.is_empty()
    }

    /// Leave the draining state if nothing is pending.
    ///
    /// Must be called with the registry lock held so no submitter can push
    /// between this check and eviction. Returns true if the queue is now idle.
    pub(crate) fn try_settle(&self) -> bool {
        let mut state = self.lock();
        if state.pending.is_empty() {
            state.draining = false;
            true
        } else {
            false
        }
    }

    /// Remove every request, executing or not. Dropping them resolves their
    /// handles with `SchedulerClosed`.
    pub(crate) fn close(&self) -> Vec<TurnRequest> {
        let mut state = self.lock();
        state.draining = false;
        state.pending.drain(..).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().pending.len()
    }

    pub(crate) fn is_draining(&self) -> bool {
        self.lock().draining
    }
}
