//! Process-wide turn scheduler.
//!
//! [`TurnScheduler`] maps each conversation to its own [`TurnQueue`] and
//! guarantees that, within one conversation, turns run one at a time in the
//! order they were enqueued. Different conversations never wait on each
//! other.
//!
//! # Locking
//!
//! | Lock | Guards | Held during |
//! |------|--------|-------------|
//! | registry | `queues` map | lookup-or-create + `on_turn_queued` + push, eviction, shutdown |
//! | queue | `pending`, `draining` | a few pointer moves |
//!
//! Lock order is always registry then queue. Neither lock is ever held while
//! an operation runs; the one-turn-at-a-time guarantee comes from each
//! active queue having exactly one drain task.

use super::error::TurnError;
use super::executor::TurnExecutor;
use super::queue::TurnQueue;
use super::request::{TurnHandle, TurnRequest};
use crate::config::SchedulerConfig;
use crate::ports::progress::{NoTurnProgress, TurnProgressNotifier};
use conclave_domain::{AgentId, ConversationId};
use futures::FutureExt;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

type Registry = HashMap<ConversationId, Arc<TurnQueue>>;

struct SchedulerInner {
    queues: Mutex<Registry>,
    executor: TurnExecutor,
    progress: Arc<dyn TurnProgressNotifier>,
    shutdown: CancellationToken,
    drains: TaskTracker,
}

impl SchedulerInner {
    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove `queue` from the registry if it is still the registered one.
    fn evict(registry: &mut Registry, queue: &Arc<TurnQueue>) {
        let id = queue.conversation_id();
        if registry.get(id).is_some_and(|q| Arc::ptr_eq(q, queue)) {
            registry.remove(id);
            debug!(conversation = %id, "Turn queue evicted");
        }
    }
}

/// Serializes agent turns per conversation.
///
/// Cheap to clone; clones share the same registry. Must be used from within
/// a Tokio runtime, since draining a queue spawns a task.
#[derive(Clone)]
pub struct TurnScheduler {
    inner: Arc<SchedulerInner>,
}

impl TurnScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_progress(config, Arc::new(NoTurnProgress))
    }

    pub fn with_progress(config: SchedulerConfig, progress: Arc<dyn TurnProgressNotifier>) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                queues: Mutex::new(HashMap::new()),
                executor: TurnExecutor::new(config.turn_timeout),
                progress,
                shutdown: CancellationToken::new(),
                drains: TaskTracker::new(),
            }),
        }
    }

    /// Submit a turn and wait for its result.
    ///
    /// Waits (never fails) while earlier turns of the same conversation run.
    /// Fails with the operation's own error, or with
    /// [`TurnError::SchedulerClosed`] if the scheduler is shutting down.
    pub async fn submit<T, E, F, Fut>(
        &self,
        conversation_id: ConversationId,
        agent_id: AgentId,
        operation: F,
    ) -> Result<T, TurnError<E>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        self.enqueue(conversation_id, agent_id, operation)?.await
    }

    /// Enqueue a turn without waiting for it.
    ///
    /// When this returns `Ok`, the turn holds its place in the conversation's
    /// queue: any turn enqueued afterwards for the same conversation runs
    /// after it.
    pub fn enqueue<T, E, F, Fut>(
        &self,
        conversation_id: ConversationId,
        agent_id: AgentId,
        operation: F,
    ) -> Result<TurnHandle<T, E>, TurnError<E>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let (request, handle) = TurnRequest::new(conversation_id.clone(), agent_id.clone(), operation);

        let mut registry = self.inner.registry();
        if self.inner.shutdown.is_cancelled() {
            return Err(TurnError::SchedulerClosed);
        }

        let queue = registry
            .entry(conversation_id.clone())
            .or_insert_with(|| {
                debug!(conversation = %conversation_id, "Turn queue created");
                Arc::new(TurnQueue::new(conversation_id.clone()))
            })
            .clone();

        // Reported before the push so it always precedes `on_turn_started`.
        // The drain may pop a finished head meanwhile, so the position can
        // overstate by one.
        let position = queue.len();
        self.inner
            .progress
            .on_turn_queued(&conversation_id, &agent_id, position);

        let admission = queue.push(request);
        if admission.start_drain {
            // Spawned under the registry lock so shutdown cannot miss it.
            let inner = Arc::clone(&self.inner);
            self.inner.drains.spawn(drain(inner, queue));
        }
        drop(registry);

        debug!(
            conversation = %conversation_id,
            agent = %agent_id,
            position = admission.position,
            "Turn enqueued"
        );
        Ok(handle)
    }

    /// Number of conversations that currently have a queue.
    pub fn conversation_count(&self) -> usize {
        self.inner.registry().len()
    }

    /// Turns waiting or running for `conversation_id` (0 if it has no queue).
    pub fn pending_turns(&self, conversation_id: &ConversationId) -> usize {
        let queue = self.inner.registry().get(conversation_id).cloned();
        queue.map_or(0, |q| q.len())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Stop accepting turns and resolve every outstanding one.
    ///
    /// Running turns are interrupted; they and every queued turn resolve
    /// with [`TurnError::SchedulerClosed`], including turns of a queue whose
    /// drain task died. Returns once all drain tasks have exited. Calling it
    /// again is harmless.
    pub async fn shutdown(&self) {
        let abandoned: Vec<_> = {
            let mut registry = self.inner.registry();
            self.inner.shutdown.cancel();
            registry.drain().flat_map(|(_, queue)| queue.close()).collect()
        };
        if !abandoned.is_empty() {
            debug!(dropped = abandoned.len(), "Outstanding turns released by shutdown");
        }
        drop(abandoned);

        self.inner.drains.close();
        self.inner.drains.wait().await;
        info!("Turn scheduler shut down");
    }
}

impl std::fmt::Debug for TurnScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnScheduler")
            .field("conversations", &self.conversation_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Drain loop for one queue: run the head, pop it, repeat until empty.
async fn drain(inner: Arc<SchedulerInner>, queue: Arc<TurnQueue>) {
    let conversation_id = queue.conversation_id().clone();
    debug!(conversation = %conversation_id, "Drain started");

    loop {
        if let Some((agent_id, job)) = queue.head_job() {
            // The operation itself is already guarded; this catches panics
            // from the surrounding bookkeeping (progress callbacks, error
            // formatting). The head's caller then observes `SchedulerClosed`.
            let executed = AssertUnwindSafe(inner.executor.execute(
                &conversation_id,
                &agent_id,
                job,
                &inner.shutdown,
                inner.progress.as_ref(),
            ))
            .catch_unwind()
            .await;

            match executed {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(_) => {
                    error!(
                        conversation = %conversation_id,
                        agent = %agent_id,
                        "Turn bookkeeping panicked; moving to the next turn"
                    );
                }
            }
            if queue.complete_head() {
                continue;
            }
        }

        // Re-check under the registry lock: submitters push while holding
        // it, so an empty queue here is safe to evict.
        let mut registry = inner.registry();
        if queue.try_settle() {
            SchedulerInner::evict(&mut registry, &queue);
            debug!(conversation = %conversation_id, "Drain finished");
            return;
        }
    }

    let abandoned = {
        let mut registry = inner.registry();
        SchedulerInner::evict(&mut registry, &queue);
        queue.close()
    };
    debug!(
        conversation = %conversation_id,
        dropped = abandoned.len(),
        "Drain stopped by shutdown"
    );
}
