//! Turn requests and the handle a caller awaits.
//!
//! A [`TurnRequest`] owns the caller's operation and the sending half of a
//! one-shot result slot, erased into a single [`TurnJob`] so that queues are
//! not generic over the operation's output. The caller keeps the receiving
//! half inside a [`TurnHandle`].

use super::error::TurnError;
use super::executor::run_guarded;
use conclave_domain::{AgentId, ConversationId};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;

/// How a single turn ended, as seen by the drain loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Completed,
    Failed(String),
}

impl TurnOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TurnOutcome::Completed)
    }
}

/// Result of running a [`TurnJob`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExecutedTurn {
    pub(crate) outcome: TurnOutcome,
    /// False when the caller stopped waiting before the slot was filled.
    pub(crate) delivered: bool,
}

/// Type-erased unit of work: runs the operation under the given timeout and
/// fills the result slot.
pub(crate) type TurnJob = Box<dyn FnOnce(Option<Duration>) -> BoxFuture<'static, ExecutedTurn> + Send>;

pub(crate) struct TurnRequest {
    agent_id: AgentId,
    job: Option<TurnJob>,
}

impl TurnRequest {
    /// Build a request and the handle its caller will await.
    pub(crate) fn new<T, E, F, Fut>(
        conversation_id: ConversationId,
        agent_id: AgentId,
        operation: F,
    ) -> (Self, TurnHandle<T, E>)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let (slot, receiver) = oneshot::channel();

        let job: TurnJob = Box::new(move |timeout: Option<Duration>| {
            async move {
                let result = run_guarded(async move { operation().await }, timeout).await;
                let outcome = match &result {
                    Ok(_) => TurnOutcome::Completed,
                    Err(e) => TurnOutcome::Failed(e.to_string()),
                };
                let delivered = slot.send(result).is_ok();
                ExecutedTurn { outcome, delivered }
            }
            .boxed()
        });

        let handle = TurnHandle {
            conversation_id,
            agent_id: agent_id.clone(),
            receiver,
        };

        (
            Self {
                agent_id,
                job: Some(job),
            },
            handle,
        )
    }

    pub(crate) fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    /// Take the job out for execution. The request itself stays queued.
    pub(crate) fn take_job(&mut self) -> Option<TurnJob> {
        self.job.take()
    }
}

/// Awaitable result of one submitted turn.
///
/// Resolves exactly once: to the operation's value, to its failure, or to
/// [`TurnError::SchedulerClosed`] if the scheduler shut down first. Dropping
/// the handle abandons the wait; the turn still runs.
#[must_use = "a turn handle does nothing unless awaited"]
pub struct TurnHandle<T, E> {
    conversation_id: ConversationId,
    agent_id: AgentId,
    receiver: oneshot::Receiver<Result<T, TurnError<E>>>,
}

impl<T, E> TurnHandle<T, E> {
    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    pub fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }
}

impl<T, E> Future for TurnHandle<T, E> {
    type Output = Result<T, TurnError<E>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // A dropped sender means the request was discarded unexecuted.
        self.receiver
            .poll_unpin(cx)
            .map(|slot| slot.unwrap_or_else(|_| Err(TurnError::SchedulerClosed)))
    }
}

impl<T, E> std::fmt::Debug for TurnHandle<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnHandle")
            .field("conversation_id", &self.conversation_id)
            .field("agent_id", &self.agent_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request(
        value: Result<&'static str, &'static str>,
    ) -> (TurnRequest, TurnHandle<&'static str, &'static str>) {
        TurnRequest::new(ConversationId::new("c1"), AgentId::new("a"), move || async move {
            value
        })
    }

    #[tokio::test]
    async fn test_job_fills_slot_with_value() {
        let (mut request, handle) = make_request(Ok("A"));
        let job = request.take_job().unwrap();

        let executed = job(None).await;
        assert_eq!(executed.outcome, TurnOutcome::Completed);
        assert!(executed.delivered);
        assert_eq!(handle.await.unwrap(), "A");
    }

    #[tokio::test]
    async fn test_job_fills_slot_with_failure() {
        let (mut request, handle) = make_request(Err("boom"));
        let executed = request.take_job().unwrap()(None).await;

        assert_eq!(
            executed.outcome,
            TurnOutcome::Failed("Turn operation failed: boom".to_string())
        );
        assert_eq!(handle.await.unwrap_err().into_operation(), Some("boom"));
    }

    #[tokio::test]
    async fn test_abandoned_handle_is_reported_undelivered() {
        let (mut request, handle) = make_request(Ok("A"));
        drop(handle);

        let executed = request.take_job().unwrap()(None).await;
        assert_eq!(executed.outcome, TurnOutcome::Completed);
        assert!(!executed.delivered);
    }

    #[tokio::test]
    async fn test_discarded_request_resolves_closed() {
        let (request, handle) = make_request(Ok("A"));
        drop(request);

        assert!(handle.await.unwrap_err().is_closed());
    }

    #[test]
    fn test_job_is_taken_once() {
        let (mut request, _handle) = make_request(Ok("A"));
        assert_eq!(request.agent_id().as_str(), "a");
        assert!(request.take_job().is_some());
        assert!(request.take_job().is_none());
    }
}
