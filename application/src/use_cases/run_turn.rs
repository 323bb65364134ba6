//! Run Turn use case
//!
//! Asks one agent for its next message in a conversation. The work is
//! submitted to the [`TurnScheduler`], so the agent sees the full transcript
//! of every turn enqueued before it and no other agent of the same
//! conversation speaks at the same time.

use crate::ports::agent_responder::{AgentResponder, ResponderError};
use crate::ports::notification_sink::NotificationSink;
use crate::ports::transcript_store::{TranscriptError, TranscriptStore};
use crate::scheduling::{TurnError, TurnHandle, TurnScheduler};
use conclave_domain::{AgentId, Conversation, ConversationEvent, Message};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while running a turn
#[derive(Error, Debug)]
pub enum RunTurnError {
    #[error("Agent {0} is not a participant of this conversation")]
    UnknownParticipant(AgentId),

    #[error("Agent failed to respond: {0}")]
    Responder(#[from] ResponderError),

    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    #[error("Turn panicked")]
    Panicked,

    #[error("Turn timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Scheduler is shutting down")]
    SchedulerClosed,
}

impl From<TurnError<RunTurnError>> for RunTurnError {
    fn from(error: TurnError<RunTurnError>) -> Self {
        match error {
            TurnError::Operation(e) => e,
            TurnError::SchedulerClosed => RunTurnError::SchedulerClosed,
            TurnError::Panicked => RunTurnError::Panicked,
            TurnError::TimedOut(limit) => RunTurnError::TimedOut(limit),
        }
    }
}

/// Input for the RunTurn use case
#[derive(Debug, Clone)]
pub struct RunTurnInput {
    pub conversation: Arc<Conversation>,
    pub agent_id: AgentId,
}

impl RunTurnInput {
    pub fn new(conversation: Arc<Conversation>, agent_id: impl Into<AgentId>) -> Self {
        Self {
            conversation,
            agent_id: agent_id.into(),
        }
    }
}

/// Handle for a turn that has been enqueued but not awaited yet
pub type PendingTurn = TurnHandle<Message, RunTurnError>;

/// Use case for running a single agent turn
pub struct RunTurnUseCase<R: AgentResponder + 'static, S: TranscriptStore + 'static> {
    scheduler: TurnScheduler,
    responder: Arc<R>,
    transcripts: Arc<S>,
    notifications: Arc<dyn NotificationSink>,
}

impl<R: AgentResponder + 'static, S: TranscriptStore + 'static> Clone for RunTurnUseCase<R, S> {
    fn clone(&self) -> Self {
        Self {
            scheduler: self.scheduler.clone(),
            responder: Arc::clone(&self.responder),
            transcripts: Arc::clone(&self.transcripts),
            notifications: Arc::clone(&self.notifications),
        }
    }
}

impl<R: AgentResponder + 'static, S: TranscriptStore + 'static> RunTurnUseCase<R, S> {
    pub fn new(
        scheduler: TurnScheduler,
        responder: Arc<R>,
        transcripts: Arc<S>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            scheduler,
            responder,
            transcripts,
            notifications,
        }
    }

    /// Run the turn and wait for the agent's message
    pub async fn execute(&self, input: RunTurnInput) -> Result<Message, RunTurnError> {
        Ok(self.enqueue(input)?.await?)
    }

    /// Enqueue the turn; turns enqueued later for the same conversation run after it
    pub fn enqueue(&self, input: RunTurnInput) -> Result<PendingTurn, RunTurnError> {
        let RunTurnInput {
            conversation,
            agent_id,
        } = input;

        if conversation.participant(&agent_id).is_none() {
            return Err(RunTurnError::UnknownParticipant(agent_id));
        }

        let responder = Arc::clone(&self.responder);
        let transcripts = Arc::clone(&self.transcripts);
        let notifications = Arc::clone(&self.notifications);
        let acting = agent_id.clone();

        let handle = self.scheduler.enqueue(
            conversation.id().clone(),
            agent_id,
            move || async move {
                let result =
                    Self::take_turn(&*responder, &*transcripts, &conversation, &acting).await;

                let event = match &result {
                    Ok(message) => ConversationEvent::NewMessage {
                        message: message.clone(),
                    },
                    Err(e) => ConversationEvent::TurnFailed {
                        agent_id: acting,
                        reason: e.to_string(),
                    },
                };
                notifications.notify(conversation.id(), event);

                result
            },
        )?;

        Ok(handle)
    }

    /// Body of a turn: read history, ask the agent, persist the reply
    async fn take_turn(
        responder: &R,
        transcripts: &S,
        conversation: &Conversation,
        agent_id: &AgentId,
    ) -> Result<Message, RunTurnError> {
        let agent = conversation
            .participant(agent_id)
            .ok_or_else(|| RunTurnError::UnknownParticipant(agent_id.clone()))?;

        let history = transcripts.history(conversation.id()).await?;
        debug!(
            conversation = %conversation.id(),
            agent = %agent_id,
            history = history.len(),
            "Requesting agent response"
        );

        let content = responder.respond(agent, conversation, &history).await?;
        if content.trim().is_empty() {
            return Err(ResponderError::EmptyResponse(agent_id.to_string()).into());
        }

        let message = Message::new(conversation.id().clone(), agent_id.clone(), content);
        transcripts.append(message.clone()).await?;

        Ok(message)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::SchedulerConfig;
    use async_trait::async_trait;
    use conclave_domain::{AgentProfile, ConversationId};
    use std::collections::HashMap;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    /// Replies "<name> #<history len>", or fails for agents listed in `failing`.
    pub(crate) struct EchoResponder {
        pub(crate) failing: Vec<AgentId>,
    }

    #[async_trait]
    impl AgentResponder for EchoResponder {
        async fn respond(
            &self,
            agent: &AgentProfile,
            _conversation: &Conversation,
            history: &[Message],
        ) -> Result<String, ResponderError> {
            if self.failing.contains(&agent.id) {
                return Err(ResponderError::RequestFailed(format!("{} is down", agent.name)));
            }
            tokio::task::yield_now().await;
            Ok(format!("{} #{}", agent.name, history.len()))
        }
    }

    #[derive(Default)]
    pub(crate) struct MemoryTranscripts {
        messages: Mutex<HashMap<ConversationId, Vec<Message>>>,
    }

    #[async_trait]
    impl TranscriptStore for MemoryTranscripts {
        async fn history(
            &self,
            conversation_id: &ConversationId,
        ) -> Result<Vec<Message>, TranscriptError> {
            Ok(self
                .messages
                .lock()
                .unwrap()
                .get(conversation_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn append(&self, message: Message) -> Result<(), TranscriptError> {
            self.messages
                .lock()
                .unwrap()
                .entry(message.conversation_id.clone())
                .or_default()
                .push(message);
            Ok(())
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) events: Mutex<Vec<ConversationEvent>>,
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, _conversation_id: &ConversationId, event: ConversationEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    pub(crate) fn conversation(id: &str, agents: &[&str]) -> Arc<Conversation> {
        let participants = agents
            .iter()
            .map(|a| AgentProfile::new(*a, a.to_uppercase(), "test").unwrap())
            .collect();
        Arc::new(Conversation::new(id, "testing", participants).unwrap())
    }

    fn use_case(
        failing: &[&str],
    ) -> (
        RunTurnUseCase<EchoResponder, MemoryTranscripts>,
        Arc<MemoryTranscripts>,
        Arc<RecordingSink>,
    ) {
        let transcripts = Arc::new(MemoryTranscripts::default());
        let sink = Arc::new(RecordingSink::default());
        let responder = Arc::new(EchoResponder {
            failing: failing.iter().map(|a| AgentId::new(*a)).collect(),
        });
        let use_case = RunTurnUseCase::new(
            TurnScheduler::new(SchedulerConfig::default()),
            responder,
            Arc::clone(&transcripts),
            sink.clone(),
        );
        (use_case, transcripts, sink)
    }

    #[tokio::test]
    async fn test_turn_persists_and_notifies() {
        let (use_case, transcripts, sink) = use_case(&[]);
        let conversation = conversation("c1", &["a", "b"]);

        let message = use_case
            .execute(RunTurnInput::new(Arc::clone(&conversation), "a"))
            .await
            .unwrap();

        assert_eq!(message.content, "A #0");
        assert_eq!(message.agent_id.as_str(), "a");

        let history = transcripts.history(conversation.id()).await.unwrap();
        assert_eq!(history, vec![message.clone()]);

        let events = sink.events.lock().unwrap();
        assert_eq!(*events, vec![ConversationEvent::NewMessage { message }]);
    }

    #[tokio::test]
    async fn test_queued_turns_see_earlier_messages() {
        let (use_case, _transcripts, _sink) = use_case(&[]);
        let conversation = conversation("c1", &["a", "b", "c"]);

        let handles: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|agent| {
                use_case
                    .enqueue(RunTurnInput::new(Arc::clone(&conversation), *agent))
                    .unwrap()
            })
            .collect();

        let contents: Vec<_> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap().content)
            .collect();
        assert_eq!(contents, vec!["A #0", "B #1", "C #2"]);
    }

    #[tokio::test]
    async fn test_failed_turn_notifies_and_returns_error() {
        let (use_case, transcripts, sink) = use_case(&["b"]);
        let conversation = conversation("c1", &["a", "b"]);

        let err = use_case
            .execute(RunTurnInput::new(Arc::clone(&conversation), "b"))
            .await
            .unwrap_err();

        assert!(matches!(err, RunTurnError::Responder(ResponderError::RequestFailed(_))));
        assert!(transcripts.history(conversation.id()).await.unwrap().is_empty());

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "turn_failed");
    }

    #[tokio::test]
    async fn test_unknown_participant_is_rejected_before_queueing() {
        let (use_case, _transcripts, sink) = use_case(&[]);
        let conversation = conversation("c1", &["a"]);

        let err = use_case
            .enqueue(RunTurnInput::new(conversation, "zed"))
            .unwrap_err();

        assert!(matches!(err, RunTurnError::UnknownParticipant(id) if id.as_str() == "zed"));
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_turn_error_conversion() {
        assert!(matches!(
            RunTurnError::from(TurnError::SchedulerClosed),
            RunTurnError::SchedulerClosed
        ));
        assert!(matches!(
            RunTurnError::from(TurnError::Operation(RunTurnError::Panicked)),
            RunTurnError::Panicked
        ));
    }
}
