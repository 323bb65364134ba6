//! Scripted agent responder.
//!
//! Stands in for a model-backed agent: each configured agent answers after
//! a fixed latency, cycling through its configured replies. Failures can be
//! injected with `fail_every`.

use crate::config::FileAgentConfig;
use async_trait::async_trait;
use conclave_application::{AgentResponder, ResponderError};
use conclave_domain::{AgentId, AgentProfile, Conversation, Message};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::debug;

struct Script {
    latency: Duration,
    replies: Vec<String>,
    fail_every: Option<u32>,
    turns: AtomicU32,
}

/// Responder driven by the `[[agents]]` configuration
pub struct ScriptedResponder {
    scripts: HashMap<AgentId, Script>,
}

impl ScriptedResponder {
    pub fn new(agents: &[FileAgentConfig]) -> Self {
        let scripts = agents
            .iter()
            .map(|agent| {
                (
                    AgentId::new(agent.id.as_str()),
                    Script {
                        latency: Duration::from_millis(agent.latency_ms),
                        replies: agent.replies.clone(),
                        fail_every: agent.fail_every.filter(|n| *n > 0),
                        turns: AtomicU32::new(0),
                    },
                )
            })
            .collect();
        Self { scripts }
    }

    fn default_reply(agent: &AgentProfile, conversation: &Conversation, history: &[Message]) -> String {
        match history.last() {
            Some(previous) => format!(
                "{} responds to {} on \"{}\" ({})",
                agent.name,
                previous.agent_id,
                conversation.topic(),
                agent.persona
            ),
            None => format!(
                "{} opens \"{}\" ({})",
                agent.name,
                conversation.topic(),
                agent.persona
            ),
        }
    }
}

#[async_trait]
impl AgentResponder for ScriptedResponder {
    async fn respond(
        &self,
        agent: &AgentProfile,
        conversation: &Conversation,
        history: &[Message],
    ) -> Result<String, ResponderError> {
        let script = self
            .scripts
            .get(&agent.id)
            .ok_or_else(|| ResponderError::Unavailable(agent.id.to_string()))?;

        let turn = script.turns.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(agent = %agent.id, turn, latency_ms = script.latency.as_millis() as u64, "Scripted response");

        if !script.latency.is_zero() {
            tokio::time::sleep(script.latency).await;
        }

        if let Some(every) = script.fail_every
            && turn % every == 0
        {
            return Err(ResponderError::RequestFailed(format!(
                "{} failed on turn {}",
                agent.name, turn
            )));
        }

        if script.replies.is_empty() {
            return Ok(Self::default_reply(agent, conversation, history));
        }
        let index = (turn as usize - 1) % script.replies.len();
        Ok(script.replies[index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::ConversationId;

    fn agent_config(id: &str, replies: &[&str], fail_every: Option<u32>) -> FileAgentConfig {
        FileAgentConfig {
            latency_ms: 0,
            replies: replies.iter().map(|r| r.to_string()).collect(),
            fail_every,
            ..FileAgentConfig::new(id, "terse")
        }
    }

    fn conversation(agents: &[FileAgentConfig]) -> Conversation {
        let participants = agents.iter().map(|a| a.to_profile().unwrap()).collect();
        Conversation::new("c1", "lunch", participants).unwrap()
    }

    #[tokio::test]
    async fn test_replies_cycle() {
        let agents = vec![agent_config("a", &["one", "two"], None)];
        let responder = ScriptedResponder::new(&agents);
        let conversation = conversation(&agents);
        let agent = &conversation.participants()[0];

        let mut replies = Vec::new();
        for _ in 0..3 {
            replies.push(responder.respond(agent, &conversation, &[]).await.unwrap());
        }
        assert_eq!(replies, vec!["one", "two", "one"]);
    }

    #[tokio::test]
    async fn test_fail_every_injects_failures() {
        let agents = vec![agent_config("a", &["ok"], Some(2))];
        let responder = ScriptedResponder::new(&agents);
        let conversation = conversation(&agents);
        let agent = &conversation.participants()[0];

        assert!(responder.respond(agent, &conversation, &[]).await.is_ok());
        assert!(matches!(
            responder.respond(agent, &conversation, &[]).await,
            Err(ResponderError::RequestFailed(_))
        ));
        assert!(responder.respond(agent, &conversation, &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_default_reply_mentions_previous_speaker() {
        let agents = vec![agent_config("a", &[], None), agent_config("b", &[], None)];
        let responder = ScriptedResponder::new(&agents);
        let conversation = conversation(&agents);

        let opening = responder
            .respond(&conversation.participants()[0], &conversation, &[])
            .await
            .unwrap();
        assert_eq!(opening, "a opens \"lunch\" (terse)");

        let history = vec![Message::new(
            ConversationId::new("c1"),
            AgentId::new("a"),
            opening,
        )];
        let reply = responder
            .respond(&conversation.participants()[1], &conversation, &history)
            .await
            .unwrap();
        assert_eq!(reply, "b responds to a on \"lunch\" (terse)");
    }

    #[tokio::test]
    async fn test_unknown_agent_is_unavailable() {
        let responder = ScriptedResponder::new(&[]);
        let agents = vec![agent_config("ghost", &[], None)];
        let conversation = conversation(&agents);

        let err = responder
            .respond(&conversation.participants()[0], &conversation, &[])
            .await
            .unwrap_err();
        assert_eq!(err, ResponderError::Unavailable("ghost".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let agents = vec![FileAgentConfig {
            latency_ms: 250,
            ..agent_config("a", &["slow"], None)
        }];
        let responder = ScriptedResponder::new(&agents);
        let conversation = conversation(&agents);

        let start = tokio::time::Instant::now();
        responder
            .respond(&conversation.participants()[0], &conversation, &[])
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(250));
    }
}
