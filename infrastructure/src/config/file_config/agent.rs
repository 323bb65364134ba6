//! Agent roster from TOML (`[[agents]]` array)

use conclave_domain::{AgentProfile, DomainError};
use serde::{Deserialize, Serialize};

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [[agents]]
/// id = "skeptic"
/// name = "Skeptic"
/// persona = "Question every assumption."
/// latency_ms = 120          # simulated response time
/// replies = ["Are we sure?", "What is the evidence?"]
/// fail_every = 4            # every 4th turn of this agent fails
/// ```
///
/// `latency_ms`, `replies` and `fail_every` drive the scripted responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub id: String,
    /// Display name; defaults to the id
    pub name: Option<String>,
    pub persona: String,
    pub latency_ms: u64,
    pub replies: Vec<String>,
    pub fail_every: Option<u32>,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: None,
            persona: String::new(),
            latency_ms: 50,
            replies: Vec::new(),
            fail_every: None,
        }
    }
}

impl FileAgentConfig {
    pub fn new(id: impl Into<String>, persona: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            persona: persona.into(),
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Convert to the domain profile
    pub fn to_profile(&self) -> Result<AgentProfile, DomainError> {
        AgentProfile::new(self.id.as_str(), self.display_name(), self.persona.as_str())
    }

    /// Built-in roster used when no agents are configured
    pub fn default_roster() -> Vec<Self> {
        vec![
            Self::new("optimist", "Look for what could go right and build on it."),
            Self::new("skeptic", "Question every assumption and ask for evidence."),
            Self::new("moderator", "Summarise the positions and steer toward agreement."),
        ]
    }
}
