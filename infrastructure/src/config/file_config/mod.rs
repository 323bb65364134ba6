//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain/application
//! types at the edges (`to_profile`, `to_scheduler_config`).

mod agent;
mod logging;
mod notifications;
mod output;
mod scheduler;

pub use agent::FileAgentConfig;
pub use logging::FileLoggingConfig;
pub use notifications::FileNotificationsConfig;
pub use output::FileOutputConfig;
pub use scheduler::FileSchedulerConfig;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// How serious a configuration issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Usable, but probably not what the user meant
    Warning,
    /// The configuration cannot be used as-is
    Error,
}

/// A single problem found by [`FileConfig::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub message: String,
}

impl ConfigIssue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Warning => write!(f, "warning: {}", self.message),
            Severity::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Turn scheduling settings
    pub scheduler: FileSchedulerConfig,
    /// Notification fan-out settings
    pub notifications: FileNotificationsConfig,
    /// Diagnostic log settings
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Agent roster, in speaking order
    pub agents: Vec<FileAgentConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            scheduler: FileSchedulerConfig::default(),
            notifications: FileNotificationsConfig::default(),
            logging: FileLoggingConfig::default(),
            output: FileOutputConfig::default(),
            agents: FileAgentConfig::default_roster(),
        }
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.agents.is_empty() {
            issues.push(ConfigIssue::error("no agents configured"));
        }

        let mut seen = HashSet::new();
        for (index, agent) in self.agents.iter().enumerate() {
            if agent.id.trim().is_empty() {
                issues.push(ConfigIssue::error(format!("agents[{}]: id is empty", index)));
                continue;
            }
            if !seen.insert(agent.id.as_str()) {
                issues.push(ConfigIssue::error(format!(
                    "agents[{}]: duplicate id '{}'",
                    index, agent.id
                )));
            }
            if agent.fail_every == Some(0) {
                issues.push(ConfigIssue::warning(format!(
                    "agents[{}]: fail_every = 0 is ignored",
                    index
                )));
            }
        }

        if self.notifications.channel_capacity == 0 {
            issues.push(ConfigIssue::error(
                "notifications.channel_capacity must be greater than zero",
            ));
        }

        if self.scheduler.turn_timeout_secs == Some(0) {
            issues.push(ConfigIssue::warning(
                "scheduler.turn_timeout_secs = 0 fails every turn immediately",
            ));
        }

        issues
    }
}
