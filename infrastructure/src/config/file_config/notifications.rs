//! Notification configuration from TOML (`[notifications]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw notification configuration from TOML
///
/// ```toml
/// [notifications]
/// channel_capacity = 64                    # per-conversation broadcast buffer
/// event_log = "logs/events.jsonl"          # optional JSONL event log
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNotificationsConfig {
    pub channel_capacity: usize,
    pub event_log: Option<PathBuf>,
}

impl Default for FileNotificationsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            event_log: None,
        }
    }
}
