//! Scheduler configuration from TOML (`[scheduler]` section)

use conclave_application::SchedulerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw scheduler configuration from TOML
///
/// ```toml
/// [scheduler]
/// turn_timeout_secs = 120   # omit to let turns run unbounded
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSchedulerConfig {
    pub turn_timeout_secs: Option<u64>,
}

impl FileSchedulerConfig {
    pub fn to_scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            turn_timeout: self.turn_timeout_secs.map(Duration::from_secs),
        }
    }
}
