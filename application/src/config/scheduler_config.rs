//! Scheduler parameters for turn execution.
//!
//! [`SchedulerConfig`] groups the static parameters of the
//! [`TurnScheduler`](crate::scheduling::TurnScheduler). These are
//! application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Turn scheduler parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Upper bound on a single turn. `None` lets turns run as long as they need.
    pub turn_timeout: Option<Duration>,
}

impl SchedulerConfig {
    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = Some(timeout);
        self
    }
}
