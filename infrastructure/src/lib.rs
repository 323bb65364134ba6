//! Infrastructure layer for conclave
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod notification;
pub mod responder;
pub mod transcript;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, FileAgentConfig, FileConfig, FileLoggingConfig,
    FileNotificationsConfig, FileOutputConfig, FileSchedulerConfig, Severity,
};
pub use logging::JsonlEventLog;
pub use notification::{BroadcastNotificationSink, FanoutNotificationSink};
pub use responder::ScriptedResponder;
pub use transcript::InMemoryTranscriptStore;
