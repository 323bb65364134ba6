//! Notification sinks
//!
//! [`BroadcastNotificationSink`] delivers events to live subscribers of a
//! conversation; [`FanoutNotificationSink`] forwards each event to several
//! sinks (e.g. broadcast plus the JSONL event log).

mod broadcast;
mod fanout;

pub use broadcast::BroadcastNotificationSink;
pub use fanout::FanoutNotificationSink;
