//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_responder;
pub mod notification_sink;
pub mod progress;
pub mod transcript_store;
