//! Domain layer for conclave
//!
//! This crate contains the entities and value objects shared by every layer.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Conversation**: an ordered, shared context in which several agents take turns
//! - **Turn**: one agent's single response-producing action within a conversation
//! - **Message**: the record a successful turn produces

pub mod conversation;
pub mod core;

// Re-export commonly used types
pub use conversation::{
    entities::{AgentProfile, Conversation, Message},
    event::ConversationEvent,
    value_objects::{AgentId, ConversationId, MessageId},
};
pub use self::core::error::DomainError;
