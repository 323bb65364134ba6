//! Conversation subdomain.
//!
//! A conversation is a shared, ordered context in which several agents take
//! turns. This module holds the identifiers, the entities that make up a
//! transcript, and the events broadcast to subscribers when it changes.
//!
//! - [`value_objects`] - [`ConversationId`], [`AgentId`], [`MessageId`]
//! - [`entities`] - [`AgentProfile`], [`Conversation`], [`Message`]
//! - [`event`] - [`ConversationEvent`]
//!
//! [`ConversationId`]: value_objects::ConversationId
//! [`AgentId`]: value_objects::AgentId
//! [`MessageId`]: value_objects::MessageId
//! [`AgentProfile`]: entities::AgentProfile
//! [`Conversation`]: entities::Conversation
//! [`Message`]: entities::Message
//! [`ConversationEvent`]: event::ConversationEvent

pub mod entities;
pub mod event;
pub mod value_objects;
