//! Agent responder adapters

mod scripted;

pub use scripted::ScriptedResponder;
