//! Transcript storage adapters

mod memory;

pub use memory::InMemoryTranscriptStore;
