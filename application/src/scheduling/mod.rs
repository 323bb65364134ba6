//! Per-conversation turn sequencing.
//!
//! - [`TurnScheduler`] - registry of conversation queues; the sole entry point
//! - [`TurnHandle`] - what a caller awaits for its own turn
//! - [`TurnError`] - operation failure, shutdown, panic or timeout
//!
//! Within a conversation turns run strictly one at a time in enqueue order.
//! Across conversations they run in parallel.

pub mod error;
mod executor;
mod queue;
pub mod request;
pub mod scheduler;

pub use error::TurnError;
pub use request::{TurnHandle, TurnOutcome};
pub use scheduler::TurnScheduler;
