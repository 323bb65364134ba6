//! Application layer for conclave
//!
//! This crate contains the turn scheduler, use cases, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod scheduling;
pub mod use_cases;

// Re-export commonly used types
pub use config::SchedulerConfig;
pub use ports::{
    agent_responder::{AgentResponder, ResponderError},
    notification_sink::{NoNotifications, NotificationSink},
    progress::{NoTurnProgress, TurnProgressNotifier},
    transcript_store::{TranscriptError, TranscriptStore},
};
pub use scheduling::{TurnError, TurnHandle, TurnOutcome, TurnScheduler};
pub use use_cases::run_round::{RoundOutcome, RunRoundUseCase};
pub use use_cases::run_turn::{PendingTurn, RunTurnError, RunTurnInput, RunTurnUseCase};
