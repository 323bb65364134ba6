//! Turn scheduling errors

use std::time::Duration;
use thiserror::Error;

/// Why a submitted turn did not produce a value.
///
/// `E` is the error type of the caller's own operation. Only the caller that
/// submitted the turn ever sees its failure.
#[derive(Error, Debug)]
pub enum TurnError<E> {
    #[error("Turn operation failed: {0}")]
    Operation(E),

    #[error("Scheduler is shutting down")]
    SchedulerClosed,

    #[error("Turn operation panicked")]
    Panicked,

    #[error("Turn timed out after {0:?}")]
    TimedOut(Duration),
}

impl<E> TurnError<E> {
    /// Check if the turn was rejected or dropped because of shutdown
    pub fn is_closed(&self) -> bool {
        matches!(self, TurnError::SchedulerClosed)
    }

    /// Returns the operation's own error, if that is what failed.
    pub fn into_operation(self) -> Option<E> {
        match self {
            TurnError::Operation(e) => Some(e),
            _ => None,
        }
    }
}
