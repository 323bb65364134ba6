//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Identifier must not be empty: {0}")]
    EmptyIdentifier(&'static str),

    #[error("Conversation has no participants")]
    NoParticipants,

    #[error("Agent {0} is listed more than once")]
    DuplicateParticipant(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_identifier_display() {
        let error = DomainError::EmptyIdentifier("agent id");
        assert_eq!(error.to_string(), "Identifier must not be empty: agent id");
    }

    #[test]
    fn test_duplicate_participant_display() {
        let error = DomainError::DuplicateParticipant("skeptic".to_string());
        assert_eq!(error.to_string(), "Agent skeptic is listed more than once");
    }
}
