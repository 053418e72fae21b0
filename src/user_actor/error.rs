//! Error types for the User actor.

use thiserror::Error;

/// Errors that can occur during profile operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    /// The profile data provided is invalid.
    #[error("User validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for UserError {
    fn from(msg: String) -> Self {
        UserError::ActorCommunicationError(msg)
    }
}
