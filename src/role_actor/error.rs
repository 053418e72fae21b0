//! Error types for the Role actor.

use thiserror::Error;

/// Errors that can occur during role operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RoleError {
    /// The assignment is not allowed for this principal.
    #[error("Role validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for RoleError {
    fn from(msg: String) -> Self {
        RoleError::ActorCommunicationError(msg)
    }
}
