//! Error types for the Stock actor.

use thiserror::Error;

/// Errors that can occur during stock operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StockError {
    /// The stock item data provided is invalid.
    #[error("Stock validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for StockError {
    fn from(msg: String) -> Self {
        StockError::ActorCommunicationError(msg)
    }
}
