//! Error type for the remote operation surface.

use crate::order_actor::OrderError;
use crate::role_actor::RoleError;
use crate::stock_actor::StockError;
use crate::user_actor::UserError;
use thiserror::Error;

/// Every way a service call can be rejected. Calls fail closed: an unauthorized or
/// malformed call is reported here and never turns into a silent no-op.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The call was well-formed but the system state does not allow it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A backing actor is gone (shutdown or crashed task).
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl From<OrderError> for ServiceError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(id) => ServiceError::NotFound(id),
            OrderError::OutOfStock(product) => {
                ServiceError::InvalidState(format!("{product} is out of stock"))
            }
            OrderError::ValidationError(msg) => ServiceError::InvalidArgument(msg),
            OrderError::ActorCommunicationError(msg) => ServiceError::Unavailable(msg),
        }
    }
}

impl From<StockError> for ServiceError {
    fn from(e: StockError) -> Self {
        match e {
            StockError::ValidationError(msg) => ServiceError::InvalidArgument(msg),
            StockError::ActorCommunicationError(msg) => ServiceError::Unavailable(msg),
        }
    }
}

impl From<UserError> for ServiceError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::ValidationError(msg) => ServiceError::InvalidArgument(msg),
            UserError::ActorCommunicationError(msg) => ServiceError::Unavailable(msg),
        }
    }
}

impl From<RoleError> for ServiceError {
    fn from(e: RoleError) -> Self {
        match e {
            RoleError::ValidationError(msg) => ServiceError::InvalidArgument(msg),
            RoleError::ActorCommunicationError(msg) => ServiceError::Unavailable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductId;

    #[test]
    fn test_out_of_stock_is_invalid_state() {
        let err = ServiceError::from(OrderError::OutOfStock(ProductId(1)));
        assert_eq!(err, ServiceError::InvalidState("product_1 is out of stock".into()));
    }

    #[test]
    fn test_transport_failures_are_unavailable() {
        let err = ServiceError::from(StockError::from("Actor closed".to_string()));
        assert!(matches!(err, ServiceError::Unavailable(_)));
    }
}
