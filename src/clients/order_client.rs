//! # Order Client
//!
//! High-level API for the `Order` actor.
use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{Order, OrderCreate, OrderId};
use crate::order_actor::{OrderAction, OrderError};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
///
/// Validation and the stock check happen inside the actor (`Order::from_create_params`
/// and `Order::on_create`).
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(customer = %params.customer, quantity = params.quantity))]
    pub async fn place_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!(?params, "place_order called");
        info!("Sending place_order to actor");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Completes the order. Returns `true` if this call performed the transition.
    #[instrument(skip(self))]
    pub async fn complete_order(&self, id: OrderId) -> Result<bool, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, OrderAction::Complete)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> OrderError {
        match e.downcast_entity::<OrderError>() {
            Ok(entity_error) => entity_error,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;

    #[tokio::test]
    async fn test_complete_unknown_order_maps_to_not_found() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action(OrderId(9))
            .return_err(FrameworkError::NotFound(OrderId(9).to_string()));

        let client = OrderClient::new(mock.client());
        let err = client.complete_order(OrderId(9)).await.unwrap_err();
        assert_eq!(err, OrderError::NotFound("order_9".to_string()));
        mock.verify();
    }

    #[tokio::test]
    async fn test_entity_errors_pass_through_unchanged() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_create().return_err(FrameworkError::EntityError(Box::new(
            OrderError::ValidationError("quantity must be at least 1".into()),
        )));

        let client = OrderClient::new(mock.client());
        let params = OrderCreate {
            customer: "c".into(),
            room_number: "101".into(),
            timestamp: 0,
            quantity: 0,
            products: vec![],
        };
        let err = client.place_order(params).await.unwrap_err();
        assert!(matches!(err, OrderError::ValidationError(_)));
        mock.verify();
    }
}
