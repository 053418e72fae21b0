//! ActorEntity trait implementation for the Order domain type.
//!
//! - `from_create_params` rejects malformed orders (no products, zero quantity, blank
//!   room number) before anything reaches the store.
//! - `on_create` consults the stock actor when the context carries one.
//! - `handle_action` performs the one-way `Pending -> Completed` transition.

use super::{OrderAction, OrderContext, OrderError};
use crate::framework::ActorEntity;
use crate::model::{Order, OrderCreate, OrderId};
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Action = OrderAction;
    type ActionResult = bool;
    type Context = OrderContext;
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if params.quantity == 0 {
            return Err(OrderError::ValidationError("quantity must be at least 1".into()));
        }
        if params.room_number.trim().is_empty() {
            return Err(OrderError::ValidationError("room number is required".into()));
        }
        if params.products.is_empty() {
            return Err(OrderError::ValidationError("an order needs at least one product".into()));
        }

        Ok(Self {
            id,
            customer: params.customer,
            room_number: params.room_number,
            timestamp: params.timestamp,
            quantity: params.quantity,
            products: params.products,
            is_completed: false,
        })
    }

    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), OrderError> {
        let Some(stock) = ctx.stock() else {
            return Ok(());
        };
        for product in &self.products {
            let in_stock = stock
                .get_stock_status(product.id)
                .await
                .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?;
            debug!(order_id = %self.id, product_id = %product.id, in_stock, "Stock checked");
            if !in_stock {
                return Err(OrderError::OutOfStock(product.id));
            }
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: OrderAction, _ctx: &OrderContext) -> Result<bool, OrderError> {
        match action {
            OrderAction::Complete => {
                if self.is_completed {
                    Ok(false)
                } else {
                    self.is_completed = true;
                    Ok(true)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Principal, Product};

    fn params(quantity: u32, room: &str, products: Vec<Product>) -> OrderCreate {
        OrderCreate {
            customer: Principal::new("customer-1"),
            room_number: room.to_string(),
            timestamp: 1_700_000_000_000_000_000,
            quantity,
            products,
        }
    }

    #[test]
    fn test_new_orders_start_pending() {
        let order = Order::from_create_params(OrderId(4), params(2, "101", vec![Product::new(1, "Stick")])).unwrap();
        assert_eq!(order.id, OrderId(4));
        assert!(order.is_pending());
    }

    #[test]
    fn test_rejects_malformed_orders() {
        let stick = || vec![Product::new(1, "Stick")];
        for bad in [params(0, "101", stick()), params(1, "  ", stick()), params(1, "101", vec![])] {
            let err = Order::from_create_params(OrderId(1), bad).unwrap_err();
            assert!(matches!(err, OrderError::ValidationError(_)));
        }
    }

    #[tokio::test]
    async fn test_complete_is_one_way() {
        let mut order = Order::from_create_params(OrderId(1), params(1, "101", vec![Product::new(1, "Stick")])).unwrap();
        let ctx = OrderContext::unchecked();
        assert!(order.handle_action(OrderAction::Complete, &ctx).await.unwrap());
        assert!(!order.handle_action(OrderAction::Complete, &ctx).await.unwrap());
        assert!(order.is_completed);
    }
}
