//! ActorEntity trait implementation for the StockItem domain type.

use super::StockError;
use crate::framework::ActorEntity;
use crate::model::{ProductId, StockCreate, StockItem};
use async_trait::async_trait;
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for StockItem {
    type Id = ProductId;
    type Create = StockCreate;
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = StockError;

    /// The store key must be the product's own id.
    fn from_create_params(id: ProductId, params: StockCreate) -> Result<Self, StockError> {
        if params.product.id != id {
            return Err(StockError::ValidationError(format!(
                "stock key {id} does not match product {}",
                params.product.id
            )));
        }
        if params.product.name.trim().is_empty() {
            return Err(StockError::ValidationError("product name is required".into()));
        }
        Ok(Self {
            product: params.product,
            in_stock: params.in_stock,
        })
    }

    async fn handle_action(&mut self, action: Infallible, _ctx: &()) -> Result<(), StockError> {
        match action {}
    }
}
