//! # Stock Client
//!
//! High-level API for the `StockItem` actor.
use crate::clients::actor_client::ActorClient;
use crate::framework::ResourceClient;
use crate::model::{Product, ProductId, StockCreate, StockItem};
use crate::stock_actor::StockError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Stock actor.
#[derive(Clone)]
pub struct StockClient {
    inner: ResourceClient<StockItem>,
}

impl StockClient {
    pub fn new(inner: ResourceClient<StockItem>) -> Self {
        Self { inner }
    }

    /// Registers the product or replaces its current flag.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn set_stock(&self, product: Product, in_stock: bool) -> Result<(), StockError> {
        debug!("Sending request");
        let id = product.id;
        self.inner
            .put(id, StockCreate { product, in_stock })
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }

    /// Current availability of a product. Unregistered products are out of stock.
    #[instrument(skip(self))]
    pub async fn get_stock_status(&self, id: ProductId) -> Result<bool, StockError> {
        debug!("Checking stock for {}", id);
        let item = self.inner.get(id).await.map_err(Self::map_error)?;
        Ok(item.is_some_and(|item| item.in_stock))
    }
}

#[async_trait]
impl ActorClient<StockItem> for StockClient {
    type Error = StockError;

    fn inner(&self) -> &ResourceClient<StockItem> {
        &self.inner
    }
}
