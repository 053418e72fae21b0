/// Products and their stock flags.
///
/// # Actor Framework
/// [`StockItem`] implements the [`ActorEntity`](crate::framework::ActorEntity) trait and
/// is managed by the stock actor, keyed by [`ProductId`]. See [`crate::stock_actor`]
/// for the create-or-replace semantics.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "product_{}", self.0)
    }
}

/// A sellable product. Orders embed a copy, so a later rename never touches past orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
}

impl Product {
    /// Creates a new Product.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Availability flag for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub product: Product,
    pub in_stock: bool,
}

/// Payload for registering or replacing a stock item.
#[derive(Debug, Clone)]
pub struct StockCreate {
    pub product: Product,
    pub in_stock: bool,
}
