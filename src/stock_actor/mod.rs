//! # Stock Actor
//!
//! Holds one [`StockItem`] per product id with create-or-replace semantics.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`StockItem`]
//! - [`error`] - [`StockError`] type for type-safe error handling
//! - [`new()`] - Factory function that creates the actor and client
//!
//! Writes go through `Put`, keyed by the product's own id: the last write wins and no
//! history is kept. A product that was never registered reads as out of stock (see
//! [`StockClient::get_stock_status`]).

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::StockClient;
use crate::framework::ResourceActor;
use crate::model::StockItem;

/// Creates a new Stock actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<StockItem>, StockClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, StockClient::new(generic_client))
}
