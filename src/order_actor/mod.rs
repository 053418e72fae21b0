//! # Order Actor
//!
//! Owns every [`Order`] placed at the desk.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Order`]
//! - [`actions`] - [`OrderAction`] (completion)
//! - [`error`] - [`OrderError`] type for type-safe error handling
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Context
//!
//! The actor runs with an [`OrderContext`]. When it carries a [`StockClient`], every
//! product in a new order must be in stock or the order is rejected in
//! `Order::on_create` before anything is stored.
//!
//! ```rust,ignore
//! let (stock_actor, stock_client) = stock_actor::new(32);
//! let (order_actor, order_client) = order_actor::new(32);
//! tokio::spawn(stock_actor.run(()));
//! tokio::spawn(order_actor.run(OrderContext::enforcing(stock_client)));
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::{OrderClient, StockClient};
use crate::framework::ResourceActor;
use crate::model::{Order, OrderId};

/// Dependencies injected into the order actor at `run()` time.
#[derive(Clone, Default)]
pub struct OrderContext {
    stock: Option<StockClient>,
}

impl OrderContext {
    /// Orders are accepted regardless of stock.
    pub fn unchecked() -> Self {
        Self { stock: None }
    }

    /// Orders are only accepted while every product is in stock.
    pub fn enforcing(stock: StockClient) -> Self {
        Self { stock: Some(stock) }
    }

    pub fn stock(&self) -> Option<&StockClient> {
        self.stock.as_ref()
    }
}

/// Creates a new Order actor and its client. Ids start at 1 and only go up.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderClient) {
    let mut last_id = 0;
    let next_order_id = move || {
        last_id += 1;
        OrderId(last_id)
    };

    let (actor, generic_client) = ResourceActor::with_id_generator(buffer_size, next_order_id);
    (actor, OrderClient::new(generic_client))
}
