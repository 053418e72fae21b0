/// Represents a customer order.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
///
/// See [`crate::order_actor`] for details on:
/// - Creation parameters ([`OrderCreate`])
/// - Custom actions ([`OrderAction`](crate::order_actor::OrderAction))
///
/// Lifecycle: `Pending --complete--> Completed`. Completed is terminal and orders are
/// never deleted.
use crate::model::{Principal, Product};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Nanoseconds since the Unix epoch.
pub type Time = i64;

/// Type-safe identifier for Orders.
///
/// Allocated by the order actor from a monotonic counter starting at 1 and never
/// reused, so an order keeps its id no matter what happens to other orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer: Principal,
    pub room_number: String,
    pub timestamp: Time,
    pub quantity: u32,
    pub products: Vec<Product>,
    pub is_completed: bool,
}

impl Order {
    /// True until the order has been completed.
    pub fn is_pending(&self) -> bool {
        !self.is_completed
    }
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer: Principal,
    pub room_number: String,
    pub timestamp: Time,
    pub quantity: u32,
    pub products: Vec<Product>,
}

/// Current wall-clock time in nanoseconds since the epoch.
///
/// Saturates at `i64::MAX` past the year 2262, where chrono can no longer represent
/// the value in nanoseconds.
pub fn now() -> Time {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}
