//! # Client Sync Layer
//!
//! What a UI needs to stay in step with the service without blocking:
//!
//! - [`PolledQuery`]: a value refreshed on an interval and on invalidation, published
//!   as [`QueryState`] (`data`, `error`, `is_fetching`).
//! - [`SyncClient`]: per-caller queries plus mutations that invalidate the affected
//!   [`QueryScope`] on success and on failure.
//! - [`StockToggle`]: optimistic stock checkbox with rollback.

pub mod client;
pub mod query;

pub use client::{partition_orders, StockToggle, SyncClient, SyncSettings};
pub use query::{PolledQuery, QueryScope, QuerySource, QueryState};
