//! # Order Desk
//!
//! A small ordering service: customers order a product to their room, sellers toggle
//! stock and complete orders.
//!
//! ## Architecture Notes
//!
//! ### 1. One actor per resource
//! Orders, stock items, profiles and role assignments each live in their own
//! [`ResourceActor`](framework::ResourceActor). An actor processes one message to
//! completion before the next, so there are no locks around state and no partially
//! applied mutation is ever observable.
//!
//! ### 2. Type-safe errors
//! Each actor defines its own error type (`OrderError`, `StockError`, ...). The
//! [`service`] layer folds them into [`ServiceError`](service::ServiceError), the error
//! vocabulary of the remote surface.
//!
//! ### 3. Context injection
//! The order actor receives the stock client at `run()` time and uses it to refuse
//! orders for out-of-stock products.
//!
//! ### 4. Observability
//! `tracing` everywhere. See [`lifecycle::tracing`].
//!
//! ## Module Tour
//!
//! - [`framework`]: generic actor, client, and the [`mock`](framework::mock) test kit
//! - [`model`]: plain data ([`Order`](model::Order), [`StockItem`](model::StockItem), ...)
//! - [`order_actor`], [`stock_actor`], [`user_actor`], [`role_actor`]: entity impls
//! - [`clients`]: typed wrappers over the generic client
//! - [`service`]: [`OrderingService`](service::OrderingService) with access checks
//! - [`sync`]: polling queries, invalidation, optimistic toggles
//! - [`lifecycle`]: configuration, startup and shutdown
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod role_actor;
pub mod service;
pub mod stock_actor;
pub mod sync;
pub mod user_actor;
