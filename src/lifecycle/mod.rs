//! # System Lifecycle
//!
//! Starting, wiring and stopping the order desk.
//!
//! 1. [`SystemConfig`] is read from the environment (and `.env`).
//! 2. [`OrderSystem::start`] creates the four actors, injects the stock client into
//!    the order actor when stock is enforced, seeds the configured admins and builds
//!    the [`OrderingService`](crate::service::OrderingService).
//! 3. [`OrderSystem::shutdown`] drops the system's clients and waits for every actor.
//!
//! ```rust,ignore
//! setup_tracing();
//! let system = OrderSystem::start(SystemConfig::from_env()?).await?;
//! let seller = system.sync_client(Principal::new("seller"));
//! // ...
//! drop(seller);
//! system.shutdown().await?;
//! ```

pub mod config;
pub mod order_system;
pub mod tracing;

pub use config::{ConfigError, SystemConfig};
pub use order_system::OrderSystem;
pub use self::tracing::setup_tracing;
