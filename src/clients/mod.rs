//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).

pub mod actor_client;
pub mod order_client;
pub mod role_client;
pub mod stock_client;
pub mod user_client;

pub use actor_client::ActorClient;
pub use order_client::*;
pub use role_client::*;
pub use stock_client::*;
pub use user_client::*;
