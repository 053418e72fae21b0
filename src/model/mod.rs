//! Pure data structures shared by the actors, the service and the sync layer.
//!
//! Entity types here implement [`ActorEntity`](crate::framework::ActorEntity) in their
//! `*_actor` modules.

pub mod order;
pub mod product;
pub mod user;

pub use order::*;
pub use product::*;
pub use user::*;
