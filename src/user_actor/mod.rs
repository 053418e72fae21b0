//! # User Actor
//!
//! Stores one [`UserProfile`] per [`Principal`](crate::model::Principal).
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`UserProfile`]
//! - [`error`] - [`UserError`] type for type-safe error handling
//! - [`new()`] - Factory function that creates the actor and client
//!
//! A profile is created by the first save and replaced wholesale by every later one.
//! Looking up a principal that never saved a profile yields `None`, not an error.
//! Roles live in a separate actor ([`crate::role_actor`]) so that saving a profile can
//! never touch a role.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::UserClient;
use crate::framework::ResourceActor;
use crate::model::UserProfile;

/// Creates a new User actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<UserProfile>, UserClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, UserClient::new(generic_client))
}
