//! # Role Actor
//!
//! Stores explicit [`RoleAssignment`]s keyed by principal. Principals without an
//! assignment fall back to a default role decided by the service layer.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::RoleClient;
use crate::framework::ResourceActor;
use crate::model::RoleAssignment;

/// Creates a new Role actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<RoleAssignment>, RoleClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, RoleClient::new(generic_client))
}
