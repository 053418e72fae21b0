//! ActorEntity trait implementation for the RoleAssignment domain type.

use super::RoleError;
use crate::framework::ActorEntity;
use crate::model::{Principal, RoleAssign, RoleAssignment};
use async_trait::async_trait;
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for RoleAssignment {
    type Id = Principal;
    type Create = RoleAssign;
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = RoleError;

    /// The anonymous principal is always a guest and cannot be assigned anything.
    fn from_create_params(principal: Principal, params: RoleAssign) -> Result<Self, RoleError> {
        if principal.is_anonymous() {
            return Err(RoleError::ValidationError(
                "the anonymous principal cannot hold a role".into(),
            ));
        }
        Ok(Self {
            principal,
            role: params.role,
            assigned_by: params.assigned_by,
            assigned_at: params.assigned_at,
        })
    }

    async fn handle_action(&mut self, action: Infallible, _ctx: &()) -> Result<(), RoleError> {
        match action {}
    }
}
