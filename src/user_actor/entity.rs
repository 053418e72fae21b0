//! ActorEntity trait implementation for the UserProfile domain type.

use super::UserError;
use crate::framework::ActorEntity;
use crate::model::{Principal, UserProfile};
use async_trait::async_trait;
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for UserProfile {
    type Id = Principal;
    type Create = UserProfile;
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = UserError;

    fn from_create_params(_owner: Principal, profile: UserProfile) -> Result<Self, UserError> {
        if profile.name.trim().is_empty() {
            return Err(UserError::ValidationError("name is required".into()));
        }
        Ok(profile)
    }

    async fn handle_action(&mut self, action: Infallible, _ctx: &()) -> Result<(), UserError> {
        match action {}
    }
}
