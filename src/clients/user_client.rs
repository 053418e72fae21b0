//! # User Client
//!
//! High-level API for the `UserProfile` actor.
use crate::clients::actor_client::ActorClient;
use crate::framework::ResourceClient;
use crate::model::{Principal, UserProfile};
use crate::user_actor::UserError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<UserProfile>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<UserProfile>) -> Self {
        Self { inner }
    }

    /// Creates or replaces the owner's profile.
    #[instrument(skip(self, profile))]
    pub async fn save_profile(&self, owner: Principal, profile: UserProfile) -> Result<(), UserError> {
        debug!("Sending request");
        self.inner
            .put(owner, profile)
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<UserProfile> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient<UserProfile> {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;
    use crate::framework::FrameworkError;

    #[tokio::test]
    async fn test_save_profile_puts_under_owner() {
        let mut mock = MockClient::<UserProfile>::new();
        let owner = Principal::new("customer-1");
        mock.expect_put(owner.clone()).return_ok(Some(UserProfile::new("Old", None)));

        let client = UserClient::new(mock.client());
        client
            .save_profile(owner, UserProfile::new("Asha", None))
            .await
            .unwrap();
        mock.verify();
    }

    #[tokio::test]
    async fn test_rejected_profile_keeps_entity_error() {
        let mut mock = MockClient::<UserProfile>::new();
        let owner = Principal::new("customer-1");
        mock.expect_put(owner.clone()).return_err(FrameworkError::EntityError(Box::new(
            UserError::ValidationError("name is required".into()),
        )));

        let client = UserClient::new(mock.client());
        let err = client.save_profile(owner, UserProfile::new("", None)).await.unwrap_err();
        assert_eq!(err, UserError::ValidationError("name is required".into()));
        mock.verify();
    }
}
