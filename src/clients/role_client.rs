//! # Role Client
//!
//! High-level API for the `RoleAssignment` actor.
use crate::clients::actor_client::ActorClient;
use crate::framework::ResourceClient;
use crate::model::{Principal, RoleAssign, RoleAssignment, UserRole};
use crate::role_actor::RoleError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Role actor.
#[derive(Clone)]
pub struct RoleClient {
    inner: ResourceClient<RoleAssignment>,
}

impl RoleClient {
    pub fn new(inner: ResourceClient<RoleAssignment>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, assignment), fields(role = %assignment.role))]
    pub async fn assign_role(&self, principal: Principal, assignment: RoleAssign) -> Result<(), RoleError> {
        debug!("Sending request");
        self.inner
            .put(principal, assignment)
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }

    /// The explicitly assigned role, if any.
    #[instrument(skip(self))]
    pub async fn assigned_role(&self, principal: Principal) -> Result<Option<UserRole>, RoleError> {
        let assignment = self.get(principal).await?;
        Ok(assignment.map(|a| a.role))
    }
}

#[async_trait]
impl ActorClient<RoleAssignment> for RoleClient {
    type Error = RoleError;

    fn inner(&self) -> &ResourceClient<RoleAssignment> {
        &self.inner
    }
}
