use super::SystemConfig;
use crate::clients::RoleClient;
use crate::model::{now, Principal, RoleAssign, UserRole};
use crate::order_actor::OrderContext;
use crate::service::{OrderingService, ServiceError, ServicePolicy};
use crate::sync::{SyncClient, SyncSettings};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running order desk: four actors behind one [`OrderingService`].
///
/// # Architecture
///
/// - **Order actor**: orders, with the stock client injected when stock is enforced
/// - **Stock actor**: one flag per product
/// - **User actor**: one profile per principal
/// - **Role actor**: explicit role assignments
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::start(SystemConfig::default()).await?;
/// let id = system.service().place_order(&customer, products, 2, "101").await?;
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    service: OrderingService,
    settings: SyncSettings,
    handles: Vec<JoinHandle<()>>,
}

impl OrderSystem {
    /// Spawns the actors, wires them together and seeds the configured admins.
    pub async fn start(config: SystemConfig) -> Result<Self, ServiceError> {
        let buffer = config.channel_buffer;

        // 1. Create actors
        let (stock_actor, stock_client) = crate::stock_actor::new(buffer);
        let (user_actor, user_client) = crate::user_actor::new(buffer);
        let (role_actor, role_client) = crate::role_actor::new(buffer);
        let (order_actor, order_client) = crate::order_actor::new(buffer);

        // 2. Start actors with injected context
        let order_context = if config.enforce_stock {
            OrderContext::enforcing(stock_client.clone())
        } else {
            OrderContext::unchecked()
        };
        let handles = vec![
            tokio::spawn(order_actor.run(order_context)),
            tokio::spawn(stock_actor.run(())),
            tokio::spawn(user_actor.run(())),
            tokio::spawn(role_actor.run(())),
        ];

        // 3. Bootstrap admins
        seed_admins(&role_client, &config.admins).await?;

        let service = OrderingService::new(
            order_client,
            stock_client,
            user_client,
            role_client,
            ServicePolicy {
                max_order_quantity: config.max_order_quantity,
            },
        );
        info!(enforce_stock = config.enforce_stock, "Order desk started");

        Ok(Self {
            service,
            settings: SyncSettings {
                stock_poll_interval: config.stock_poll_interval,
                orders_poll_interval: config.orders_poll_interval,
            },
            handles,
        })
    }

    pub fn service(&self) -> &OrderingService {
        &self.service
    }

    /// A sync client acting as `caller`, polling at the configured intervals.
    pub fn sync_client(&self, caller: Principal) -> SyncClient {
        SyncClient::new(self.service.clone(), caller, self.settings)
    }

    /// Drops the system's clients and waits for every actor to finish.
    ///
    /// Actors stop once every client clone is gone, so service clones and sync
    /// clients handed out earlier must be dropped before awaiting this.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down order desk...");
        drop(self.service);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Order desk shutdown complete.");
        Ok(())
    }
}

async fn seed_admins(roles: &RoleClient, admins: &[Principal]) -> Result<(), ServiceError> {
    for admin in admins {
        let assignment = RoleAssign {
            role: UserRole::Admin,
            assigned_by: None,
            assigned_at: now(),
        };
        roles.assign_role(admin.clone(), assignment).await?;
        info!(%admin, "Bootstrap admin");
    }
    Ok(())
}
