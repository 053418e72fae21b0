//! # Ordering Service
//!
//! The remote operation surface. Every call carries the caller's [`Principal`], which
//! the transport has already authenticated. Access levels:
//!
//! | Operation | Access |
//! |---|---|
//! | `place_order` | authenticated |
//! | `complete_order`, `get_all_current_orders`, `get_order` | admin |
//! | `add_or_update_stock_item`, `get_all_stock_items` | admin |
//! | `get_stock_status` | anyone |
//! | `get_caller_user_profile`, `save_caller_user_profile` | self |
//! | `get_user_profile` | admin |
//! | `get_caller_user_role`, `is_caller_admin` | self |
//! | `assign_caller_user_role` | admin |

pub mod access;
pub mod error;

pub use access::ServicePolicy;
pub use error::ServiceError;

use crate::clients::{ActorClient, OrderClient, RoleClient, StockClient, UserClient};
use crate::model::{
    now, Order, OrderCreate, OrderId, Principal, Product, ProductId, RoleAssign, StockItem, UserProfile,
    UserRole,
};
use access::{normalize_profile, require_admin, require_authenticated, validate_order, validate_products};
use tracing::{info, instrument};

/// Cheap to clone; every clone talks to the same actors.
#[derive(Clone)]
pub struct OrderingService {
    orders: OrderClient,
    stock: StockClient,
    users: UserClient,
    roles: RoleClient,
    policy: ServicePolicy,
}

impl OrderingService {
    pub fn new(
        orders: OrderClient,
        stock: StockClient,
        users: UserClient,
        roles: RoleClient,
        policy: ServicePolicy,
    ) -> Self {
        Self {
            orders,
            stock,
            users,
            roles,
            policy,
        }
    }

    pub fn policy(&self) -> &ServicePolicy {
        &self.policy
    }

    // --- Orders ---

    /// Places an order stamped with the caller and the current time.
    #[instrument(skip(self, products), fields(%caller, products = products.len()))]
    pub async fn place_order(
        &self,
        caller: &Principal,
        products: Vec<Product>,
        quantity: u32,
        room_number: &str,
    ) -> Result<OrderId, ServiceError> {
        require_authenticated(caller, "placeOrder")?;
        let room_number = validate_order(&self.policy, &products, quantity, room_number)?;

        let id = self
            .orders
            .place_order(OrderCreate {
                customer: caller.clone(),
                room_number,
                timestamp: now(),
                quantity,
                products,
            })
            .await?;
        info!(order_id = %id, "Order placed");
        Ok(id)
    }

    #[instrument(skip(self), fields(%caller))]
    pub async fn get_order(&self, caller: &Principal, id: OrderId) -> Result<Order, ServiceError> {
        self.ensure_admin(caller, "getOrder").await?;
        self.orders
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// All orders, pending and completed, in placement order.
    #[instrument(skip(self), fields(%caller))]
    pub async fn get_all_current_orders(&self, caller: &Principal) -> Result<Vec<Order>, ServiceError> {
        self.ensure_admin(caller, "getAllCurrentOrders").await?;
        Ok(self.orders.list().await?)
    }

    /// Marks the order completed. Completing it again succeeds and changes nothing.
    #[instrument(skip(self), fields(%caller))]
    pub async fn complete_order(&self, caller: &Principal, id: OrderId) -> Result<OrderId, ServiceError> {
        self.ensure_admin(caller, "completeOrder").await?;
        let changed = self.orders.complete_order(id).await?;
        info!(order_id = %id, changed, "Order completed");
        Ok(id)
    }

    // --- Stock ---

    #[instrument(skip(self, product), fields(%caller, product_id = %product.id))]
    pub async fn add_or_update_stock_item(
        &self,
        caller: &Principal,
        product: Product,
        in_stock: bool,
    ) -> Result<(), ServiceError> {
        self.ensure_admin(caller, "addOrUpdateStockItem").await?;
        validate_products(std::slice::from_ref(&product))?;
        self.stock.set_stock(product, in_stock).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(%caller))]
    pub async fn get_all_stock_items(&self, caller: &Principal) -> Result<Vec<StockItem>, ServiceError> {
        self.ensure_admin(caller, "getAllStockItems").await?;
        Ok(self.stock.list().await?)
    }

    /// Never fails for an unknown product; it is simply not in stock.
    #[instrument(skip(self), fields(%caller))]
    pub async fn get_stock_status(&self, caller: &Principal, product_id: ProductId) -> Result<bool, ServiceError> {
        Ok(self.stock.get_stock_status(product_id).await?)
    }

    // --- Profiles ---

    #[instrument(skip(self), fields(%caller))]
    pub async fn get_caller_user_profile(&self, caller: &Principal) -> Result<Option<UserProfile>, ServiceError> {
        if caller.is_anonymous() {
            return Ok(None);
        }
        Ok(self.users.get(caller.clone()).await?)
    }

    /// Creates or replaces the caller's profile.
    #[instrument(skip(self, profile), fields(%caller))]
    pub async fn save_caller_user_profile(
        &self,
        caller: &Principal,
        profile: UserProfile,
    ) -> Result<(), ServiceError> {
        require_authenticated(caller, "saveCallerUserProfile")?;
        let profile = normalize_profile(profile)?;
        self.users.save_profile(caller.clone(), profile).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(%caller))]
    pub async fn get_user_profile(
        &self,
        caller: &Principal,
        identity: &Principal,
    ) -> Result<Option<UserProfile>, ServiceError> {
        self.ensure_admin(caller, "getUserProfile").await?;
        Ok(self.users.get(identity.clone()).await?)
    }

    // --- Roles ---

    #[instrument(skip(self), fields(%caller))]
    pub async fn get_caller_user_role(&self, caller: &Principal) -> Result<UserRole, ServiceError> {
        self.role_of(caller).await
    }

    #[instrument(skip(self), fields(%caller))]
    pub async fn is_caller_admin(&self, caller: &Principal) -> Result<bool, ServiceError> {
        Ok(self.role_of(caller).await?.is_admin())
    }

    /// Assigns `role` to `identity`. The target is left untouched unless the caller is
    /// an admin.
    #[instrument(skip(self), fields(%caller))]
    pub async fn assign_caller_user_role(
        &self,
        caller: &Principal,
        identity: &Principal,
        role: UserRole,
    ) -> Result<(), ServiceError> {
        self.ensure_admin(caller, "assignCallerUserRole").await?;
        if identity.is_anonymous() {
            return Err(ServiceError::InvalidArgument(
                "the anonymous principal is always a guest".into(),
            ));
        }
        self.roles
            .assign_role(
                identity.clone(),
                RoleAssign {
                    role,
                    assigned_by: Some(caller.clone()),
                    assigned_at: now(),
                },
            )
            .await?;
        info!(%identity, %role, "Role assigned");
        Ok(())
    }

    async fn role_of(&self, principal: &Principal) -> Result<UserRole, ServiceError> {
        if principal.is_anonymous() {
            return Ok(UserRole::Guest);
        }
        let assigned = self.roles.assigned_role(principal.clone()).await?;
        Ok(assigned.unwrap_or(UserRole::User))
    }

    async fn ensure_admin(&self, caller: &Principal, operation: &str) -> Result<(), ServiceError> {
        let is_admin = self.role_of(caller).await?.is_admin();
        require_admin(caller, is_admin, operation)
    }
}
