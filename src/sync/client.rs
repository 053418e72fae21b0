use super::query::{PolledQuery, QueryScope, QuerySource};
use crate::model::{Order, OrderId, Principal, Product, ProductId, UserProfile};
use crate::service::{OrderingService, ServiceError};
use async_trait::async_trait;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tracing::{debug, instrument, warn};

/// Polling periods for the client's queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    pub stock_poll_interval: Duration,
    pub orders_poll_interval: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            stock_poll_interval: Duration::from_secs(5),
            orders_poll_interval: Duration::from_secs(10),
        }
    }
}

/// One caller's view of the service.
///
/// Queries returned from here refetch whenever a mutation made through the same
/// `SyncClient` (or a clone) touches their scope.
#[derive(Clone)]
pub struct SyncClient {
    service: OrderingService,
    caller: Principal,
    settings: SyncSettings,
    invalidations: broadcast::Sender<QueryScope>,
    in_flight: Arc<AtomicUsize>,
}

impl SyncClient {
    pub fn new(service: OrderingService, caller: Principal, settings: SyncSettings) -> Self {
        let (invalidations, _) = broadcast::channel(16);
        Self {
            service,
            caller,
            settings,
            invalidations,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn caller(&self) -> &Principal {
        &self.caller
    }

    /// True while any mutation started from this client is still running.
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Forces every query in `scope` to refetch.
    pub fn invalidate(&self, scope: QueryScope) {
        // no live queries is not an error
        let _ = self.invalidations.send(scope);
    }

    // --- Queries ---

    /// Availability of one product. A failed fetch reads as out of stock.
    pub fn stock_status(&self, product_id: ProductId) -> PolledQuery<bool> {
        self.spawn(
            StockStatusQuery {
                service: self.service.clone(),
                caller: self.caller.clone(),
                product_id,
            },
            QueryScope::StockStatus,
            Some(self.settings.stock_poll_interval),
        )
    }

    /// Every order, newest first.
    pub fn seller_orders(&self) -> PolledQuery<Vec<Order>> {
        self.spawn(
            SellerOrdersQuery {
                service: self.service.clone(),
                caller: self.caller.clone(),
            },
            QueryScope::Orders,
            Some(self.settings.orders_poll_interval),
        )
    }

    pub fn caller_is_admin(&self) -> PolledQuery<bool> {
        self.spawn(
            CallerIsAdminQuery {
                service: self.service.clone(),
                caller: self.caller.clone(),
            },
            QueryScope::CallerRole,
            None,
        )
    }

    pub fn caller_profile(&self) -> PolledQuery<Option<UserProfile>> {
        self.spawn(
            CallerProfileQuery {
                service: self.service.clone(),
                caller: self.caller.clone(),
            },
            QueryScope::CallerProfile,
            None,
        )
    }

    fn spawn<S: QuerySource>(&self, source: S, scope: QueryScope, every: Option<Duration>) -> PolledQuery<S::Output> {
        PolledQuery::spawn(source, scope, every, self.invalidations.subscribe())
    }

    // --- Mutations ---

    pub async fn place_order(
        &self,
        products: Vec<Product>,
        quantity: u32,
        room_number: &str,
    ) -> Result<OrderId, ServiceError> {
        self.mutate(
            QueryScope::Orders,
            self.service.place_order(&self.caller, products, quantity, room_number),
        )
        .await
    }

    pub async fn complete_order(&self, id: OrderId) -> Result<OrderId, ServiceError> {
        self.mutate(QueryScope::Orders, self.service.complete_order(&self.caller, id))
            .await
    }

    pub async fn update_stock(&self, product: Product, in_stock: bool) -> Result<(), ServiceError> {
        self.mutate(
            QueryScope::StockStatus,
            self.service.add_or_update_stock_item(&self.caller, product, in_stock),
        )
        .await
    }

    pub async fn save_profile(&self, profile: UserProfile) -> Result<(), ServiceError> {
        self.mutate(
            QueryScope::CallerProfile,
            self.service.save_caller_user_profile(&self.caller, profile),
        )
        .await
    }

    /// Starts an optimistic toggle for `product`, showing `initial` until told otherwise.
    pub fn stock_toggle(&self, product: Product, initial: bool) -> StockToggle {
        let (checked, _) = watch::channel(initial);
        StockToggle {
            client: self.clone(),
            product,
            checked,
        }
    }

    /// Runs the call, then invalidates `scope` whatever the outcome so the next read
    /// reflects the server rather than an assumed result.
    #[instrument(skip(self, call), fields(caller = %self.caller))]
    async fn mutate<R>(
        &self,
        scope: QueryScope,
        call: impl Future<Output = Result<R, ServiceError>>,
    ) -> Result<R, ServiceError> {
        let _pending = InFlight::enter(&self.in_flight);
        let result = call.await;
        if let Err(e) = &result {
            warn!(error = %e, "Mutation failed");
        }
        debug!(?scope, "Invalidating");
        self.invalidate(scope);
        result
    }
}

/// Keeps the in-flight count right even if the mutation future is dropped midway.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(count)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Splits orders for the seller dashboard into `(pending, completed)`, keeping order.
pub fn partition_orders(orders: Vec<Order>) -> (Vec<Order>, Vec<Order>) {
    orders.into_iter().partition(Order::is_pending)
}

/// A stock checkbox that flips immediately and rolls back if the server refuses.
pub struct StockToggle {
    client: SyncClient,
    product: Product,
    checked: watch::Sender<bool>,
}

impl StockToggle {
    pub fn is_checked(&self) -> bool {
        *self.checked.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.checked.subscribe()
    }

    /// Shows `checked` right away, then asks the server. On failure the previous value
    /// is restored and the error returned, unless a later `set` has already published
    /// a newer value.
    pub async fn set(&self, checked: bool) -> Result<(), ServiceError> {
        let previous = self.checked.send_replace(checked);
        match self.client.update_stock(self.product.clone(), checked).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.checked.send_if_modified(|shown| {
                    let still_ours = *shown == checked;
                    if still_ours {
                        *shown = previous;
                    }
                    still_ours
                });
                Err(e)
            }
        }
    }

    /// Adopts the value from a polled [`stock_status`](SyncClient::stock_status) query.
    pub fn sync_from_server(&self, in_stock: bool) {
        self.checked.send_replace(in_stock);
    }
}

// --- Query sources ---

struct StockStatusQuery {
    service: OrderingService,
    caller: Principal,
    product_id: ProductId,
}

#[async_trait]
impl QuerySource for StockStatusQuery {
    type Output = bool;

    async fn fetch(&self) -> Result<bool, ServiceError> {
        match self.service.get_stock_status(&self.caller, self.product_id).await {
            Ok(in_stock) => Ok(in_stock),
            Err(e) => {
                warn!(product_id = %self.product_id, error = %e, "Stock check failed, showing out of stock");
                Ok(false)
            }
        }
    }
}

struct SellerOrdersQuery {
    service: OrderingService,
    caller: Principal,
}

#[async_trait]
impl QuerySource for SellerOrdersQuery {
    type Output = Vec<Order>;

    async fn fetch(&self) -> Result<Vec<Order>, ServiceError> {
        let mut orders = self.service.get_all_current_orders(&self.caller).await?;
        orders.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(orders)
    }
}

struct CallerIsAdminQuery {
    service: OrderingService,
    caller: Principal,
}

#[async_trait]
impl QuerySource for CallerIsAdminQuery {
    type Output = bool;

    async fn fetch(&self) -> Result<bool, ServiceError> {
        self.service.is_caller_admin(&self.caller).await
    }
}

struct CallerProfileQuery {
    service: OrderingService,
    caller: Principal,
}

#[async_trait]
impl QuerySource for CallerProfileQuery {
    type Output = Option<UserProfile>;

    async fn fetch(&self) -> Result<Option<UserProfile>, ServiceError> {
        self.service.get_caller_user_profile(&self.caller).await
    }
}
