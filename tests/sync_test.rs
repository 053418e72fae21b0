//! Client sync layer against a real order desk.

use order_desk::lifecycle::{OrderSystem, SystemConfig};
use order_desk::model::{Principal, Product, UserProfile, UserRole};
use order_desk::service::ServiceError;
use order_desk::sync::{partition_orders, QueryState};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;

fn seller() -> Principal {
    Principal::new("seller")
}

fn stick() -> Product {
    Product::new(1, "Stick")
}

async fn start(poll: Duration) -> OrderSystem {
    OrderSystem::start(SystemConfig {
        admins: vec![seller()],
        stock_poll_interval: poll,
        orders_poll_interval: poll,
        ..SystemConfig::default()
    })
    .await
    .expect("system failed to start")
}

/// Waits (bounded) until the query state satisfies `f`.
async fn until<T: Clone>(
    rx: &mut watch::Receiver<QueryState<T>>,
    f: impl FnMut(&QueryState<T>) -> bool,
) -> QueryState<T> {
    timeout(Duration::from_secs(2), rx.wait_for(f))
        .await
        .expect("query never reached the expected state")
        .expect("query task stopped")
        .clone()
}

#[tokio::test]
async fn test_mutation_invalidates_orders_query() {
    // long interval: only invalidation can explain a refetch
    let system = start(Duration::from_secs(60)).await;
    let seller_client = system.sync_client(seller());
    let customer_client = system.sync_client(Principal::new("customer-1"));
    seller_client.update_stock(stick(), true).await.unwrap();

    let orders = seller_client.seller_orders();
    let mut rx = orders.subscribe();
    let first = until(&mut rx, |s| s.fetch_count == 1).await;
    assert_eq!(first.data, Some(vec![]));

    let id = customer_client.place_order(vec![stick()], 2, "101").await.unwrap();
    // placed through another client: nothing refetched yet
    assert_eq!(orders.state().fetch_count, 1);

    seller_client.complete_order(id).await.unwrap();
    let refreshed = until(&mut rx, |s| s.fetch_count == 2).await;
    let data = refreshed.data.unwrap();
    assert_eq!(data.len(), 1);
    assert!(data[0].is_completed);

    drop((rx, orders, seller_client, customer_client));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_failed_mutation_still_invalidates() {
    let system = start(Duration::from_secs(60)).await;
    let seller_client = system.sync_client(seller());

    let orders = seller_client.seller_orders();
    let mut rx = orders.subscribe();
    until(&mut rx, |s| s.fetch_count == 1).await;

    // nothing is in stock, so the desk refuses the order
    let err = seller_client.place_order(vec![stick()], 1, "101").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));
    until(&mut rx, |s| s.fetch_count == 2).await;
    assert!(!seller_client.is_pending());

    drop((rx, orders, seller_client));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_seller_orders_sorted_newest_first_and_polled() {
    let system = start(Duration::from_millis(20)).await;
    let seller_client = system.sync_client(seller());
    let service = system.service().clone();
    service.add_or_update_stock_item(&seller(), stick(), true).await.unwrap();

    let orders = seller_client.seller_orders();
    let mut rx = orders.subscribe();

    // placed behind the client's back; polling picks them up
    for room in ["101", "102", "103"] {
        service.place_order(&seller(), vec![stick()], 1, room).await.unwrap();
    }
    let state = until(&mut rx, |s| s.data.as_ref().is_some_and(|d| d.len() == 3)).await;
    let rooms: Vec<_> = state.data.unwrap().iter().map(|o| o.room_number.clone()).collect();
    assert_eq!(rooms, vec!["103", "102", "101"]);

    drop((rx, orders, seller_client, service));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_customer_sees_permission_error_on_orders() {
    let system = start(Duration::from_secs(60)).await;
    let customer_client = system.sync_client(Principal::new("customer-1"));

    let orders = customer_client.seller_orders();
    let mut rx = orders.subscribe();
    let state = until(&mut rx, |s| s.fetch_count == 1).await;
    assert!(!state.is_loading());
    assert!(matches!(state.error, Some(ServiceError::PermissionDenied(_))));

    drop((rx, orders, customer_client));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_stock_status_query_follows_updates() {
    let system = start(Duration::from_secs(60)).await;
    let seller_client = system.sync_client(seller());

    let status = seller_client.stock_status(stick().id);
    let mut rx = status.subscribe();
    assert_eq!(until(&mut rx, |s| s.fetch_count == 1).await.data, Some(false));

    seller_client.update_stock(stick(), true).await.unwrap();
    assert_eq!(until(&mut rx, |s| s.fetch_count == 2).await.data, Some(true));

    drop((rx, status, seller_client));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_caller_is_admin_refetches_on_invalidate() {
    let system = start(Duration::from_secs(60)).await;
    let newcomer = Principal::new("newcomer");
    let client = system.sync_client(newcomer.clone());

    let is_admin = client.caller_is_admin();
    let mut rx = is_admin.subscribe();
    assert_eq!(until(&mut rx, |s| s.fetch_count == 1).await.data, Some(false));

    system
        .service()
        .assign_caller_user_role(&seller(), &newcomer, UserRole::Admin)
        .await
        .unwrap();
    is_admin.refetch();
    assert_eq!(until(&mut rx, |s| s.fetch_count == 2).await.data, Some(true));

    drop((rx, is_admin, client));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_save_profile_refreshes_profile_query() {
    let system = start(Duration::from_secs(60)).await;
    let client = system.sync_client(Principal::new("customer-1"));

    let profile = client.caller_profile();
    let mut rx = profile.subscribe();
    assert_eq!(until(&mut rx, |s| s.fetch_count == 1).await.data, Some(None));

    client.save_profile(UserProfile::new("Asha", Some("101".into()))).await.unwrap();
    let state = until(&mut rx, |s| s.fetch_count == 2).await;
    assert_eq!(state.data, Some(Some(UserProfile::new("Asha", Some("101".into())))));

    drop((rx, profile, client));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_stock_toggle_is_optimistic_and_rolls_back() {
    let system = start(Duration::from_secs(60)).await;
    let seller_client = system.sync_client(seller());
    let customer_client = system.sync_client(Principal::new("customer-1"));

    let toggle = seller_client.stock_toggle(stick(), false);
    toggle.set(true).await.unwrap();
    assert!(toggle.is_checked());
    assert!(system.service().get_stock_status(&seller(), stick().id).await.unwrap());

    // a customer may not change stock: the checkbox snaps back
    let customer_toggle = customer_client.stock_toggle(stick(), true);
    let mut shown = customer_toggle.subscribe();
    let err = customer_toggle.set(false).await.unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied(_)));
    assert!(customer_toggle.is_checked());
    assert!(*shown.borrow_and_update());

    toggle.sync_from_server(false);
    assert!(!toggle.is_checked());

    drop((shown, toggle, customer_toggle, seller_client, customer_client));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_dashboard_partition() {
    let system = start(Duration::from_secs(60)).await;
    let seller_client = system.sync_client(seller());
    seller_client.update_stock(stick(), true).await.unwrap();

    let first = seller_client.place_order(vec![stick()], 2, "101").await.unwrap();
    seller_client.place_order(vec![stick()], 1, "102").await.unwrap();
    seller_client.complete_order(first).await.unwrap();

    let orders = system.service().get_all_current_orders(&seller()).await.unwrap();
    let (pending, completed) = partition_orders(orders);
    assert_eq!(pending.len(), 1);
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, first);

    drop(seller_client);
    system.shutdown().await.unwrap();
}
