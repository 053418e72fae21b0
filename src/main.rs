//! Demo round trip: a seller stocks a product, a customer orders it, the seller
//! completes the order.

use order_desk::lifecycle::{setup_tracing, OrderSystem, SystemConfig};
use order_desk::model::{Principal, Product, UserProfile};
use order_desk::sync::partition_orders;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let mut config = SystemConfig::from_env().map_err(|e| e.to_string())?;
    if config.admins.is_empty() {
        config.admins.push(Principal::new("seller"));
    }
    let seller = config.admins[0].clone();

    let system = OrderSystem::start(config).await.map_err(|e| e.to_string())?;
    let customer = Principal::new("customer-1");
    let stick = Product::new(1, "Stick");

    let seller_client = system.sync_client(seller);
    let customer_client = system.sync_client(customer);

    let span = tracing::info_span!("stocking");
    async {
        let toggle = seller_client.stock_toggle(stick.clone(), false);
        toggle.set(true).await
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    let span = tracing::info_span!("ordering");
    let placed = async {
        customer_client
            .save_profile(UserProfile::new("Asha", Some("101".into())))
            .await?;
        customer_client.place_order(vec![stick.clone()], 2, "101").await
    }
    .instrument(span)
    .await;

    match placed {
        Ok(order_id) => {
            info!(%order_id, "Order placed");
            seller_client
                .complete_order(order_id)
                .await
                .map_err(|e| e.to_string())?;
        }
        Err(e) => error!(error = %e, "Order failed"),
    }

    let orders = seller_client.seller_orders();
    let mut state = orders.subscribe();
    let settled = state
        .wait_for(|s| !s.is_loading())
        .await
        .map_err(|e| e.to_string())?
        .clone();
    let (pending, completed) = partition_orders(settled.data.unwrap_or_default());
    info!(pending = pending.len(), completed = completed.len(), "Seller dashboard");

    drop(state);
    drop(orders);
    drop(seller_client);
    drop(customer_client);
    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
