//! # Observability & Tracing
//!
//! Compact, structured logs. Module paths are hidden (`with_target(false)`); actor
//! logs carry an `entity_type` field instead.
//!
//! ```bash
//! # default
//! RUST_LOG=info cargo run
//!
//! # full payloads at entry points, every Get/Put/List
//! RUST_LOG=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a placed order reads:
//!
//! ```text
//! INFO place_order{caller=customer-1 products=1 quantity=2 room_number="101"}: Sending place_order to actor
//! INFO place_order{...}: Created entity_type="Order" id=order_1 size=1
//! INFO place_order{...}: Order placed order_id=order_1
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` overrides the default `info` filter.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // entity_type replaces module paths
        .compact()
        .try_init();
}
