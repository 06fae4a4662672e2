//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter. Module
//! paths are hidden (`with_target(false)`); the collection actors tag their
//! lines with `entity_type` instead, and the tracking hub with `channel`.
//!
//! `RUST_LOG` wins when set. Otherwise the configured `logging.filter`
//! (or `UTHRAA_LOG`) applies.
//!
//! ```bash
//! RUST_LOG=debug cargo run
//! UTHRAA_LOG="info,uthraa_orders::tracking=debug" cargo run
//! ```
//!
//! A checkout at `info` reads roughly:
//!
//! ```text
//! INFO Created entity_type="Customer" id=customer_1 sequence=1 size=1
//! INFO Action ok entity_type="Product" id=product_1
//! INFO Checkout complete order_number=ORD00001 total=52000
//! INFO Created entity_type="Order" id=6553f1000102030405000001 sequence=1 size=1
//! INFO Published channel=order-ORD00001 status=confirmed delivered=1
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Does nothing if one is already set.
pub fn setup_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // entity_type carries the context
        .compact()
        .try_init();
}
