//! # Uthraa Orders
//!
//! Order numbering, checkout and live order tracking for the Uthraa Naturals
//! storefront, built as a set of Tokio actors.
//!
//! ## Concurrency Model
//!
//! Each collection (customers, products, orders) is a
//! [`CollectionActor`](framework::CollectionActor) running in its own task and
//! answering requests one at a time, so its state needs no locks. Actors that
//! depend on others receive their clients at `run()` time.
//!
//! The [`TrackingHub`](tracking::TrackingHub) is the same idea for channel
//! memberships: one task, created once by [`Storefront`](lifecycle::Storefront),
//! reached through cloneable handles.
//!
//! ## Module Tour
//!
//! - [`framework`] - the generic collection actor, its client and mocks
//! - [`model`] - plain data types
//! - [`order_number`] - `ORD00001` formatting and reference normalisation
//! - [`customer_actor`], [`product_actor`], [`order_actor`] - record hooks and actions
//! - [`clients`] - typed clients; [`OrderClient::resolve`](clients::OrderClient::resolve)
//!   finds an order by any of its identifiers
//! - [`tracking`] - subscriptions, status pushes and the TCP gateway
//! - [`admin`] - status changes by staff, with notification
//! - [`lifecycle`] - start-up, wiring, shutdown and tracing
//! - [`config`] - TOML configuration with `UTHRAA_*` overrides
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! # then, in another shell
//! printf '{"event":"join-order-tracking","data":{"orderId":"#ORD00001"}}\n' | nc 127.0.0.1 7400
//! ```

pub mod admin;
pub mod clients;
pub mod config;
pub mod customer_actor;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod order_number;
pub mod product_actor;
pub mod tracking;
