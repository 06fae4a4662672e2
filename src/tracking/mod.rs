//! # Order Tracking
//!
//! Live status updates for orders. Clients join `order-<display id>` channels
//! and receive a [`StatusUpdate`] whenever an admin moves that order along.
//!
//! - [`TrackingHub`] - the actor that owns all channel memberships
//! - [`HubClient`] / [`TrackingConnection`] - handles onto the hub
//! - [`Tracker`] - the service object connection handlers share: reference
//!   parsing, [`AccessPolicy`], join/leave
//! - [`events`] - the JSON wire format
//! - [`gateway`] - TCP transport
//!
//! Delivery is best-effort and at most once. Nothing is persisted or replayed;
//! a client that reconnects should re-read the order.
//!
//! ```rust,ignore
//! let mut connection = tracker.connect().await?;
//! tracker.join(&connection, "#ORD00007").await?;
//! while let Some(update) = connection.recv().await {
//!     println!("{} is now {}", update.order_id, update.status);
//! }
//! ```

pub mod access;
pub mod client;
pub mod error;
pub mod events;
pub mod gateway;
pub mod hub;
pub mod tracker;

pub use access::AccessPolicy;
pub use client::{HubClient, TrackingConnection};
pub use error::TrackingError;
pub use events::{ClientEvent, ServerEvent, StatusUpdate};
pub use gateway::{Dispatcher, Gateway, GatewayError};
pub use hub::{ChannelName, ConnectionId, TrackingHub, CHANNEL_PREFIX};
pub use tracker::Tracker;
