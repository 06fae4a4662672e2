use super::ConnectionId;
use thiserror::Error;

/// Errors surfaced to callers of the tracking service.
///
/// Delivery failures to individual subscribers never appear here; the hub
/// absorbs them.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TrackingError {
    /// The order identifier is empty or malformed.
    #[error("Invalid order reference: {0}")]
    InvalidOrderReference(String),

    /// The access policy refused the subscription.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unknown customer: {0}")]
    UnknownCustomer(String),

    /// The connection was never registered or has already gone away.
    #[error("Unknown connection: {0}")]
    UnknownConnection(ConnectionId),

    /// A lookup against the order or customer collection failed.
    #[error("Lookup failed: {0}")]
    Lookup(String),

    #[error("Tracking hub closed")]
    HubClosed,

    #[error("Tracking hub dropped response channel")]
    HubDropped,
}
