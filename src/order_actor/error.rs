//! Error types for the Order actor.

use crate::model::OrderStatus;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// No order matches the reference.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The reference is empty or malformed; distinct from `NotFound`.
    #[error("Invalid order reference: {0}")]
    InvalidReference(String),

    /// The customer placing the order does not exist.
    #[error("Invalid customer: {0}")]
    InvalidCustomer(String),

    /// A line names a product that does not exist.
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    /// There is insufficient stock to fulfill a line.
    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: u32,
        available: u32,
    },

    #[error("Order has no items")]
    EmptyOrder,

    #[error("Invalid quantity for {0}: must be at least 1")]
    InvalidQuantity(String),

    /// Sequences are assigned from 1; a zero means the collection is misnumbering.
    #[error("Invalid order sequence: {0}")]
    InvalidSequence(u32),

    /// The order number space is used up under the `reject` overflow policy.
    #[error("Order numbers exhausted at sequence {0}")]
    SequenceExhausted(u32),

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Orders cannot be deleted")]
    DeletionForbidden,

    /// The acting customer is not an administrator.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
