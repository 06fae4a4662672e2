//! # Order Actor
//!
//! Orders are created at checkout and afterwards only move through the status
//! lifecycle; they are never edited or deleted.
//!
//! Checkout runs inside the collection: `from_create_params` validates the
//! cart and mints the [`OrderNumber`](crate::order_number::OrderNumber) from
//! the insertion sequence, then `on_create` checks the customer and reserves
//! stock through the injected [`OrderContext`].

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::{CustomerClient, OrderClient, ProductClient};
use crate::framework::CollectionActor;
use crate::model::Order;
use crate::order_number::OverflowPolicy;

/// Dependencies handed to the Order collection at `run()`.
#[derive(Clone)]
pub struct OrderContext {
    pub customers: CustomerClient,
    pub products: ProductClient,
    pub overflow: OverflowPolicy,
}

/// Creates the Order collection and its typed client.
pub fn new(buffer_size: usize) -> (CollectionActor<Order>, OrderClient) {
    let (actor, generic_client) = CollectionActor::new(buffer_size);
    (actor, OrderClient::new(generic_client))
}
