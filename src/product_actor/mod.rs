//! # Product Actor
//!
//! The catalog, with stock kept per product. Checkout reserves stock through
//! [`ProductAction::ReserveStock`] and hands it back with
//! [`ProductAction::ReleaseStock`] if a later line of the same order fails.
//!
//! ## Structure
//!
//! - [`entity`] - [`Record`](crate::framework::Record) implementation for [`Product`]
//! - [`error`] - [`ProductError`]
//! - [`actions`] - [`ProductAction`] and [`ProductActionResult`]
//! - [`new()`] - creates the collection and its client

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::ProductClient;
use crate::framework::CollectionActor;
use crate::model::Product;

/// Creates the Product collection and its typed client.
pub fn new(buffer_size: usize) -> (CollectionActor<Product>, ProductClient) {
    let (actor, generic_client) = CollectionActor::new(buffer_size);
    (actor, ProductClient::new(generic_client))
}
