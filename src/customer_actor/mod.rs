//! # Customer Actor
//!
//! Holds shoppers and administrators. No dependencies and no custom actions:
//! orders look customers up to validate checkout, and the admin desk and
//! tracking access policy read the [`Role`](crate::model::Role).
//!
//! ```rust,ignore
//! let (actor, client) = customer_actor::new(32);
//! tokio::spawn(actor.run(()));
//! let id = client.register(CustomerCreate { .. }).await?;
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::CustomerClient;
use crate::framework::CollectionActor;
use crate::model::Customer;

/// Creates the Customer collection and its typed client.
pub fn new(buffer_size: usize) -> (CollectionActor<Customer>, CustomerClient) {
    let (actor, generic_client) = CollectionActor::new(buffer_size);
    (actor, CustomerClient::new(generic_client))
}
