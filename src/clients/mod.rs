//! Typed wrappers around [`CollectionClient`](crate::framework::CollectionClient).
//!
//! Each client turns [`StoreError`](crate::framework::StoreError) back into its
//! record's own error so callers can match on `InsufficientStock` and friends
//! instead of strings.

pub mod customer_client;
pub mod order_client;
pub mod product_client;

pub use crate::framework::RecordClient;
pub use customer_client::*;
pub use order_client::*;
pub use product_client::*;
