//! Plain data types stored by the collection actors.

pub mod customer;
pub mod order;
pub mod product;
pub mod record_id;

pub use customer::*;
pub use order::*;
pub use product::*;
pub use record_id::*;
