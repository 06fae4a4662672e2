//! Generic record-collection actors.
//!
//! - [`Record`] - what a stored document implements
//! - [`CollectionActor`] - the task that owns one collection
//! - [`CollectionClient`] - cloneable handle for CRUD, actions and filtered lookups
//! - [`RecordClient`] - provided `get`/`delete` for domain clients
//! - [`StoreError`] - plumbing errors, with record rejections boxed inside
//!
//! See [`mock`] for testing without spawning real collections.

pub mod client;
pub mod client_trait;
pub mod collection;
pub mod error;
pub mod message;
pub mod mock;
pub mod record;

pub use client::CollectionClient;
pub use client_trait::RecordClient;
pub use collection::CollectionActor;
pub use error::StoreError;
pub use message::{CollectionRequest, Filter, Response};
pub use record::Record;
