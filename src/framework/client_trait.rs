//! # RecordClient Trait
//!
//! Domain clients (`OrderClient`, `ProductClient`, ...) implement this to get
//! `get` and `delete` for free, with framework errors mapped to their own type.

use crate::framework::{CollectionClient, Record, StoreError};
use async_trait::async_trait;

/// Shared CRUD surface for resource-specific clients.
#[async_trait]
pub trait RecordClient<T: Record>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// The wrapped generic client.
    fn inner(&self) -> &CollectionClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: StoreError) -> Self::Error;

    /// Fetch a record by primary key.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Delete a record by primary key.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
