//! # Collection Messages
//!
//! Requests sent from a [`CollectionClient`](crate::framework::CollectionClient)
//! to its [`CollectionActor`](crate::framework::CollectionActor).

use crate::framework::error::StoreError;
use crate::framework::record::Record;
use std::fmt;
use tokio::sync::oneshot;

/// One-shot reply channel.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// A predicate evaluated inside the actor against stored records.
pub struct Filter<T>(Box<dyn Fn(&T) -> bool + Send + Sync>);

impl<T> Filter<T> {
    pub fn new(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self(Box::new(predicate))
    }

    pub fn matches(&self, record: &T) -> bool {
        (self.0)(record)
    }
}

impl<T> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Filter(..)")
    }
}

/// CRUD + Action + lookup requests for a collection of `T`.
#[derive(Debug)]
pub enum CollectionRequest<T: Record> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    /// First record matching the filter.
    FindOne {
        filter: Filter<T>,
        respond_to: Response<Option<T>>,
    },
    /// Every record matching the filter, in insertion order.
    Find {
        filter: Filter<T>,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
