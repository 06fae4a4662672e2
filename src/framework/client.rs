//! # Collection Client
//!
//! The cloneable handle used to talk to a [`CollectionActor`](crate::framework::CollectionActor).

use crate::framework::error::StoreError;
use crate::framework::message::{CollectionRequest, Filter};
use crate::framework::record::Record;
use tokio::sync::{mpsc, oneshot};

/// Async, type-safe access to one collection.
///
/// Holds only a sender, so clones are cheap. Every call sends a request and
/// awaits its one-shot reply.
pub struct CollectionClient<T: Record> {
    sender: mpsc::Sender<CollectionRequest<T>>,
}

impl<T: Record> Clone for CollectionClient<T> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<T: Record> CollectionClient<T> {
    pub fn new(sender: mpsc::Sender<CollectionRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, StoreError>>) -> CollectionRequest<T>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::CollectionClosed)?;
        response.await.map_err(|_| StoreError::CollectionDropped)?
    }

    pub async fn create(&self, params: T::Create) -> Result<T::Id, StoreError> {
        self.request(|respond_to| CollectionRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, StoreError> {
        self.request(|respond_to| CollectionRequest::Get { id, respond_to })
            .await
    }

    pub async fn find_one(&self, filter: Filter<T>) -> Result<Option<T>, StoreError> {
        self.request(|respond_to| CollectionRequest::FindOne { filter, respond_to })
            .await
    }

    pub async fn find(&self, filter: Filter<T>) -> Result<Vec<T>, StoreError> {
        self.request(|respond_to| CollectionRequest::Find { filter, respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, StoreError> {
        self.request(|respond_to| CollectionRequest::Update { id, update, respond_to })
            .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), StoreError> {
        self.request(|respond_to| CollectionRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, StoreError> {
        self.request(|respond_to| CollectionRequest::Action { id, action, respond_to })
            .await
    }
}
