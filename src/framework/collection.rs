//! # Collection Actor
//!
//! `CollectionActor<T>` owns every record of one type and answers requests one
//! at a time from its own Tokio task. Exclusive ownership of the store inside
//! the task is what makes the insertion counter and the lookups race-free.

use crate::framework::client::CollectionClient;
use crate::framework::error::StoreError;
use crate::framework::message::CollectionRequest;
use crate::framework::record::Record;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The server half of a collection.
///
/// # Usage Pattern
///
/// 1. **Create**: `CollectionActor::new()` returns the actor and its client.
/// 2. **Wire**: pass dependencies into `actor.run(context)`.
/// 3. **Run**: spawn the run loop; the actor stops when every client is dropped.
///
/// # Operations
///
/// * **Create** builds the key from the next sequence number, calls
///   `from_create_params` and `on_create`, then stores the record. The sequence
///   only advances on success.
/// * **Get** / **FindOne** / **Find** return clones; lookups walk records in
///   insertion order.
/// * **Update** / **Action** mutate in place through the record's hooks.
/// * **Delete** asks `on_delete` first and keeps the record if it refuses.
pub struct CollectionActor<T: Record> {
    receiver: mpsc::Receiver<CollectionRequest<T>>,
    store: HashMap<T::Id, T>,
    insertion_order: Vec<T::Id>,
    next_sequence: u32,
}

impl<T: Record> CollectionActor<T> {
    /// Creates the actor and a cloneable client bound to it.
    ///
    /// `buffer_size` is the request channel capacity; clients wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, CollectionClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            insertion_order: Vec::new(),
            next_sequence: 1,
        };
        (actor, CollectionClient::new(sender))
    }

    fn in_insertion_order(&self) -> impl Iterator<Item = &T> {
        self.insertion_order.iter().filter_map(|id| self.store.get(id))
    }

    /// Processes requests until the channel closes.
    pub async fn run(mut self, context: T::Context) {
        // "Order" rather than "uthraa_orders::model::order::Order"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Collection started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CollectionRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let sequence = self.next_sequence;
                    let id = T::Id::from(sequence);

                    let mut item = match T::from_create_params(id.clone(), sequence, params, &context) {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, sequence, error = %e, "Create failed");
                            let _ = respond_to.send(Err(StoreError::Rejected(Box::new(e))));
                            continue;
                        }
                    };
                    if let Err(e) = item.on_create(&context).await {
                        warn!(entity_type, sequence, error = %e, "on_create failed");
                        let _ = respond_to.send(Err(StoreError::Rejected(Box::new(e))));
                        continue;
                    }
                    self.store.insert(id.clone(), item);
                    self.insertion_order.push(id.clone());
                    self.next_sequence += 1;
                    info!(entity_type, %id, sequence, size = self.store.len(), "Created");
                    let _ = respond_to.send(Ok(id));
                }
                CollectionRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                CollectionRequest::FindOne { filter, respond_to } => {
                    let item = self.in_insertion_order().find(|r| filter.matches(r)).cloned();
                    debug!(entity_type, found = item.is_some(), "FindOne");
                    let _ = respond_to.send(Ok(item));
                }
                CollectionRequest::Find { filter, respond_to } => {
                    let items: Vec<T> = self
                        .in_insertion_order()
                        .filter(|r| filter.matches(r))
                        .cloned()
                        .collect();
                    debug!(entity_type, matched = items.len(), "Find");
                    let _ = respond_to.send(Ok(items));
                }
                CollectionRequest::Update { id, update, respond_to } => {
                    debug!(entity_type, %id, ?update, "Update");
                    if let Some(item) = self.store.get_mut(&id) {
                        if let Err(e) = item.on_update(update, &context).await {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(StoreError::Rejected(Box::new(e))));
                            continue;
                        }
                        info!(entity_type, %id, "Updated");
                        let _ = respond_to.send(Ok(item.clone()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                    }
                }
                CollectionRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    if let Some(item) = self.store.get(&id) {
                        if let Err(e) = item.on_delete(&context).await {
                            warn!(entity_type, %id, error = %e, "on_delete refused");
                            let _ = respond_to.send(Err(StoreError::Rejected(Box::new(e))));
                            continue;
                        }
                        self.store.remove(&id);
                        self.insertion_order.retain(|kept| kept != &id);
                        info!(entity_type, %id, size = self.store.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                    }
                }
                CollectionRequest::Action { id, action, respond_to } => {
                    debug!(entity_type, %id, ?action, "Action");
                    if let Some(item) = self.store.get_mut(&id) {
                        let result = item
                            .handle_action(action, &context)
                            .await
                            .map_err(|e| StoreError::Rejected(Box::new(e)));
                        match &result {
                            Ok(_) => info!(entity_type, %id, "Action ok"),
                            Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                        }
                        let _ = respond_to.send(result);
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::Filter;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: u32,
        sequence: u32,
        label: String,
        pinned: bool,
    }

    #[derive(Debug)]
    struct NoteCreate {
        label: String,
    }

    #[derive(Debug)]
    struct NoteUpdate {
        label: Option<String>,
    }

    #[derive(Debug)]
    enum NoteAction {
        Pin,
    }

    #[derive(Debug, thiserror::Error, PartialEq)]
    enum NoteError {
        #[error("label must not be empty")]
        EmptyLabel,
        #[error("pinned notes cannot be deleted")]
        Pinned,
    }

    #[async_trait]
    impl Record for Note {
        type Id = u32;
        type Create = NoteCreate;
        type Update = NoteUpdate;
        type Action = NoteAction;
        type ActionResult = bool;
        type Context = ();
        type Error = NoteError;

        fn from_create_params(id: u32, sequence: u32, params: NoteCreate, _: &()) -> Result<Self, NoteError> {
            if params.label.is_empty() {
                return Err(NoteError::EmptyLabel);
            }
            Ok(Self { id, sequence, label: params.label, pinned: false })
        }

        async fn on_update(&mut self, update: NoteUpdate, _: &()) -> Result<(), NoteError> {
            if let Some(label) = update.label {
                self.label = label;
            }
            Ok(())
        }

        async fn on_delete(&self, _: &()) -> Result<(), NoteError> {
            if self.pinned {
                return Err(NoteError::Pinned);
            }
            Ok(())
        }

        async fn handle_action(&mut self, action: NoteAction, _: &()) -> Result<bool, NoteError> {
            match action {
                NoteAction::Pin => {
                    let changed = !self.pinned;
                    self.pinned = true;
                    Ok(changed)
                }
            }
        }
    }

    fn create(label: &str) -> NoteCreate {
        NoteCreate { label: label.to_string() }
    }

    #[tokio::test]
    async fn test_collection_lifecycle() {
        let (actor, client) = CollectionActor::<Note>::new(10);
        tokio::spawn(actor.run(()));

        let id = client.create(create("groceries")).await.unwrap();
        assert_eq!(id, 1);

        assert!(client.perform_action(id, NoteAction::Pin).await.unwrap());
        assert!(!client.perform_action(id, NoteAction::Pin).await.unwrap());

        let updated = client
            .update(id, NoteUpdate { label: Some("errands".into()) })
            .await
            .unwrap();
        assert_eq!(updated.label, "errands");

        let refused = client.delete(id).await.unwrap_err();
        assert_eq!(refused.downcast_rejection::<NoteError>().unwrap(), NoteError::Pinned);
        assert!(client.get(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sequence_only_advances_on_success() {
        let (actor, client) = CollectionActor::<Note>::new(10);
        tokio::spawn(actor.run(()));

        assert_eq!(client.create(create("a")).await.unwrap(), 1);
        assert!(client.create(create("")).await.is_err());
        let second = client.create(create("b")).await.unwrap();
        assert_eq!(second, 2);
        assert_eq!(client.get(second).await.unwrap().unwrap().sequence, 2);
    }

    #[tokio::test]
    async fn test_find_walks_insertion_order() {
        let (actor, client) = CollectionActor::<Note>::new(10);
        tokio::spawn(actor.run(()));

        for label in ["alpha", "beta", "alphabet"] {
            client.create(create(label)).await.unwrap();
        }

        let first = client
            .find_one(Filter::new(|n: &Note| n.label.starts_with("alpha")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.label, "alpha");

        let all: Vec<String> = client
            .find(Filter::new(|n: &Note| n.label.contains('a')))
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.label)
            .collect();
        assert_eq!(all, vec!["alpha", "beta", "alphabet"]);

        client.delete(1).await.unwrap();
        let missing = client
            .find_one(Filter::new(|n: &Note| n.label == "alpha"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let (actor, client) = CollectionActor::<Note>::new(10);
        tokio::spawn(actor.run(()));

        let err = client.perform_action(42, NoteAction::Pin).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == "42"));
    }
}
