//! # Record Trait
//!
//! The contract every stored document (customer, product, order) implements so a
//! single [`CollectionActor`](crate::framework::CollectionActor) loop can manage it.
//!
//! Associated types pin the payloads to the record: an `Order` collection only
//! accepts `OrderCreate`, and the compiler rejects anything else.
//!
//! `on_create`, `on_delete` are provided and do nothing by default.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that a stored document implements to live in a collection actor.
///
/// # Context
/// `Context` is handed to the actor in `run()`, not in `new()`, so a
/// collection can depend on clients of collections created after it.
#[async_trait]
pub trait Record: Clone + Send + Sync + 'static {
    /// Primary key. Built from the collection's insertion counter.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload for inserting a new record.
    type Create: Send + Sync + Debug;

    /// Payload for a generic update.
    type Update: Send + Sync + Debug;

    /// Record-specific operations beyond CRUD (e.g. `ReserveStock`).
    type Action: Send + Sync + Debug;

    /// What an action returns.
    type ActionResult: Send + Sync + Debug;

    /// Dependencies injected at `run()`. Use `()` for none.
    type Context: Send + Sync;

    /// One error enum per record type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds the record from its key, insertion sequence and payload.
    ///
    /// `sequence` starts at 1 and only advances when an insert succeeds.
    fn from_create_params(
        id: Self::Id,
        sequence: u32,
        params: Self::Create,
        ctx: &Self::Context,
    ) -> Result<Self, Self::Error>;

    /// Runs after construction, before the record is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn on_update(&mut self, update: Self::Update, _ctx: &Self::Context)
        -> Result<(), Self::Error>;

    /// Runs before removal. Returning an error keeps the record.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
