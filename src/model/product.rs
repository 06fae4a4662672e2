use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "product_{}", self.0)
    }
}

/// A catalog entry with stock on hand.
///
/// # Collection
/// Managed by a [`CollectionActor`](crate::framework::CollectionActor). Beyond
/// CRUD it answers the stock actions in
/// [`ProductAction`](crate::product_actor::ProductAction).
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    /// Price in minor currency units (paise).
    pub unit_price: u64,
    pub stock: u32,
}

/// Payload for adding a product to the catalog.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub category: String,
    pub unit_price: u64,
    pub stock: u32,
}

/// Payload for repricing or restocking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub unit_price: Option<u64>,
    pub stock: Option<u32>,
}
