//! Product sample entity.

use crate::model::entity::{Entity, EntityId, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

/// Catalog product persisted in the `products` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    /// Unit price in the store currency.
    pub price: f64,
}

impl Product {
    /// Creates a product without an id; the store assigns one on insert.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: name.into(),
            price,
        }
    }
}

impl Entity for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}
