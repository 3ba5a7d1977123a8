use serde::{Deserialize, Serialize};

use crate::domain::shared::value_objects::ProductId;

/// Read-only view of a catalog product, as far as the cart needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub stock: i32,
}

impl Product {
    /// Constructor for data already persisted in the repository (no validation).
    pub fn from_repository(id: ProductId, name: String, price: f64, stock: i32) -> Self {
        Self {
            id,
            name,
            price,
            stock,
        }
    }

    pub fn has_stock_for(&self, quantity: i32) -> bool {
        self.stock >= quantity
    }
}
