use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::CartError;
use crate::domain::shared::value_objects::{CartItemId, ProductId, UserId};

/// One (user, product, quantity) row of the authoritative store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CartLineItem {
    /// Constructor for data already persisted in the repository (no validation).
    pub fn from_repository(
        id: CartItemId,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            user_id,
            product_id,
            quantity,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns a copy carrying `quantity`, stamped as updated now.
    pub fn with_quantity(&self, quantity: i32) -> Result<Self, CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity);
        }
        Ok(Self {
            quantity,
            updated_at: Utc::now(),
            ..self.clone()
        })
    }
}

/// A line item that has not been stored yet. The store assigns its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLineItem {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
}

impl NewCartLineItem {
    pub fn new(user_id: UserId, product_id: ProductId, quantity: i32) -> Result<Self, CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity);
        }
        Ok(Self {
            user_id,
            product_id,
            quantity,
        })
    }
}

/// A line item joined with the product's display data at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub item: CartLineItem,
    pub product_name: String,
    pub product_price: f64,
}
