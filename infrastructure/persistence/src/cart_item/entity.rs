use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use num_traits::ToPrimitive;
use sqlx::FromRow;

use business::domain::cart::model::{CartEntry, CartLineItem};
use business::domain::shared::value_objects::{CartItemId, ProductId, UserId};

#[derive(Debug, FromRow)]
pub struct CartItemEntity {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CartItemEntity {
    pub fn into_domain(self) -> CartLineItem {
        CartLineItem::from_repository(
            CartItemId::new(self.id as u64),
            UserId::new(self.user_id as u64),
            ProductId::new(self.product_id as u64),
            self.quantity,
            self.created_at,
            self.updated_at,
            self.deleted_at,
        )
    }
}

/// A cart row joined with the product it references.
#[derive(Debug, FromRow)]
pub struct CartEntryEntity {
    #[sqlx(flatten)]
    pub item: CartItemEntity,
    pub product_name: String,
    pub product_price: BigDecimal,
}

impl CartEntryEntity {
    pub fn into_domain(self) -> CartEntry {
        CartEntry {
            item: self.item.into_domain(),
            product_name: self.product_name,
            product_price: self.product_price.to_f64().unwrap_or_default(),
        }
    }
}
