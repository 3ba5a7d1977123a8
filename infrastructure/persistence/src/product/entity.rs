use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;
use sqlx::FromRow;

use business::domain::product::model::Product;
use business::domain::shared::value_objects::ProductId;

#[derive(Debug, FromRow)]
pub struct ProductEntity {
    pub id: i64,
    pub name: String,
    pub price: BigDecimal,
    pub stock: i32,
}

impl ProductEntity {
    pub fn into_domain(self) -> Product {
        Product::from_repository(
            ProductId::new(self.id as u64),
            self.name,
            self.price.to_f64().unwrap_or_default(),
            self.stock,
        )
    }
}
