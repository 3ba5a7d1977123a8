use async_trait::async_trait;
use sqlx::PgPool;

use business::domain::errors::RepositoryError;
use business::domain::product::model::Product;
use business::domain::product::repository::ProductRepository;
use business::domain::shared::value_objects::ProductId;

use super::entity::ProductEntity;
use crate::db::to_db_id;

pub struct ProductRepositoryPostgres {
    pool: PgPool,
}

impl ProductRepositoryPostgres {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for ProductRepositoryPostgres {
    async fn get_by_id(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let entity = sqlx::query_as::<_, ProductEntity>(
            "SELECT id, name, price, stock FROM products WHERE id = $1",
        )
        .bind(to_db_id(id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(product_id = %id, error = %e, "product lookup failed");
            RepositoryError::DatabaseError
        })?
        .ok_or(RepositoryError::NotFound)?;

        Ok(entity.into_domain())
    }
}
