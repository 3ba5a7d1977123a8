use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use business::domain::cart::model::{CartEntry, CartLineItem, NewCartLineItem};
use business::domain::cart::repository::{CartRepository, CreateOutcome};
use business::domain::errors::RepositoryError;
use business::domain::shared::value_objects::{CartItemId, UserId};

use super::entity::{CartEntryEntity, CartItemEntity};
use crate::db::to_db_id;

const SELECT_ENTRY: &str = r#"SELECT c.id, c.user_id, c.product_id, c.quantity, c.created_at, c.updated_at, c.deleted_at,
        p.name AS product_name, p.price AS product_price
    FROM cart_items c
    JOIN products p ON p.id = c.product_id"#;

pub struct CartRepositoryPostgres {
    pool: PgPool,
}

impl CartRepositoryPostgres {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(error: sqlx::Error) -> RepositoryError {
    match &error {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => RepositoryError::NotFound,
        _ => {
            tracing::error!(error = %error, "cart_items write failed");
            RepositoryError::DatabaseError
        }
    }
}

fn map_read_error(error: sqlx::Error) -> RepositoryError {
    tracing::error!(error = %error, "cart_items read failed");
    RepositoryError::DatabaseError
}

#[async_trait]
impl CartRepository for CartRepositoryPostgres {
    async fn create(
        &self,
        item: &NewCartLineItem,
        source_message_id: Option<Uuid>,
    ) -> Result<CreateOutcome, RepositoryError> {
        // A NULL source id never conflicts, so direct inserts always create a row.
        let entity = sqlx::query_as::<_, CartItemEntity>(
            r#"INSERT INTO cart_items (user_id, product_id, quantity, source_message_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (source_message_id) DO NOTHING
            RETURNING id, user_id, product_id, quantity, created_at, updated_at, deleted_at"#,
        )
        .bind(to_db_id(item.user_id.value())?)
        .bind(to_db_id(item.product_id.value())?)
        .bind(item.quantity)
        .bind(source_message_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(match entity {
            Some(entity) => CreateOutcome::Created(entity.into_domain()),
            None => CreateOutcome::AlreadyApplied,
        })
    }

    async fn was_applied(&self, source_message_id: Uuid) -> Result<bool, RepositoryError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM cart_items WHERE source_message_id = $1)",
        )
        .bind(source_message_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_read_error)
    }

    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<CartEntry>, RepositoryError> {
        let entities = sqlx::query_as::<_, CartEntryEntity>(&format!(
            "{SELECT_ENTRY} WHERE c.user_id = $1 AND c.deleted_at IS NULL ORDER BY c.created_at, c.id"
        ))
        .bind(to_db_id(user_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(map_read_error)?;

        Ok(entities.into_iter().map(|e| e.into_domain()).collect())
    }

    async fn get_by_id(
        &self,
        id: CartItemId,
        user_id: UserId,
    ) -> Result<CartEntry, RepositoryError> {
        let entity = sqlx::query_as::<_, CartEntryEntity>(&format!(
            "{SELECT_ENTRY} WHERE c.id = $1 AND c.user_id = $2 AND c.deleted_at IS NULL"
        ))
        .bind(to_db_id(id.value())?)
        .bind(to_db_id(user_id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_read_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(entity.into_domain())
    }

    async fn update(&self, item: &CartLineItem) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE cart_items SET quantity = $1, updated_at = $2
            WHERE id = $3 AND user_id = $4 AND deleted_at IS NULL"#,
        )
        .bind(item.quantity)
        .bind(item.updated_at)
        .bind(to_db_id(item.id.value())?)
        .bind(to_db_id(item.user_id.value())?)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: CartItemId, user_id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE cart_items SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL"#,
        )
        .bind(to_db_id(id.value())?)
        .bind(to_db_id(user_id.value())?)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
