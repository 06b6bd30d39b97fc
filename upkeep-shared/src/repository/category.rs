//! Category persistence

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::errors::{not_found_message, translate, DbError, DbResult};
use crate::models::category::{Category, CategoryFields};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, fields: CategoryFields) -> DbResult<Category>;

    /// `NotFound` when no category has this id
    async fn get_by_id(&self, id: i64) -> DbResult<Category>;

    /// All categories ordered by name
    async fn get_all(&self) -> DbResult<Vec<Category>>;

    async fn update(&self, id: i64, fields: CategoryFields) -> DbResult<Category>;

    async fn delete(&self, id: i64) -> DbResult<()>;
}

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, fields: CategoryFields) -> DbResult<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            "#,
        )
        .bind(fields.name)
        .bind(fields.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate(e, "category", None))
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Category> {
        sqlx::query_as::<_, Category>("SELECT id, name, description FROM categories WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| translate(e, "category", Some(id)))
    }

    async fn get_all(&self) -> DbResult<Vec<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, name, description FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| translate(e, "category", None))
    }

    async fn update(&self, id: i64, fields: CategoryFields) -> DbResult<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $1, description = $2
            WHERE id = $3
            RETURNING id, name, description
            "#,
        )
        .bind(fields.name)
        .bind(fields.description)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate(e, "category", Some(id)))
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| translate(e, "category", Some(id)))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(not_found_message("category", Some(id))));
        }
        Ok(())
    }
}
