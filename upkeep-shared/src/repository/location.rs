//! Location persistence
//!
//! Reads self-join `locations` to pick up the parent's name.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::errors::{not_found_message, translate, DbError, DbResult};
use crate::models::location::{Location, LocationFields};

const SELECT_LOCATION: &str = r#"
    SELECT l.id, l.name, l.description, l.parent_location_id,
           p.name AS parent_location_name
    FROM locations l
    LEFT JOIN locations p ON p.id = l.parent_location_id
"#;

#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn create(&self, fields: LocationFields) -> DbResult<Location>;

    async fn get_by_id(&self, id: i64) -> DbResult<Location>;

    async fn get_all(&self) -> DbResult<Vec<Location>>;

    async fn update(&self, id: i64, fields: LocationFields) -> DbResult<Location>;

    async fn delete(&self, id: i64) -> DbResult<()>;
}

pub struct PgLocationRepository {
    pool: PgPool,
}

impl PgLocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationRepository for PgLocationRepository {
    async fn create(&self, fields: LocationFields) -> DbResult<Location> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO locations (name, description, parent_location_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.parent_location_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate(e, "location", None))?;

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Location> {
        sqlx::query_as::<_, Location>(&format!("{SELECT_LOCATION} WHERE l.id = $1"))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| translate(e, "location", Some(id)))
    }

    async fn get_all(&self) -> DbResult<Vec<Location>> {
        sqlx::query_as::<_, Location>(&format!("{SELECT_LOCATION} ORDER BY l.name"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| translate(e, "location", None))
    }

    async fn update(&self, id: i64, fields: LocationFields) -> DbResult<Location> {
        let result = sqlx::query(
            r#"
            UPDATE locations
            SET name = $1, description = $2, parent_location_id = $3
            WHERE id = $4
            "#,
        )
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.parent_location_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| translate(e, "location", Some(id)))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(not_found_message("location", Some(id))));
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| translate(e, "location", Some(id)))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(not_found_message("location", Some(id))));
        }
        Ok(())
    }
}
