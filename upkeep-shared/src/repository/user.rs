//! User persistence

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::errors::{translate, DbResult};
use crate::models::user::{CreateUser, User};

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, role, created_at";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts an account; a taken email is a `Conflict`
    async fn create(&self, data: CreateUser) -> DbResult<User>;

    async fn get_by_email(&self, email: &str) -> DbResult<Option<User>>;

    async fn list(&self) -> DbResult<Vec<User>>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, data: CreateUser) -> DbResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate(e, "user", None))
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| translate(e, "user", None))
    }

    async fn list(&self) -> DbResult<Vec<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY last_name, first_name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| translate(e, "user", None))
    }
}
