//! Accounts and credential checks

use std::sync::Arc;

use super::{ServiceError, ServiceResult};
use crate::auth::password::{hash_password, verify_password};
use crate::models::user::{User, UserRequest};
use crate::repository::UserRepository;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Creates an account with the `User` role
    ///
    /// # Errors
    ///
    /// `Db(Conflict)` when the email is already registered.
    pub async fn register(&self, request: &UserRequest) -> ServiceResult<User> {
        let password_hash = hash_password(&request.password)?;
        let user = self.repo.create(request.to_domain(password_hash)).await?;
        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Looks up the account and checks its password
    ///
    /// Unknown emails and wrong passwords both yield `InvalidCredentials`.
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<User> {
        let user = self
            .repo
            .get_by_email(email.trim())
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(user_id = user.id, "Password mismatch");
            return Err(ServiceError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Everyone a task can be assigned to
    pub async fn list(&self) -> ServiceResult<Vec<User>> {
        Ok(self.repo.list().await?)
    }
}
