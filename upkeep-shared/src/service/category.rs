//! Category use cases

use std::sync::Arc;

use super::ServiceResult;
use crate::models::category::{Category, CategoryRequest};
use crate::repository::CategoryRepository;

#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, request: &CategoryRequest) -> ServiceResult<Category> {
        Ok(self.repo.create(request.to_domain()).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Category> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.repo.get_all().await?)
    }

    pub async fn update(&self, id: i64, request: &CategoryRequest) -> ServiceResult<Category> {
        Ok(self.repo.update(id, request.to_domain()).await?)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        Ok(self.repo.delete(id).await?)
    }
}
