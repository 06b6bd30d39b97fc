//! Location use cases

use std::sync::Arc;

use super::{ServiceError, ServiceResult};
use crate::models::location::{Location, LocationRequest};
use crate::repository::LocationRepository;

#[derive(Clone)]
pub struct LocationService {
    repo: Arc<dyn LocationRepository>,
}

impl LocationService {
    pub fn new(repo: Arc<dyn LocationRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, request: &LocationRequest) -> ServiceResult<Location> {
        Ok(self.repo.create(request.to_domain()).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Location> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<Location>> {
        Ok(self.repo.get_all().await?)
    }

    /// Rewrites the location; a location cannot be its own parent
    pub async fn update(&self, id: i64, request: &LocationRequest) -> ServiceResult<Location> {
        let fields = request.to_domain();
        if fields.parent_location_id == Some(id) {
            return Err(ServiceError::invalid(
                "parent_location_id",
                "A location cannot be its own parent",
            ));
        }
        Ok(self.repo.update(id, fields).await?)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        Ok(self.repo.delete(id).await?)
    }
}
