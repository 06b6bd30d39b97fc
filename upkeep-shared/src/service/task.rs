//! Task use cases

use chrono::Utc;
use std::sync::Arc;

use super::{ServiceError, ServiceResult};
use crate::models::rules::parse_optional_id;
use crate::models::task::{
    AssignRequest, Priority, Task, TaskFilters, TaskRequest, TaskStatus,
};
use crate::repository::task::GroupCount;
use crate::repository::TaskRepository;

/// Task counts for the home dashboard, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: i64,
    pub by_status: Vec<(TaskStatus, i64)>,
    pub by_priority: Vec<(Priority, i64)>,
}

fn count_for(counts: &[GroupCount], value: &str) -> i64 {
    counts
        .iter()
        .filter(|c| c.value.as_deref() == Some(value))
        .map(|c| c.count)
        .sum()
}

#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    fn check(request: &TaskRequest, id: Option<i64>) -> ServiceResult<()> {
        request
            .check_recurrence()
            .map_err(|p| ServiceError::invalid(p.field, p.message))?;

        if id.is_some() && parse_optional_id(&request.parent_task_id) == id {
            return Err(ServiceError::invalid(
                "parent_task_id",
                "A task cannot be its own parent",
            ));
        }
        Ok(())
    }

    /// Creates a task owned by `created_by`
    pub async fn create(&self, created_by: i64, request: &TaskRequest) -> ServiceResult<Task> {
        Self::check(request, None)?;
        let task = self
            .repo
            .create(created_by, request.to_domain(Utc::now()))
            .await?;
        tracing::info!(task_id = task.id, created_by, "Task created");
        Ok(task)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Task> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn get_all(&self, filters: &TaskFilters) -> ServiceResult<Vec<Task>> {
        Ok(self.repo.get_all(filters).await?)
    }

    pub async fn update(&self, id: i64, request: &TaskRequest) -> ServiceResult<Task> {
        Self::check(request, Some(id))?;
        Ok(self.repo.update(id, request.to_domain(Utc::now())).await?)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        Ok(self.repo.delete(id).await?)
    }

    pub async fn update_status(&self, id: i64, status: TaskStatus) -> ServiceResult<()> {
        Ok(self.repo.update_status(id, status).await?)
    }

    pub async fn assign(&self, id: i64, request: &AssignRequest) -> ServiceResult<()> {
        let user_id = parse_optional_id(&request.assigned_to);
        Ok(self.repo.assign(id, user_id).await?)
    }

    pub async fn complete(&self, id: i64) -> ServiceResult<()> {
        Ok(self.repo.complete(id).await?)
    }

    /// Counts per status and priority, including zero rows for unused values
    pub async fn stats(&self) -> ServiceResult<TaskStats> {
        let statuses = self.repo.count_by_status().await?;
        let priorities = self.repo.count_by_priority().await?;

        Ok(TaskStats {
            total: statuses.iter().map(|c| c.count).sum(),
            by_status: TaskStatus::ALL
                .iter()
                .map(|s| (*s, count_for(&statuses, s.as_str())))
                .collect(),
            by_priority: Priority::ALL
                .iter()
                .map(|p| (*p, count_for(&priorities, p.as_str())))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbResult;
    use crate::models::task::TaskFields;
    use async_trait::async_trait;

    struct CountsOnly;

    #[async_trait]
    impl TaskRepository for CountsOnly {
        async fn create(&self, _: i64, _: TaskFields) -> DbResult<Task> {
            unimplemented!()
        }
        async fn get_by_id(&self, _: i64) -> DbResult<Task> {
            unimplemented!()
        }
        async fn get_all(&self, _: &TaskFilters) -> DbResult<Vec<Task>> {
            unimplemented!()
        }
        async fn update(&self, _: i64, _: TaskFields) -> DbResult<Task> {
            unimplemented!()
        }
        async fn delete(&self, _: i64) -> DbResult<()> {
            unimplemented!()
        }
        async fn update_status(&self, _: i64, _: TaskStatus) -> DbResult<()> {
            unimplemented!()
        }
        async fn assign(&self, _: i64, _: Option<i64>) -> DbResult<()> {
            unimplemented!()
        }
        async fn complete(&self, _: i64) -> DbResult<()> {
            unimplemented!()
        }
        async fn count_by_status(&self) -> DbResult<Vec<GroupCount>> {
            Ok(vec![
                GroupCount { value: Some("New".to_string()), count: 3 },
                GroupCount { value: Some("Completed".to_string()), count: 2 },
                GroupCount { value: None, count: 1 },
            ])
        }
        async fn count_by_priority(&self) -> DbResult<Vec<GroupCount>> {
            Ok(vec![GroupCount { value: Some("Urgent".to_string()), count: 6 }])
        }
    }

    #[tokio::test]
    async fn test_stats_fill_missing_values_with_zero() {
        let service = TaskService::new(Arc::new(CountsOnly));
        let stats = service.stats().await.unwrap();

        assert_eq!(stats.total, 6);
        assert_eq!(
            stats.by_status,
            vec![
                (TaskStatus::New, 3),
                (TaskStatus::InProgress, 0),
                (TaskStatus::Completed, 2),
                (TaskStatus::OnHold, 0),
            ]
        );
        assert_eq!(stats.by_priority[3], (Priority::Urgent, 6));
        assert_eq!(stats.by_priority[0], (Priority::Low, 0));
    }

    #[tokio::test]
    async fn test_recurring_task_without_type_is_rejected_before_storage() {
        let service = TaskService::new(Arc::new(CountsOnly));
        let request = TaskRequest {
            title: "Inspect extinguishers".to_string(),
            is_recurring: true,
            recurrence_interval: 1,
            ..Default::default()
        };
        match service.create(1, &request).await {
            Err(ServiceError::Invalid { field, .. }) => assert_eq!(field, "recurrence_type"),
            other => panic!("unexpected result: {:?}", other.map(|t| t.id)),
        }
    }

    #[tokio::test]
    async fn test_task_cannot_parent_itself() {
        let service = TaskService::new(Arc::new(CountsOnly));
        let request = TaskRequest {
            title: "Loop".to_string(),
            parent_task_id: "9".to_string(),
            ..Default::default()
        };
        match service.update(9, &request).await {
            Err(ServiceError::Invalid { field, .. }) => assert_eq!(field, "parent_task_id"),
            other => panic!("unexpected result: {:?}", other.map(|t| t.id)),
        }
    }
}
