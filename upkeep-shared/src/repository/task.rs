//! Task persistence
//!
//! Reads join categories, locations and both user references so a [`Task`]
//! always carries display names. Writes go through a data-modifying CTE
//! aliased `t`, which lets inserts and updates return the joined row in one
//! round trip.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::errors::{not_found_message, translate, DbError, DbResult};
use crate::models::task::{
    RecurrenceType, RecurrenceUnit, Task, TaskFields, TaskFilters, TaskStatus,
};

use super::filter::{build_filter_clause, FilterArg};

const TASK_COLUMNS: &str = r#"
    t.id, t.title, t.description,
    t.category_id, c.name AS category_name,
    t.location_id, l.name AS location_name,
    t.priority, t.status,
    t.created_by, cb.first_name || ' ' || cb.last_name AS created_by_name,
    t.assigned_to, au.first_name || ' ' || au.last_name AS assigned_to_name,
    t.created_at, t.updated_at, t.estimated_completion_date, t.cost,
    t.is_recurring, t.recurrence_type, t.recurrence_interval, t.recurrence_unit,
    t.parent_task_id, t.next_occurrence, t.completed_at
"#;

const TASK_JOINS: &str = r#"
    LEFT JOIN categories c ON c.id = t.category_id
    LEFT JOIN locations l ON l.id = t.location_id
    LEFT JOIN users cb ON cb.id = t.created_by
    LEFT JOIN users au ON au.id = t.assigned_to
"#;

/// Number of tasks sharing a status or priority value
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct GroupCount {
    pub value: Option<String>,
    pub count: i64,
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, created_by: i64, fields: TaskFields) -> DbResult<Task>;

    async fn get_by_id(&self, id: i64) -> DbResult<Task>;

    /// Tasks matching `filters`; see [`build_filter_clause`]
    async fn get_all(&self, filters: &TaskFilters) -> DbResult<Vec<Task>>;

    /// Rewrites every writable column and bumps `updated_at`
    async fn update(&self, id: i64, fields: TaskFields) -> DbResult<Task>;

    async fn delete(&self, id: i64) -> DbResult<()>;

    /// Sets the status; `completed_at` is stamped for `Completed` and
    /// cleared otherwise
    async fn update_status(&self, id: i64, status: TaskStatus) -> DbResult<()>;

    /// Assigns the task, or unassigns it with `None`
    async fn assign(&self, id: i64, user_id: Option<i64>) -> DbResult<()>;

    async fn complete(&self, id: i64) -> DbResult<()>;

    async fn count_by_status(&self) -> DbResult<Vec<GroupCount>>;

    async fn count_by_priority(&self) -> DbResult<Vec<GroupCount>>;
}

pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count_grouped(&self, column: &'static str) -> DbResult<Vec<GroupCount>> {
        sqlx::query_as::<_, GroupCount>(&format!(
            "SELECT {column} AS value, COUNT(*) AS count FROM tasks GROUP BY {column}"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| translate(e, "task", None))
    }
}

fn ensure_touched(id: i64, rows_affected: u64) -> DbResult<()> {
    if rows_affected == 0 {
        return Err(DbError::NotFound(not_found_message("task", Some(id))));
    }
    Ok(())
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, created_by: i64, fields: TaskFields) -> DbResult<Task> {
        let sql = format!(
            r#"
            WITH t AS (
                INSERT INTO tasks (
                    title, description, category_id, location_id, priority, status,
                    assigned_to, estimated_completion_date, cost, is_recurring,
                    recurrence_type, recurrence_interval, recurrence_unit,
                    parent_task_id, next_occurrence, created_by
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                RETURNING *
            )
            SELECT {TASK_COLUMNS} FROM t {TASK_JOINS}
            "#
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(fields.title)
            .bind(fields.description)
            .bind(fields.category_id)
            .bind(fields.location_id)
            .bind(fields.priority.as_str())
            .bind(fields.status.as_str())
            .bind(fields.assigned_to)
            .bind(fields.estimated_completion_date)
            .bind(fields.cost)
            .bind(fields.is_recurring)
            .bind(fields.recurrence_type.map(RecurrenceType::as_str))
            .bind(fields.recurrence_interval)
            .bind(fields.recurrence_unit.map(RecurrenceUnit::as_str))
            .bind(fields.parent_task_id)
            .bind(fields.next_occurrence)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| translate(e, "task", None))
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Task> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks t {TASK_JOINS} WHERE t.id = $1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate(e, "task", Some(id)))
    }

    async fn get_all(&self, filters: &TaskFilters) -> DbResult<Vec<Task>> {
        let clause = build_filter_clause(filters);
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks t {TASK_JOINS} {}", clause.sql);
        tracing::debug!(filter = %clause.sql, args = clause.args.len(), "Listing tasks");

        let mut query = sqlx::query_as::<_, Task>(&sql);
        for arg in clause.args {
            query = match arg {
                FilterArg::Text(v) => query.bind(v),
                FilterArg::Int(v) => query.bind(v),
                FilterArg::Bool(v) => query.bind(v),
                FilterArg::Timestamp(v) => query.bind(v),
            };
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| translate(e, "task", None))
    }

    async fn update(&self, id: i64, fields: TaskFields) -> DbResult<Task> {
        let sql = format!(
            r#"
            WITH t AS (
                UPDATE tasks SET
                    title = $1,
                    description = $2,
                    category_id = $3,
                    location_id = $4,
                    priority = $5,
                    status = $6,
                    assigned_to = $7,
                    estimated_completion_date = $8,
                    cost = $9,
                    is_recurring = $10,
                    recurrence_type = $11,
                    recurrence_interval = $12,
                    recurrence_unit = $13,
                    parent_task_id = $14,
                    next_occurrence = $15,
                    updated_at = NOW()
                WHERE id = $16
                RETURNING *
            )
            SELECT {TASK_COLUMNS} FROM t {TASK_JOINS}
            "#
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(fields.title)
            .bind(fields.description)
            .bind(fields.category_id)
            .bind(fields.location_id)
            .bind(fields.priority.as_str())
            .bind(fields.status.as_str())
            .bind(fields.assigned_to)
            .bind(fields.estimated_completion_date)
            .bind(fields.cost)
            .bind(fields.is_recurring)
            .bind(fields.recurrence_type.map(RecurrenceType::as_str))
            .bind(fields.recurrence_interval)
            .bind(fields.recurrence_unit.map(RecurrenceUnit::as_str))
            .bind(fields.parent_task_id)
            .bind(fields.next_occurrence)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| translate(e, "task", Some(id)))
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| translate(e, "task", Some(id)))?;

        ensure_touched(id, result.rows_affected())
    }

    async fn update_status(&self, id: i64, status: TaskStatus) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE tasks SET
                status = $1,
                completed_at = CASE WHEN $1 = 'Completed' THEN NOW() ELSE NULL END,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| translate(e, "task", Some(id)))?;

        ensure_touched(id, result.rows_affected())
    }

    async fn assign(&self, id: i64, user_id: Option<i64>) -> DbResult<()> {
        let result =
            sqlx::query("UPDATE tasks SET assigned_to = $1, updated_at = NOW() WHERE id = $2")
                .bind(user_id)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| translate(e, "task", Some(id)))?;

        ensure_touched(id, result.rows_affected())
    }

    async fn complete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE tasks SET
                status = 'Completed',
                completed_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| translate(e, "task", Some(id)))?;

        ensure_touched(id, result.rows_affected())
    }

    async fn count_by_status(&self) -> DbResult<Vec<GroupCount>> {
        self.count_grouped("status").await
    }

    async fn count_by_priority(&self) -> DbResult<Vec<GroupCount>> {
        self.count_grouped("priority").await
    }
}
