//! Task model
//!
//! Tasks are the unit of maintenance work. Status and priority are stored as
//! free text constrained by CHECK constraints; there is no state machine and
//! any status can follow any other.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE tasks (
//!     id BIGSERIAL PRIMARY KEY,
//!     title VARCHAR(255) NOT NULL,
//!     description TEXT NOT NULL DEFAULT '',
//!     category_id BIGINT REFERENCES categories(id),
//!     location_id BIGINT REFERENCES locations(id),
//!     priority VARCHAR(20),            -- Low | Medium | High | Urgent
//!     status VARCHAR(20),              -- New | In Progress | Completed | On Hold
//!     created_by BIGINT NOT NULL REFERENCES users(id),
//!     assigned_to BIGINT REFERENCES users(id),
//!     created_at TIMESTAMPTZ NOT NULL,
//!     updated_at TIMESTAMPTZ NOT NULL,
//!     estimated_completion_date TIMESTAMPTZ,
//!     cost DOUBLE PRECISION,
//!     is_recurring BOOLEAN NOT NULL,
//!     recurrence_type VARCHAR(20),     -- Daily | Weekly | Monthly | Yearly | Custom
//!     recurrence_interval INTEGER,
//!     recurrence_unit VARCHAR(20),     -- Day | Week | Month | Year
//!     parent_task_id BIGINT REFERENCES tasks(id),
//!     next_occurrence TIMESTAMPTZ,
//!     completed_at TIMESTAMPTZ
//! );
//! ```
//!
//! # Recurrence
//!
//! Recurrence columns are only kept when `is_recurring` is set. For a
//! recurring task the next occurrence is computed from the interval and unit:
//!
//! ```text
//! base  = estimated_completion_date, or now
//! next  = base + interval * unit
//! unit  = recurrence_unit, or derived from recurrence_type
//!         (Daily -> Day, Weekly -> Week, Monthly -> Month, Yearly -> Year)
//! ```

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::rules::{self, de};

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: [$name; [$($text),+].len()] = [$($name::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant(other.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Returned when a stored or submitted value names no known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0}")]
pub struct UnknownVariant(pub String);

text_enum! {
    /// How urgent a task is
    Priority {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Urgent => "Urgent",
    }
}

text_enum! {
    /// Where a task is in its lifecycle
    TaskStatus {
        New => "New",
        InProgress => "In Progress",
        Completed => "Completed",
        OnHold => "On Hold",
    }
}

text_enum! {
    RecurrenceType {
        Daily => "Daily",
        Weekly => "Weekly",
        Monthly => "Monthly",
        Yearly => "Yearly",
        Custom => "Custom",
    }
}

text_enum! {
    RecurrenceUnit {
        Day => "Day",
        Week => "Week",
        Month => "Month",
        Year => "Year",
    }
}

impl RecurrenceType {
    /// Unit implied by the preset types; `Custom` needs an explicit unit
    pub fn implied_unit(self) -> Option<RecurrenceUnit> {
        match self {
            RecurrenceType::Daily => Some(RecurrenceUnit::Day),
            RecurrenceType::Weekly => Some(RecurrenceUnit::Week),
            RecurrenceType::Monthly => Some(RecurrenceUnit::Month),
            RecurrenceType::Yearly => Some(RecurrenceUnit::Year),
            RecurrenceType::Custom => None,
        }
    }
}

impl RecurrenceUnit {
    /// Advances `from` by `interval` units; `None` on overflow
    pub fn advance(self, from: DateTime<Utc>, interval: u32) -> Option<DateTime<Utc>> {
        match self {
            RecurrenceUnit::Day => from.checked_add_signed(Duration::days(interval.into())),
            RecurrenceUnit::Week => from.checked_add_signed(Duration::weeks(interval.into())),
            RecurrenceUnit::Month => from.checked_add_months(Months::new(interval)),
            RecurrenceUnit::Year => from.checked_add_months(Months::new(interval.checked_mul(12)?)),
        }
    }
}

/// A task row joined with the display names of its references
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,

    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub location_id: Option<i64>,
    pub location_name: Option<String>,

    pub priority: Option<String>,
    pub status: Option<String>,

    pub created_by: i64,
    pub created_by_name: Option<String>,
    pub assigned_to: Option<i64>,
    pub assigned_to_name: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub estimated_completion_date: Option<DateTime<Utc>>,
    pub cost: Option<f64>,

    pub is_recurring: bool,
    pub recurrence_type: Option<String>,
    pub recurrence_interval: Option<i32>,
    pub recurrence_unit: Option<String>,
    pub parent_task_id: Option<i64>,
    pub next_occurrence: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn status(&self) -> Option<TaskStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn is_completed(&self) -> bool {
        self.status() == Some(TaskStatus::Completed)
    }
}

/// The writable columns of a task
///
/// Produced by [`TaskRequest::to_domain`] and written in full on every
/// create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub assigned_to: Option<i64>,
    pub estimated_completion_date: Option<DateTime<Utc>>,
    pub cost: Option<f64>,
    pub is_recurring: bool,
    pub recurrence_type: Option<RecurrenceType>,
    pub recurrence_interval: Option<i32>,
    pub recurrence_unit: Option<RecurrenceUnit>,
    pub parent_task_id: Option<i64>,
    pub next_occurrence: Option<DateTime<Utc>>,
}

/// Largest interval a schedule may use, in units of its recurrence
pub const MAX_RECURRENCE_INTERVAL: i32 = 1000;

/// Create/update payload as submitted by the task form
///
/// Ids, cost and dates arrive as strings because HTML forms send blanks for
/// untouched inputs.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct TaskRequest {
    #[validate(custom(function = "rules::not_blank"), length(max = 255))]
    pub title: String,

    pub description: String,

    #[validate(custom(function = "rules::numeric_string"))]
    pub category_id: String,

    #[validate(custom(function = "rules::numeric_string"))]
    pub location_id: String,

    #[validate(custom(function = "rules::priority"))]
    pub priority: String,

    #[validate(custom(function = "rules::status"))]
    pub status: String,

    #[validate(custom(function = "rules::numeric_string"))]
    pub assigned_to: String,

    #[validate(custom(function = "rules::date_string"))]
    pub estimated_completion_date: String,

    #[validate(custom(function = "rules::non_negative_number"))]
    pub cost: String,

    #[serde(deserialize_with = "de::flag")]
    pub is_recurring: bool,

    #[validate(custom(function = "rules::recurrence_type"))]
    pub recurrence_type: String,

    #[serde(deserialize_with = "de::int")]
    #[validate(range(min = 0, max = MAX_RECURRENCE_INTERVAL))]
    pub recurrence_interval: i32,

    #[validate(custom(function = "rules::recurrence_unit"))]
    pub recurrence_unit: String,

    #[validate(custom(function = "rules::numeric_string"))]
    pub parent_task_id: String,
}

/// A recurrence setting that cannot produce a schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceProblem {
    pub field: &'static str,
    pub message: &'static str,
}

impl TaskRequest {
    /// Checks the cross-field recurrence rules `validator` cannot express
    pub fn check_recurrence(&self) -> Result<(), RecurrenceProblem> {
        if !self.is_recurring {
            return Ok(());
        }
        if self.recurrence_type.trim().is_empty() {
            return Err(RecurrenceProblem {
                field: "recurrence_type",
                message: "This field is required",
            });
        }
        if self.recurrence_interval < 1 {
            return Err(RecurrenceProblem {
                field: "recurrence_interval",
                message: "Should be at least 1",
            });
        }
        if self.recurrence_type == RecurrenceType::Custom.as_str()
            && self.recurrence_unit.trim().is_empty()
        {
            return Err(RecurrenceProblem {
                field: "recurrence_unit",
                message: "This field is required",
            });
        }
        Ok(())
    }

    /// Maps the validated request onto the writable task columns
    ///
    /// Blank optional inputs become `None`, a blank priority becomes
    /// `Medium`, and a blank status becomes `New`. Recurrence fields are
    /// dropped for non-recurring tasks.
    pub fn to_domain(&self, now: DateTime<Utc>) -> TaskFields {
        let estimated_completion_date = rules::parse_date(&self.estimated_completion_date);

        let (recurrence_type, recurrence_interval, recurrence_unit) = if self.is_recurring {
            (
                self.recurrence_type.parse::<RecurrenceType>().ok(),
                Some(self.recurrence_interval.max(1)),
                self.recurrence_unit.parse::<RecurrenceUnit>().ok(),
            )
        } else {
            (None, None, None)
        };

        let next_occurrence = next_occurrence(
            recurrence_type,
            recurrence_unit,
            recurrence_interval,
            estimated_completion_date.unwrap_or(now),
        );

        TaskFields {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            category_id: rules::parse_optional_id(&self.category_id),
            location_id: rules::parse_optional_id(&self.location_id),
            priority: self.priority.parse().unwrap_or(Priority::Medium),
            status: self.status.parse().unwrap_or(TaskStatus::New),
            assigned_to: rules::parse_optional_id(&self.assigned_to),
            estimated_completion_date,
            cost: self.cost.trim().parse().ok(),
            is_recurring: self.is_recurring,
            recurrence_type,
            recurrence_interval,
            recurrence_unit,
            parent_task_id: rules::parse_optional_id(&self.parent_task_id),
            next_occurrence,
        }
    }
}

/// Next due date for a recurring task, or `None` when it does not recur
pub fn next_occurrence(
    recurrence_type: Option<RecurrenceType>,
    recurrence_unit: Option<RecurrenceUnit>,
    interval: Option<i32>,
    base: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let unit = recurrence_unit.or_else(|| recurrence_type.and_then(RecurrenceType::implied_unit))?;
    let interval = u32::try_from(interval?).ok().filter(|n| *n > 0)?;
    unit.advance(base, interval)
}

/// Payload for `PUT /tasks/:id/status`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct StatusRequest {
    #[validate(custom(function = "rules::required_status"))]
    pub status: String,
}

/// Payload for `PUT /tasks/:id/assign`; a blank value unassigns
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AssignRequest {
    #[validate(custom(function = "rules::numeric_string"))]
    pub assigned_to: String,
}

/// Criteria for listing tasks
///
/// Every criterion is optional. `limit` and `offset` only apply when
/// positive. `sort_field` must name one of [`SORTABLE_COLUMNS`]; anything
/// else falls back to newest-first.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(default)]
pub struct TaskFilters {
    #[serde(deserialize_with = "de::blank_as_none")]
    pub status: Option<TaskStatus>,
    #[serde(deserialize_with = "de::blank_as_none")]
    pub priority: Option<Priority>,
    #[serde(deserialize_with = "de::blank_as_none")]
    pub category_id: Option<i64>,
    #[serde(deserialize_with = "de::blank_as_none")]
    pub location_id: Option<i64>,
    #[serde(deserialize_with = "de::blank_as_none")]
    pub assigned_to: Option<i64>,
    #[serde(deserialize_with = "de::blank_as_none")]
    pub created_by: Option<i64>,
    #[serde(deserialize_with = "de::blank_as_none")]
    pub is_completed: Option<bool>,
    #[serde(deserialize_with = "de::blank_as_none")]
    pub is_recurring: Option<bool>,
    #[serde(rename = "search")]
    pub search_query: String,
    #[serde(deserialize_with = "de::blank_as_none")]
    pub date_from: Option<FilterDate>,
    #[serde(deserialize_with = "de::blank_as_none")]
    pub date_to: Option<FilterDate>,
    #[serde(deserialize_with = "de::blank_as_none")]
    pub limit: Option<i64>,
    #[serde(deserialize_with = "de::blank_as_none")]
    pub offset: Option<i64>,
    pub sort_field: String,
    pub sort_order: String,
}

/// A filter bound parsed with [`rules::parse_date`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterDate(pub DateTime<Utc>);

impl FromStr for FilterDate {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        rules::parse_date(s)
            .map(FilterDate)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Columns a task listing may be ordered by
pub const SORTABLE_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "priority",
    "status",
    "created_at",
    "updated_at",
    "estimated_completion_date",
];
