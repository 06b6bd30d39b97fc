//! Task listing filter builder
//!
//! Turns a [`TaskFilters`] into the tail of a `SELECT` over `tasks t`: an
//! optional `WHERE`, an `ORDER BY`, and optional `LIMIT`/`OFFSET`. Values
//! always travel as numbered bind parameters. The sort column is the only
//! piece spliced into the SQL text, and it must come from
//! [`SORTABLE_COLUMNS`]; anything else falls back to `t.created_at DESC`.
//!
//! ```text
//! filters { status: Completed, search: "leak", limit: 20 }
//!   -> WHERE t.status = $1 AND (t.title ILIKE $2 OR t.description ILIKE $2)
//!      ORDER BY t.created_at DESC LIMIT $3
//!   -> args [Text("Completed"), Text("%leak%"), Int(20)]
//! ```

use chrono::{DateTime, Utc};

use crate::models::task::{TaskFilters, TaskStatus, SORTABLE_COLUMNS};

/// A bind parameter produced by the builder
#[derive(Debug, Clone, PartialEq)]
pub enum FilterArg {
    Text(String),
    Int(i64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

/// SQL fragment plus its bind parameters, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub sql: String,
    pub args: Vec<FilterArg>,
}

struct Builder {
    conditions: Vec<String>,
    args: Vec<FilterArg>,
}

impl Builder {
    /// Pushes a value and returns its `$n` placeholder
    fn bind(&mut self, arg: FilterArg) -> String {
        self.args.push(arg);
        format!("${}", self.args.len())
    }

    fn condition(&mut self, column: &str, op: &str, arg: FilterArg) {
        let placeholder = self.bind(arg);
        self.conditions.push(format!("{} {} {}", column, op, placeholder));
    }
}

/// Builds the `WHERE ... ORDER BY ... LIMIT ... OFFSET ...` tail
pub fn build_filter_clause(filters: &TaskFilters) -> FilterClause {
    let mut b = Builder {
        conditions: Vec::new(),
        args: Vec::new(),
    };

    if let Some(status) = filters.status {
        b.condition("t.status", "=", FilterArg::Text(status.as_str().to_string()));
    }
    if let Some(priority) = filters.priority {
        b.condition("t.priority", "=", FilterArg::Text(priority.as_str().to_string()));
    }
    if let Some(id) = filters.category_id {
        b.condition("t.category_id", "=", FilterArg::Int(id));
    }
    if let Some(id) = filters.location_id {
        b.condition("t.location_id", "=", FilterArg::Int(id));
    }
    if let Some(id) = filters.assigned_to {
        b.condition("t.assigned_to", "=", FilterArg::Int(id));
    }
    if let Some(id) = filters.created_by {
        b.condition("t.created_by", "=", FilterArg::Int(id));
    }
    match filters.is_completed {
        Some(true) => b
            .conditions
            .push(format!("t.status = '{}'", TaskStatus::Completed.as_str())),
        Some(false) => b.conditions.push(format!(
            "(t.status IS NULL OR t.status <> '{}')",
            TaskStatus::Completed.as_str()
        )),
        None => {}
    }
    if let Some(recurring) = filters.is_recurring {
        b.condition("t.is_recurring", "=", FilterArg::Bool(recurring));
    }

    let search = filters.search_query.trim();
    if !search.is_empty() {
        let p = b.bind(FilterArg::Text(format!("%{}%", search)));
        b.conditions
            .push(format!("(t.title ILIKE {p} OR t.description ILIKE {p})"));
    }

    if let Some(from) = filters.date_from {
        b.condition("t.created_at", ">=", FilterArg::Timestamp(from.0));
    }
    if let Some(to) = filters.date_to {
        b.condition("t.created_at", "<=", FilterArg::Timestamp(to.0));
    }

    let mut sql = String::new();
    if !b.conditions.is_empty() {
        sql.push_str("WHERE ");
        sql.push_str(&b.conditions.join(" AND "));
        sql.push(' ');
    }
    sql.push_str(&order_by(&filters.sort_field, &filters.sort_order));

    if let Some(limit) = filters.limit.filter(|n| *n > 0) {
        let p = b.bind(FilterArg::Int(limit));
        sql.push_str(&format!(" LIMIT {}", p));
    }
    if let Some(offset) = filters.offset.filter(|n| *n > 0) {
        let p = b.bind(FilterArg::Int(offset));
        sql.push_str(&format!(" OFFSET {}", p));
    }

    FilterClause { sql, args: b.args }
}

fn order_by(field: &str, order: &str) -> String {
    match SORTABLE_COLUMNS.iter().find(|c| **c == field) {
        Some(column) => {
            let direction = if order.trim().eq_ignore_ascii_case("DESC") {
                "DESC"
            } else {
                "ASC"
            };
            format!("ORDER BY t.{} {}", column, direction)
        }
        None => "ORDER BY t.created_at DESC".to_string(),
    }
}
