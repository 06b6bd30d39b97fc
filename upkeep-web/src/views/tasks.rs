//! Task fragments

use super::{escape, format_date, input_datetime, options};
use upkeep_shared::models::{
    Priority, RecurrenceType, RecurrenceUnit, Task, TaskFilters, TaskStatus, User,
};

fn enum_options<T: Copy + std::fmt::Display>(all: &[T], selected: Option<&str>, placeholder: &str) -> String {
    let labels: Vec<String> = all.iter().map(|v| v.to_string()).collect();
    options(
        labels.iter().map(|l| (l.clone(), l.as_str())),
        selected,
        placeholder,
    )
}

fn filter_bar(filters: &TaskFilters) -> String {
    let status = filters.status.map(|s| s.to_string());
    let priority = filters.priority.map(|p| p.to_string());
    let sort_options: String = [
        ("created_at", "Created"),
        ("updated_at", "Updated"),
        ("title", "Title"),
        ("priority", "Priority"),
        ("status", "Status"),
        ("estimated_completion_date", "Due"),
    ]
    .iter()
    .map(|(value, label)| {
        let mark = if filters.sort_field == *value { " selected" } else { "" };
        format!(r#"<option value="{}"{}>{}</option>"#, value, mark, label)
    })
    .collect();
    let ascending = if filters.sort_order.eq_ignore_ascii_case("asc") {
        " selected"
    } else {
        ""
    };

    format!(
        r##"<form class="filters" hx-get="/tasks" hx-target="#content" hx-push-url="true">
  <input type="search" name="search" placeholder="Search" value="{search}">
  <select name="status">{status}</select>
  <select name="priority">{priority}</select>
  <select name="sort_field">{sort_options}</select>
  <select name="sort_order"><option value="desc">Newest first</option><option value="asc"{ascending}>Oldest first</option></select>
  <button type="submit">Filter</button>
</form>"##,
        search = escape(&filters.search_query),
        status = enum_options(&TaskStatus::ALL, status.as_deref(), "Any status"),
        priority = enum_options(&Priority::ALL, priority.as_deref(), "Any priority"),
        sort_options = sort_options,
        ascending = ascending,
    )
}

pub fn list(tasks: &[Task], filters: &TaskFilters) -> String {
    let rows: String = if tasks.is_empty() {
        r#"<tr><td colspan="7" class="empty">No tasks match</td></tr>"#.to_string()
    } else {
        tasks.iter().map(row).collect()
    };

    format!(
        r##"<section class="card">
  <header class="card-header">
    <h2>Tasks</h2>
    <button hx-get="/tasks/form" hx-target="#modal">New task</button>
  </header>
  {filters}
  <table class="tasks">
    <thead><tr><th>Title</th><th>Status</th><th>Priority</th><th>Category</th><th>Location</th><th>Assignee</th><th>Due</th><th></th></tr></thead>
    <tbody>{rows}</tbody>
  </table>
</section>"##,
        filters = filter_bar(filters),
        rows = rows,
    )
}

fn row(task: &Task) -> String {
    let status_picker = format!(
        r#"<select name="status" hx-put="/tasks/{id}/status" hx-trigger="change">{choices}</select>"#,
        id = task.id,
        choices = enum_options(&TaskStatus::ALL, task.status.as_deref(), "-"),
    );
    let complete = if task.is_completed() {
        String::new()
    } else {
        format!(r#"<button hx-post="/tasks/{}/complete">Done</button>"#, task.id)
    };
    let recurring = if task.is_recurring {
        r#" <span class="tag">recurring</span>"#
    } else {
        ""
    };

    format!(
        r##"<tr id="task-{id}">
  <td><strong>{title}</strong>{recurring}</td>
  <td>{status_picker}</td>
  <td>{priority}</td>
  <td>{category}</td>
  <td>{location}</td>
  <td>{assignee}</td>
  <td>{due}</td>
  <td class="actions">
    {complete}
    <button hx-get="/tasks/{id}/form" hx-target="#modal">Edit</button>
    <button hx-delete="/tasks/{id}" hx-confirm="Delete {title}?">Delete</button>
  </td>
</tr>"##,
        id = task.id,
        title = escape(&task.title),
        recurring = recurring,
        status_picker = status_picker,
        priority = escape(task.priority.as_deref().unwrap_or_default()),
        category = escape(task.category_name.as_deref().unwrap_or_default()),
        location = escape(task.location_name.as_deref().unwrap_or_default()),
        assignee = escape(task.assigned_to_name.as_deref().unwrap_or_default()),
        due = format_date(task.estimated_completion_date),
        complete = complete,
    )
}

/// Create or edit form; category, location and parent pickers load from their `/select` routes
pub fn form(task: Option<&Task>, users: &[User]) -> String {
    let id_param = |value: Option<i64>| value.map(|v| v.to_string()).unwrap_or_default();

    let (heading, verb) = match task {
        Some(t) => ("Edit task", format!(r#"hx-put="/tasks/{}""#, t.id)),
        None => ("New task", r#"hx-post="/tasks""#.to_string()),
    };
    let title = task.map(|t| t.title.as_str()).unwrap_or_default();
    let description = task.map(|t| t.description.as_str()).unwrap_or_default();
    let category_url = format!(
        "/categories/select?category_id={}",
        id_param(task.and_then(|t| t.category_id))
    );
    let location_url = format!(
        "/locations/select?location_id={}",
        id_param(task.and_then(|t| t.location_id))
    );
    let parent_url = format!(
        "/tasks/select?parent_task_id={}&excluded_id={}",
        id_param(task.and_then(|t| t.parent_task_id)),
        id_param(task.map(|t| t.id))
    );

    let assignee = task.and_then(|t| t.assigned_to).map(|id| id.to_string());
    let names: Vec<(String, String)> = users
        .iter()
        .map(|u| (u.id.to_string(), u.full_name()))
        .collect();
    let assignees = options(
        names.iter().map(|(id, name)| (id.clone(), name.as_str())),
        assignee.as_deref(),
        "Unassigned",
    );

    let priority = task.and_then(|t| t.priority.as_deref());
    let status = task.and_then(|t| t.status.as_deref());
    let recurrence_type = task.and_then(|t| t.recurrence_type.as_deref());
    let recurrence_unit = task.and_then(|t| t.recurrence_unit.as_deref());
    let checked = if task.map(|t| t.is_recurring).unwrap_or(false) {
        " checked"
    } else {
        ""
    };

    format!(
        r#"<div class="modal">
  <h3>{heading}</h3>
  <form {verb}>
    <label>Title <input name="title" value="{title}" maxlength="255" required></label>
    <label>Description <textarea name="description">{description}</textarea></label>
    <label>Category <span hx-get="{category_url}" hx-trigger="load" hx-swap="outerHTML"></span></label>
    <label>Location <span hx-get="{location_url}" hx-trigger="load" hx-swap="outerHTML"></span></label>
    <label>Priority <select name="priority">{priorities}</select></label>
    <label>Status <select name="status">{statuses}</select></label>
    <label>Assigned to <select name="assigned_to">{assignees}</select></label>
    <label>Due <input type="datetime-local" name="estimated_completion_date" value="{due}"></label>
    <label>Cost <input type="number" step="0.01" min="0" name="cost" value="{cost}"></label>
    <fieldset>
      <label><input type="checkbox" name="is_recurring"{checked}> Recurring</label>
      <label>Repeats <select name="recurrence_type">{recurrence_types}</select></label>
      <label>Every <input type="number" min="0" name="recurrence_interval" value="{interval}"></label>
      <label>Unit <select name="recurrence_unit">{recurrence_units}</select></label>
      <label>Follows <span hx-get="{parent_url}" hx-trigger="load" hx-swap="outerHTML"></span></label>
    </fieldset>
    <div class="actions"><button type="submit">Save</button></div>
  </form>
</div>"#,
        heading = heading,
        verb = verb,
        title = escape(title),
        description = escape(description),
        category_url = escape(&category_url),
        location_url = escape(&location_url),
        priorities = enum_options(&Priority::ALL, priority, "Default (Medium)"),
        statuses = enum_options(&TaskStatus::ALL, status, "Default (New)"),
        assignees = assignees,
        due = input_datetime(task.and_then(|t| t.estimated_completion_date)),
        cost = task.and_then(|t| t.cost).map(|c| c.to_string()).unwrap_or_default(),
        checked = checked,
        recurrence_types = enum_options(&RecurrenceType::ALL, recurrence_type, "None"),
        interval = task.and_then(|t| t.recurrence_interval).map(|i| i.to_string()).unwrap_or_default(),
        recurrence_units = enum_options(&RecurrenceUnit::ALL, recurrence_unit, "None"),
        parent_url = escape(&parent_url),
    )
}

/// Parent task picker
pub fn select(tasks: &[Task], selected: Option<i64>, excluded: Option<i64>) -> String {
    let selected = selected.map(|id| id.to_string());
    let choices = options(
        tasks
            .iter()
            .filter(|t| Some(t.id) != excluded)
            .map(|t| (t.id.to_string(), t.title.as_str())),
        selected.as_deref(),
        "No parent task",
    );
    format!(r#"<select name="parent_task_id" id="parent_task_id">{}</select>"#, choices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task(id: i64, title: &str) -> Task {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        Task {
            id,
            title: title.to_string(),
            description: String::new(),
            category_id: None,
            category_name: Some("Plumbing".to_string()),
            location_id: None,
            location_name: None,
            priority: Some("High".to_string()),
            status: Some("In Progress".to_string()),
            created_by: 1,
            created_by_name: Some("Ann Admin".to_string()),
            assigned_to: None,
            assigned_to_name: None,
            created_at: created,
            updated_at: created,
            estimated_completion_date: Some(created),
            cost: Some(12.5),
            is_recurring: false,
            recurrence_type: None,
            recurrence_interval: None,
            recurrence_unit: None,
            parent_task_id: None,
            next_occurrence: None,
            completed_at: None,
        }
    }

    #[test]
    fn test_row_shows_status_and_due_date() {
        let html = list(&[task(3, "Fix leak")], &TaskFilters::default());
        assert!(html.contains(r#"<option value="In Progress" selected>In Progress</option>"#));
        assert!(html.contains("2025-03-01"));
        assert!(html.contains(r#"hx-post="/tasks/3/complete""#));
    }

    #[test]
    fn test_filter_bar_reflects_filters() {
        let filters = TaskFilters {
            status: Some(TaskStatus::OnHold),
            search_query: "boiler".to_string(),
            ..TaskFilters::default()
        };
        let html = list(&[], &filters);
        assert!(html.contains(r#"value="boiler""#));
        assert!(html.contains(r#"<option value="On Hold" selected>"#));
        assert!(html.contains("No tasks match"));
    }

    #[test]
    fn test_edit_form_prefills() {
        let html = form(Some(&task(3, "Fix leak")), &[]);
        assert!(html.contains(r#"hx-put="/tasks/3""#));
        assert!(html.contains(r#"value="2025-03-01T09:00""#));
        assert!(html.contains(r#"value="12.5""#));
        assert!(html.contains("excluded_id=3"));
    }

    #[test]
    fn test_select_excludes_self() {
        let html = select(&[task(1, "Parent"), task(2, "Child")], Some(1), Some(2));
        assert!(html.contains(r#"<option value="1" selected>Parent</option>"#));
        assert!(!html.contains("Child"));
    }
}
