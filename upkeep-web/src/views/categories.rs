//! Category fragments

use super::{escape, options};
use upkeep_shared::models::Category;

pub fn list(categories: &[Category]) -> String {
    let rows: String = if categories.is_empty() {
        r#"<li class="empty">No categories yet</li>"#.to_string()
    } else {
        categories.iter().map(row).collect()
    };

    format!(
        r##"<section class="card">
  <header class="card-header">
    <h2>Categories</h2>
    <button hx-get="/categories/form" hx-target="#modal">New category</button>
  </header>
  <ul class="rows">{rows}</ul>
</section>"##,
        rows = rows
    )
}

fn row(category: &Category) -> String {
    format!(
        r##"<li id="category-{id}">
  <div><strong>{name}</strong><p class="muted">{description}</p></div>
  <div class="actions">
    <button hx-get="/categories/{id}/form" hx-target="#modal">Edit</button>
    <button hx-delete="/categories/{id}" hx-confirm="Delete {name}?">Delete</button>
  </div>
</li>"##,
        id = category.id,
        name = escape(&category.name),
        description = escape(&category.description),
    )
}

/// Create form, or edit form when `category` is given
pub fn form(category: Option<&Category>) -> String {
    let (heading, verb, name, description) = match category {
        Some(c) => (
            "Edit category",
            format!(r#"hx-put="/categories/{}""#, c.id),
            c.name.as_str(),
            c.description.as_str(),
        ),
        None => ("New category", r#"hx-post="/categories""#.to_string(), "", ""),
    };

    format!(
        r#"<div class="modal">
  <h3>{heading}</h3>
  <form {verb}>
    <label>Name <input name="name" value="{name}" maxlength="100" required></label>
    <label>Description <textarea name="description">{description}</textarea></label>
    <div class="actions"><button type="submit">Save</button></div>
  </form>
</div>"#,
        heading = heading,
        verb = verb,
        name = escape(name),
        description = escape(description),
    )
}

pub fn select(categories: &[Category], selected: Option<i64>) -> String {
    let selected = selected.map(|id| id.to_string());
    let choices = options(
        categories.iter().map(|c| (c.id.to_string(), c.name.as_str())),
        selected.as_deref(),
        "No category",
    );
    format!(r#"<select name="category_id" id="category_id">{}</select>"#, choices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plumbing() -> Category {
        Category {
            id: 7,
            name: "Plumbing".to_string(),
            description: "Pipes & drains".to_string(),
        }
    }

    #[test]
    fn test_list_renders_rows() {
        let html = list(&[plumbing()]);
        assert!(html.contains(r#"id="category-7""#));
        assert!(html.contains("Pipes &amp; drains"));
        assert!(list(&[]).contains("No categories yet"));
    }

    #[test]
    fn test_form_targets() {
        assert!(form(None).contains(r#"hx-post="/categories""#));
        let edit = form(Some(&plumbing()));
        assert!(edit.contains(r#"hx-put="/categories/7""#));
        assert!(edit.contains(r#"value="Plumbing""#));
    }

    #[test]
    fn test_select_marks_current() {
        assert!(select(&[plumbing()], Some(7)).contains(r#"<option value="7" selected>"#));
    }
}
