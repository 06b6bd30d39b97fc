//! Location fragments

use super::{escape, options};
use upkeep_shared::models::Location;

pub fn list(locations: &[Location]) -> String {
    let rows: String = if locations.is_empty() {
        r#"<li class="empty">No locations yet</li>"#.to_string()
    } else {
        locations.iter().map(row).collect()
    };

    format!(
        r##"<section class="card">
  <header class="card-header">
    <h2>Locations</h2>
    <button hx-get="/locations/form" hx-target="#modal">New location</button>
  </header>
  <ul class="rows">{rows}</ul>
</section>"##,
        rows = rows
    )
}

fn row(location: &Location) -> String {
    let parent = location
        .parent_location_name
        .as_deref()
        .map(|p| format!(r#"<span class="tag">in {}</span>"#, escape(p)))
        .unwrap_or_default();

    format!(
        r##"<li id="location-{id}">
  <div><strong>{name}</strong> {parent}<p class="muted">{description}</p></div>
  <div class="actions">
    <button hx-get="/locations/{id}/form" hx-target="#modal">Edit</button>
    <button hx-delete="/locations/{id}" hx-confirm="Delete {name}?">Delete</button>
  </div>
</li>"##,
        id = location.id,
        name = escape(&location.name),
        parent = parent,
        description = escape(&location.description),
    )
}

/// Create or edit form; the parent picker loads itself from `/locations/select`
pub fn form(location: Option<&Location>) -> String {
    let (heading, verb, name, description, picker) = match location {
        Some(l) => (
            "Edit location",
            format!(r#"hx-put="/locations/{}""#, l.id),
            l.name.as_str(),
            l.description.as_str(),
            format!(
                "/locations/select?field=parent_location_id&location_id={}&excluded_id={}",
                l.parent_location_id.map(|p| p.to_string()).unwrap_or_default(),
                l.id
            ),
        ),
        None => (
            "New location",
            r#"hx-post="/locations""#.to_string(),
            "",
            "",
            "/locations/select?field=parent_location_id".to_string(),
        ),
    };

    format!(
        r#"<div class="modal">
  <h3>{heading}</h3>
  <form {verb}>
    <label>Name <input name="name" value="{name}" maxlength="100" required></label>
    <label>Description <textarea name="description">{description}</textarea></label>
    <label>Inside <span hx-get="{picker}" hx-trigger="load" hx-swap="outerHTML"></span></label>
    <div class="actions"><button type="submit">Save</button></div>
  </form>
</div>"#,
        heading = heading,
        verb = verb,
        name = escape(name),
        description = escape(description),
        picker = escape(&picker),
    )
}

/// Location picker submitted as `field`; `excluded` keeps a location from
/// being offered as its own parent
pub fn select(
    locations: &[Location],
    field: &str,
    selected: Option<i64>,
    excluded: Option<i64>,
) -> String {
    let selected = selected.map(|id| id.to_string());
    let choices = options(
        locations
            .iter()
            .filter(|l| Some(l.id) != excluded)
            .map(|l| (l.id.to_string(), l.name.as_str())),
        selected.as_deref(),
        "No location",
    );
    format!(
        r#"<select name="{field}" id="{field}">{choices}</select>"#,
        field = escape(field),
        choices = choices
    )
}
