//! HTML rendering
//!
//! Pages and fragments are plain `format!` builders returning `String`.
//! Handlers hand a fragment to [`render`], which wraps it in the site layout
//! unless the request came from htmx:
//!
//! ```text
//! HX-Request: true   ->  <div>fragment</div>
//! (no header)        ->  <!DOCTYPE html>...layout...<div>fragment</div>...
//! ```
//!
//! Every interpolated value goes through [`escape`].

pub mod auth;
pub mod categories;
pub mod home;
pub mod locations;
pub mod tasks;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chrono::{DateTime, Utc};

/// Header htmx sets on every request it issues
pub const HX_REQUEST: &str = "hx-request";
/// Response header asking htmx to reload the page
pub const HX_REFRESH: &str = "hx-refresh";
/// Response header asking htmx to navigate
pub const HX_REDIRECT: &str = "hx-redirect";

/// Escapes text for use in element content and quoted attributes
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Full document around `body`
///
/// htmx leaves 4xx responses unswapped by default; the inline listener lets
/// the 401 login form replace its target.
pub fn layout(title: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title} | Upkeep</title>
  <link rel="stylesheet" href="/public/styles.css">
  <script src="https://unpkg.com/htmx.org@1.9.12"></script>
</head>
<body>
  <nav class="topbar">
    <a href="/home">Home</a>
    <a href="/tasks">Tasks</a>
    <a href="/categories">Categories</a>
    <a href="/locations">Locations</a>
    <a href="#" hx-get="/logout">Log out</a>
  </nav>
  <main id="content">
{body}
  </main>
  <div id="modal"></div>
  <script>
    document.body.addEventListener("htmx:beforeSwap", function (evt) {{
      if (evt.detail.xhr.status === 401) {{
        evt.detail.shouldSwap = true;
        evt.detail.isError = false;
      }}
    }});
  </script>
</body>
</html>"##,
        title = escape(title),
        body = body,
    )
}

/// 200 response: the bare fragment for htmx, the full page otherwise
pub fn render(headers: &HeaderMap, title: &str, fragment: String) -> Response {
    render_with_status(StatusCode::OK, headers, title, fragment)
}

pub fn render_with_status(
    status: StatusCode,
    headers: &HeaderMap,
    title: &str,
    fragment: String,
) -> Response {
    let html = if is_htmx(headers) {
        fragment
    } else {
        layout(title, &fragment)
    };
    (status, Html(html)).into_response()
}

/// `<option>` list with an empty leading choice
pub(crate) fn options<'a, I>(items: I, selected: Option<&str>, placeholder: &str) -> String
where
    I: IntoIterator<Item = (String, &'a str)>,
{
    let mut out = format!(r#"<option value="">{}</option>"#, escape(placeholder));
    for (value, label) in items {
        let mark = if Some(value.as_str()) == selected {
            " selected"
        } else {
            ""
        };
        out.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            escape(&value),
            mark,
            escape(label)
        ));
    }
    out
}

pub(crate) fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Value for an `<input type="datetime-local">`
pub(crate) fn input_datetime(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or_default()
}
