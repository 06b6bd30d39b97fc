//! Dashboard

use super::escape;
use upkeep_shared::auth::SessionUser;
use upkeep_shared::service::TaskStats;

fn tally<T: std::fmt::Display>(heading: &str, counts: &[(T, i64)], param: &str) -> String {
    let rows: String = counts
        .iter()
        .map(|(value, count)| {
            let value = value.to_string();
            format!(
                r#"<li><a href="/tasks?{param}={href}">{label}</a> <span class="count">{count}</span></li>"#,
                param = param,
                href = escape(&value.replace(' ', "+")),
                label = escape(&value),
                count = count,
            )
        })
        .collect();

    format!(
        r#"<div class="card"><h3>{}</h3><ul class="tally">{}</ul></div>"#,
        escape(heading),
        rows
    )
}

pub fn home(user: &SessionUser, stats: &TaskStats) -> String {
    format!(
        r#"<section class="home">
  <h2>Welcome, {name}</h2>
  <p class="muted">{total} task(s) on record</p>
  <div class="grid">
    {by_status}
    {by_priority}
  </div>
</section>"#,
        name = escape(&user.first_name),
        total = stats.total,
        by_status = tally("By status", &stats.by_status, "status"),
        by_priority = tally("By priority", &stats.by_priority, "priority"),
    )
}
