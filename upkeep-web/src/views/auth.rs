//! Login and registration views

use super::escape;

/// Login form; `error` is shown above the fields
pub fn login(email: &str, original_url: &str, error: Option<&str>) -> String {
    let error = error
        .map(|msg| format!(r#"<p class="form-error">{}</p>"#, escape(msg)))
        .unwrap_or_default();

    format!(
        r##"<section id="login" class="card narrow">
  <h2>Sign in</h2>
  {error}
  <form hx-post="/login" hx-target="#login" hx-swap="outerHTML">
    <input type="hidden" name="original_url" value="{original_url}">
    <label>Email <input type="email" name="email" value="{email}" required></label>
    <label>Password <input type="password" name="password" required></label>
    <button type="submit">Sign in</button>
  </form>
  <p>No account? <a href="/register?email={register_email}">Register</a></p>
</section>"##,
        error = error,
        email = escape(email),
        register_email = escape(&urlencoding::encode(email)),
        original_url = escape(original_url),
    )
}

pub fn register(email: &str) -> String {
    format!(
        r##"<section id="register" class="card narrow">
  <h2>Create an account</h2>
  <form hx-post="/register" hx-target="#register" hx-swap="outerHTML">
    <label>First name <input name="first_name" required></label>
    <label>Last name <input name="last_name" required></label>
    <label>Email <input type="email" name="email" value="{email}" required></label>
    <label>Password <input type="password" name="password" required></label>
    <button type="submit">Register</button>
  </form>
  <p>Already registered? <a href="/">Sign in</a></p>
</section>"##,
        email = escape(email),
    )
}
