/// Integration tests for the Upkeep web server
///
/// These tests drive the full router over in-memory repositories:
/// - Resource CRUD with htmx response headers
/// - Request validation and the error envelope
/// - Task filtering and state changes
/// - Unknown routes

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, body_text, TestContext};
use serde_json::json;

/// Creating a category returns 201, a fresh id and `Hx-Refresh`
#[tokio::test]
async fn test_create_category() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(ctx.json("POST", "/categories", json!({"name": "Plumbing", "description": ""})))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()["hx-refresh"], "true");
    let body = body_json(response).await;
    assert!(body["id"].as_i64().unwrap() > 0);
}

/// A second category with the same name is a conflict
#[tokio::test]
async fn test_duplicate_category_conflicts() {
    let ctx = TestContext::new().await;
    ctx.create_category("Plumbing").await;

    let response = ctx
        .send(ctx.json("POST", "/categories", json!({"name": "Plumbing", "description": ""})))
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], "CONFLICT");
}

/// Missing required fields are named in the violations
#[tokio::test]
async fn test_missing_name_is_invalid_format() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(ctx.json("POST", "/categories", json!({"description": "no name"})))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INVALID_FORMAT");
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["parameters"], json!(["name"]));
    assert_eq!(
        body["violations"],
        json!([{"name": "name", "message": "This field is required"}])
    );
}

/// Malformed JSON never reports the generic message
#[tokio::test]
async fn test_malformed_json() {
    let ctx = TestContext::new().await;

    let request = Request::builder()
        .method("POST")
        .uri("/categories")
        .header("cookie", ctx.cookie())
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name": "Plumbing""#))
        .unwrap();
    let response = ctx.send(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INVALID_FORMAT");
    assert_eq!(body["message"], "Invalid JSON syntax");
    assert_eq!(body["violations"], json!([]));
}

/// A field of the wrong JSON type reports expected and actual types
#[tokio::test]
async fn test_wrong_json_type() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(ctx.json("POST", "/categories", json!({"name": 5})))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["violations"],
        json!([{"name": "name", "message": "Expected type <string>, but got <integer>"}])
    );
}

/// A path id that is not a number names the parameter
#[tokio::test]
async fn test_non_integer_path_id() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(ctx.json("PUT", "/categories/abc", json!({"name": "Plumbing"})))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["violations"],
        json!([{"name": "id", "message": "Expected type <integer>"}])
    );
}

/// Form bodies bind the same way JSON bodies do
#[tokio::test]
async fn test_form_body_update_and_delete() {
    let ctx = TestContext::new().await;
    let id = ctx.create_category("Plumbing").await;

    let response = ctx
        .send(ctx.form("PUT", &format!("/categories/{}", id), "name=Electrical&description=Wiring"))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()["hx-refresh"], "true");

    let html = body_text(ctx.send(ctx.get("/categories")).await).await;
    assert!(html.contains("Electrical"));
    assert!(!html.contains("Plumbing"));

    let response = ctx
        .send(
            Request::builder()
                .method("DELETE")
                .uri(format!("/categories/{}", id))
                .header("cookie", ctx.cookie())
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx.send(ctx.get(&format!("/categories/{}/form", id))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

/// htmx requests get fragments, browser navigation gets the full page
#[tokio::test]
async fn test_fragment_versus_page() {
    let ctx = TestContext::new().await;

    let fragment = body_text(ctx.send(ctx.get("/categories")).await).await;
    assert!(!fragment.contains("<!DOCTYPE html>"));
    assert!(fragment.contains("Categories"));

    let request = Request::builder()
        .uri("/categories")
        .header("cookie", ctx.cookie())
        .body(Body::empty())
        .unwrap();
    let page = body_text(ctx.send(request).await).await;
    assert!(page.starts_with("<!DOCTYPE html>"));
}

#[tokio::test]
async fn test_category_select_marks_selection() {
    let ctx = TestContext::new().await;
    let id = ctx.create_category("Plumbing").await;

    let html = body_text(
        ctx.send(ctx.get(&format!("/categories/select?category_id={}", id)))
            .await,
    )
    .await;
    assert!(html.contains(&format!(r#"<option value="{}" selected>Plumbing</option>"#, id)));
}

/// Locations keep their parent and refuse to parent themselves
#[tokio::test]
async fn test_location_parenting() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(ctx.json("POST", "/locations", json!({"name": "Basement"})))
        .await;
    let basement = body_json(response).await["id"].as_i64().unwrap();

    let response = ctx
        .send(ctx.json(
            "POST",
            "/locations",
            json!({"name": "Boiler room", "parent_location_id": basement.to_string()}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let html = body_text(ctx.send(ctx.get("/locations")).await).await;
    assert!(html.contains("in Basement"));

    let response = ctx
        .send(ctx.json(
            "PUT",
            &format!("/locations/{}", basement),
            json!({"name": "Basement", "parent_location_id": basement.to_string()}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["parameters"], json!(["parent_location_id"]));
}

#[tokio::test]
async fn test_location_parent_must_be_numeric() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(ctx.form("POST", "/locations", "name=Attic&parent_location_id=up"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["violations"],
        json!([{"name": "parent_location_id", "message": "Should be a numeric string"}])
    );
}

/// Tasks created through the form show up in filtered listings
#[tokio::test]
async fn test_task_create_and_filter() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(ctx.form("POST", "/tasks", "title=Fix+leak&priority=High&status=New"))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let leak = body_json(response).await["id"].as_i64().unwrap();

    let response = ctx
        .send(ctx.form("POST", "/tasks", "title=Paint+fence&priority=Low"))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let html = body_text(ctx.send(ctx.get("/tasks?priority=High")).await).await;
    assert!(html.contains(&format!(r#"id="task-{}""#, leak)));
    assert!(!html.contains("Paint fence"));

    let html = body_text(ctx.send(ctx.get("/tasks?search=fence&status=")).await).await;
    assert!(html.contains("Paint fence"));
    assert!(!html.contains("Fix leak"));
}

#[tokio::test]
async fn test_task_filter_rejects_unknown_status() {
    let ctx = TestContext::new().await;

    let response = ctx.send(ctx.get("/tasks?status=Someday")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["parameters"], json!(["status"]));
}

/// Task validation covers enums, numbers and recurrence settings
#[tokio::test]
async fn test_task_validation() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(ctx.json("POST", "/tasks", json!({"title": "Fix leak", "priority": "Whenever"})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["parameters"], json!(["priority"]));
    assert!(body["violations"][0]["message"]
        .as_str()
        .unwrap()
        .starts_with("Should be one of: Low, Medium, High"));

    let response = ctx
        .send(ctx.form("POST", "/tasks", "title=Filter+swap&is_recurring=on"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["violations"],
        json!([{"name": "recurrence_type", "message": "This field is required"}])
    );

    let response = ctx
        .send(ctx.form("POST", "/tasks", "title=Filter+swap&cost=-3"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["violations"],
        json!([{"name": "cost", "message": "Should be at least 0"}])
    );

    let response = ctx
        .send(ctx.json(
            "POST",
            "/tasks",
            json!({
                "title": "Inspect roof",
                "is_recurring": true,
                "recurrence_type": "Yearly",
                "recurrence_interval": 2_000_000_000
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["parameters"], json!(["recurrence_interval"]));
    assert!(body["violations"][0]["message"]
        .as_str()
        .unwrap()
        .starts_with("Should be between 0 and 1000"));
}

/// Status, assignment and completion each refresh the page
#[tokio::test]
async fn test_task_state_changes() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(ctx.json("POST", "/tasks", json!({"title": "Replace filter"})))
        .await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = ctx
        .send(ctx.json("PUT", &format!("/tasks/{}/status", id), json!({"status": "On Hold"})))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()["hx-refresh"], "true");

    let task = ctx.state.services.tasks.get_by_id(id).await.unwrap();
    assert_eq!(task.status.as_deref(), Some("On Hold"));

    let response = ctx
        .send(ctx.json(
            "PUT",
            &format!("/tasks/{}/assign", id),
            json!({"assigned_to": ctx.user.id.to_string()}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let task = ctx.state.services.tasks.get_by_id(id).await.unwrap();
    assert_eq!(task.assigned_to, Some(ctx.user.id));

    let response = ctx
        .send(ctx.json("PUT", &format!("/tasks/{}/assign", id), json!({"assigned_to": "abc"})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .send(ctx.json("POST", &format!("/tasks/{}/complete", id), json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let task = ctx.state.services.tasks.get_by_id(id).await.unwrap();
    assert!(task.is_completed());
    assert!(task.completed_at.is_some());

    let html = body_text(ctx.send(ctx.get("/tasks?is_completed=false")).await).await;
    assert!(!html.contains("Replace filter"));
}

#[tokio::test]
async fn test_task_status_is_required() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(ctx.json("POST", "/tasks", json!({"title": "Replace filter"})))
        .await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = ctx
        .send(ctx.json("PUT", &format!("/tasks/{}/status", id), json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["violations"],
        json!([{"name": "status", "message": "This field is required"}])
    );
}

/// Task updates answer 200 and reject self-parenting
#[tokio::test]
async fn test_task_update() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(ctx.json("POST", "/tasks", json!({"title": "Clean gutters"})))
        .await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = ctx
        .send(ctx.json(
            "PUT",
            &format!("/tasks/{}", id),
            json!({"title": "Clean gutters", "priority": "High", "cost": "40.50"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["hx-refresh"], "true");
    let task = ctx.state.services.tasks.get_by_id(id).await.unwrap();
    assert_eq!(task.priority.as_deref(), Some("High"));
    assert_eq!(task.cost, Some(40.5));

    let response = ctx
        .send(ctx.json(
            "PUT",
            &format!("/tasks/{}", id),
            json!({"title": "Clean gutters", "parent_task_id": id.to_string()}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .send(ctx.json("PUT", "/tasks/999", json!({"title": "Ghost"})))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_form_lists_assignees() {
    let ctx = TestContext::new().await;

    let html = body_text(ctx.send(ctx.get("/tasks/form")).await).await;
    assert!(html.contains(r#"hx-post="/tasks""#));
    assert!(html.contains("Ann Admin"));
}

/// The dashboard counts tasks per status and priority
#[tokio::test]
async fn test_home_counts() {
    let ctx = TestContext::new().await;
    ctx.send(ctx.json("POST", "/tasks", json!({"title": "One", "priority": "High"})))
        .await;
    ctx.send(ctx.json("POST", "/tasks", json!({"title": "Two", "priority": "High"})))
        .await;

    let response = ctx.send(ctx.get("/home")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Welcome, Ann"));
    assert!(html.contains("2 task(s) on record"));
    assert!(html.contains(r#"<a href="/tasks?priority=High">High</a> <span class="count">2</span>"#));
}

/// Unknown paths get a JSON 404
#[tokio::test]
async fn test_unknown_route() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(Request::builder().uri("/nowhere").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["message"], "Route not found");
}
