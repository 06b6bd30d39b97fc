/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use upkeep_web::{app::AppState, config::Config};
/// use upkeep_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.pool_config()).await?;
/// let state = AppState::new(pool, config);
/// let app = upkeep_web::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::auth::require_session, routes};
use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use upkeep_shared::{auth::SessionCodec, repository::Repositories, service::Services};

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Signs and verifies the session cookie
    pub sessions: Arc<SessionCodec>,

    pub services: Services,
}

impl AppState {
    /// State backed by Postgres repositories on `db`
    pub fn new(db: PgPool, config: Config) -> Self {
        let repos = Repositories::postgres(db.clone());
        Self::with_repositories(db, config, repos)
    }

    /// State over any repository implementations
    pub fn with_repositories(db: PgPool, config: Config, repos: Repositories) -> Self {
        let sessions = SessionCodec::new(config.session.key.as_bytes());
        Self {
            db,
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            services: Services::new(repos),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                      # Login page (public)
/// ├── GET  /health                # Health check (public)
/// ├── POST /login                 # (public)
/// ├── GET  /logout                # (public)
/// ├── GET|POST /register          # (public)
/// ├── /public/*                   # Static files (public)
/// ├── GET  /home                  # Dashboard (session)
/// ├── /categories/                # (session)
/// ├── /locations/                 # (session)
/// └── /tasks/                     # (session)
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer), every request
/// 2. Session gate, only on routes that matched in the gated tree
///
/// Unknown paths get a 404 `NOT_FOUND` JSON body.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(routes::auth::login_page))
        .route("/health", get(routes::health::health_check))
        .route("/login", post(routes::auth::login))
        .route("/logout", get(routes::auth::logout))
        .route(
            "/register",
            get(routes::auth::register_page).post(routes::auth::register),
        );

    let category_routes = Router::new()
        .route(
            "/",
            post(routes::categories::create).get(routes::categories::list),
        )
        .route("/form", get(routes::categories::form))
        .route("/select", get(routes::categories::select))
        .route("/:id/form", get(routes::categories::edit_form))
        .route(
            "/:id",
            put(routes::categories::update).delete(routes::categories::delete),
        );

    let location_routes = Router::new()
        .route(
            "/",
            post(routes::locations::create).get(routes::locations::list),
        )
        .route("/form", get(routes::locations::form))
        .route("/select", get(routes::locations::select))
        .route("/:id/form", get(routes::locations::edit_form))
        .route(
            "/:id",
            put(routes::locations::update).delete(routes::locations::delete),
        );

    let task_routes = Router::new()
        .route("/", post(routes::tasks::create).get(routes::tasks::list))
        .route("/form", get(routes::tasks::form))
        .route("/select", get(routes::tasks::select))
        .route("/:id/form", get(routes::tasks::edit_form))
        .route(
            "/:id",
            put(routes::tasks::update).delete(routes::tasks::delete),
        )
        .route("/:id/status", put(routes::tasks::update_status))
        .route("/:id/assign", put(routes::tasks::assign))
        .route("/:id/complete", post(routes::tasks::complete));

    let gated_routes = Router::new()
        .route("/home", get(routes::home::home))
        .nest("/categories", category_routes)
        .nest("/locations", location_routes)
        .nest("/tasks", task_routes)
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(gated_routes)
        .nest_service("/public", ServeDir::new(&state.config.server.static_dir))
        .fallback(routes::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
