//! # Upkeep Web Server
//!
//! Serves the maintenance tracker: login, dashboard, and CRUD screens for
//! tasks, categories and locations.
//!
//! ## Usage
//!
//! ```bash
//! SESSION_KEY=... DATABASE_URL=postgresql://... cargo run -p upkeep-web
//! ```
//!
//! `LOG_FORMAT=json` switches log output to JSON lines; `RUST_LOG`
//! overrides the default filter.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use upkeep_shared::db::{migrations::run_migrations, pool::{close_pool, create_pool}};
use upkeep_web::{
    app::{build_router, AppState},
    config::Config,
};

const DEFAULT_FILTER: &str = "upkeep_web=debug,upkeep_shared=debug,tower_http=debug";

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Upkeep v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = create_pool(config.pool_config())
        .await
        .context("Failed to connect to the database")?;

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;
    }

    let address = config.bind_address();
    let app = build_router(AppState::new(pool.clone(), config));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received, exiting...");
        })
        .await
        .context("Server error")?;

    close_pool(pool).await;
    Ok(())
}
