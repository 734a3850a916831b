//! edunova-backend - lesson management and generation service.
//!
//! JWT-authenticated lesson CRUD over SQLite, public sharing by slug, and
//! lesson content generation via OpenAI, Unsplash, and YouTube.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use edunova_backend::{build_router, db, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting edunova-backend");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    info!("Database: {}", config.database_path.display());

    let db_pool = db::init_database_pool(&config.database_path).await?;
    info!("Database connection established");

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(db_pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);
    info!("API docs: http://{}/api/docs/openapi.json", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
