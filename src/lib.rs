//! EduNova backend library interface.
//!
//! Exposes the application state and router so integration tests can drive
//! the full HTTP surface without a socket.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod utils;
pub mod validators;

pub use crate::config::Config;
pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::{LessonGenerator, OpenAiClient, UnsplashClient, YouTubeClient};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: SqlitePool,
    /// Resolved configuration.
    pub config: Arc<Config>,
    /// Third-party generation orchestrator.
    pub generator: Arc<LessonGenerator>,
    /// Service startup timestamp for uptime reporting.
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Build state with clients derived from the configuration's API keys.
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let generator = LessonGenerator::new(
            OpenAiClient::new(config.openai_api_key.clone()),
            UnsplashClient::new(config.unsplash_access_key.clone()),
            YouTubeClient::new(config.youtube_api_key.clone()),
        );
        Self {
            db,
            config: Arc::new(config),
            generator: Arc::new(generator),
            startup_time: Utc::now(),
        }
    }

    /// Build state with an explicit generator (tests substitute clients
    /// pointed at local mock servers).
    pub fn with_generator(db: SqlitePool, config: Config, generator: LessonGenerator) -> Self {
        Self {
            db,
            config: Arc::new(config),
            generator: Arc::new(generator),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::auth_routes())
        .merge(api::lesson_routes())
        .merge(api::public_routes())
        .merge(api::health_routes())
        .merge(api::docs_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
