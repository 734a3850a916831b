//! Configuration resolution.
//!
//! Settings load from an optional TOML file, with environment variables
//! taking priority over file values. Third-party API keys are optional;
//! missing keys degrade the generation endpoint rather than failing boot.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Development-only signing key, used when no secret is configured.
const DEV_JWT_SECRET: &str = "edunova-insecure-dev-secret-change-me";

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Path to the SQLite database file.
    pub database_path: PathBuf,
    /// HS256 signing secret for access and refresh tokens.
    pub jwt_secret: String,
    /// Access token lifetime in minutes.
    pub access_token_minutes: i64,
    /// Refresh token lifetime in days.
    pub refresh_token_days: i64,
    /// OpenAI API key (lesson content generation).
    pub openai_api_key: Option<String>,
    /// Unsplash access key / application ID (image search).
    pub unsplash_access_key: Option<String>,
    /// YouTube Data API v3 key (video search).
    pub youtube_api_key: Option<String>,
}

/// On-disk TOML representation. All fields optional; env fills the gaps.
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub bind_addr: Option<String>,
    pub database_path: Option<PathBuf>,
    pub jwt_secret: Option<String>,
    pub access_token_minutes: Option<i64>,
    pub refresh_token_days: Option<i64>,
    pub openai_api_key: Option<String>,
    pub unsplash_access_key: Option<String>,
    pub youtube_api_key: Option<String>,
}

impl Config {
    /// Load configuration: TOML file (if present) overridden by environment.
    ///
    /// The file path comes from `EDUNOVA_CONFIG`, defaulting to
    /// `./edunova.toml`. A missing file is not an error.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("EDUNOVA_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("edunova.toml"));
        let file = read_toml_config(&config_path)?;
        Ok(Self::resolve(file))
    }

    /// Merge file values with environment overrides.
    fn resolve(file: TomlConfig) -> Self {
        let jwt_secret = env_var("EDUNOVA_JWT_SECRET")
            .or_else(|| env_var("SECRET_KEY"))
            .or(file.jwt_secret)
            .unwrap_or_else(|| {
                warn!("JWT secret not set; using insecure development fallback");
                DEV_JWT_SECRET.to_string()
            });

        Self {
            bind_addr: env_var("EDUNOVA_BIND_ADDR")
                .or(file.bind_addr)
                .unwrap_or_else(|| "127.0.0.1:8000".to_string()),
            database_path: env_var("EDUNOVA_DATABASE_PATH")
                .map(PathBuf::from)
                .or(file.database_path)
                .unwrap_or_else(|| PathBuf::from("edunova.db")),
            jwt_secret,
            access_token_minutes: env_var("EDUNOVA_JWT_ACCESS_MINUTES")
                .and_then(|v| v.parse().ok())
                .or(file.access_token_minutes)
                .unwrap_or(60),
            refresh_token_days: env_var("EDUNOVA_JWT_REFRESH_DAYS")
                .and_then(|v| v.parse().ok())
                .or(file.refresh_token_days)
                .unwrap_or(7),
            openai_api_key: env_var("OPENAI_API_KEY").or(file.openai_api_key),
            // Unsplash calls the same credential both "Access Key" and
            // "Application ID"; accept either name.
            unsplash_access_key: env_var("UNSPLASH_ACCESS_KEY")
                .or_else(|| env_var("UNSPLASH_APPLICATION_ID"))
                .or(file.unsplash_access_key),
            youtube_api_key: env_var("YOUTUBE_API_KEY").or(file.youtube_api_key),
        }
    }
}

/// Read an environment variable, treating empty/whitespace values as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parse the TOML config file, tolerating its absence.
fn read_toml_config(path: &Path) -> anyhow::Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Read config {} failed: {}", path.display(), e))?;
    toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Parse config {} failed: {}", path.display(), e))
}
