//! Database access.
//!
//! SQLite via sqlx. Tables are created on boot with `CREATE TABLE IF NOT
//! EXISTS`; JSON-array lesson fields are stored as TEXT columns.

pub mod lessons;
pub mod users;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize database connection pool, creating the file if missing.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let options = SqliteConnectOptions::from_str(&db_url)?.foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create application tables and indexes if they don't exist.
///
/// Public so integration tests can initialize in-memory databases.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lessons (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            topic TEXT NOT NULL,
            subject TEXT NOT NULL,
            grade_level TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            description TEXT,
            content TEXT,
            activities TEXT NOT NULL DEFAULT '[]',
            questions TEXT NOT NULL DEFAULT '[]',
            summary TEXT,
            image_urls TEXT NOT NULL DEFAULT '[]',
            video_links TEXT NOT NULL DEFAULT '[]',
            is_public INTEGER NOT NULL DEFAULT 0,
            slug TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_lessons_user_created
         ON lessons (user_id, created_at DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_lessons_slug ON lessons (slug)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_lessons_public_slug ON lessons (is_public, slug)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (users, lessons)");

    Ok(())
}
