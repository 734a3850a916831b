//! User database operations.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// User record.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> ApiResult<User> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");
    Ok(User {
        id: Uuid::parse_str(&id)
            .map_err(|e| ApiError::Internal(format!("Invalid user id in database: {}", e)))?,
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        is_active: row.get::<i64, _>("is_active") != 0,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| ApiError::Internal(format!("Invalid created_at in database: {}", e)))?
            .with_timezone(&Utc),
    })
}

/// Insert a new user.
pub async fn insert_user(pool: &SqlitePool, user: &User) -> ApiResult<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, is_active, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user.id.to_string())
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.is_active as i64)
    .bind(user.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load user by username.
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> ApiResult<Option<User>> {
    let row = sqlx::query("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(user_from_row).transpose()
}

/// Load user by id.
pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> ApiResult<Option<User>> {
    let row = sqlx::query("SELECT * FROM users WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(user_from_row).transpose()
}

/// Check whether a username or email is already registered.
pub async fn username_or_email_taken(
    pool: &SqlitePool,
    username: &str,
    email: &str,
) -> ApiResult<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? OR email = ?")
            .bind(username)
            .bind(email)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}
