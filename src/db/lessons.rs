//! Lesson database operations.
//!
//! List-valued fields (activities, questions, image_urls, video_links) are
//! stored as JSON text. Malformed stored JSON decodes to an empty list
//! rather than failing the read.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::VideoLink;
use crate::utils::{decode_json_list, slugify};

/// Lesson record.
#[derive(Debug, Clone)]
pub struct Lesson {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic: String,
    pub subject: String,
    pub grade_level: String,
    pub duration_minutes: i64,
    pub description: Option<String>,
    pub content: Option<String>,
    pub activities: Vec<String>,
    pub questions: Vec<String>,
    pub summary: Option<String>,
    pub image_urls: Vec<String>,
    pub video_links: Vec<VideoLink>,
    pub is_public: bool,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A lesson joined with its creator's identity, for public serialization.
#[derive(Debug, Clone)]
pub struct LessonWithCreator {
    pub lesson: Lesson,
    pub creator_username: String,
    pub creator_email: String,
}

fn parse_timestamp(raw: &str, column: &str) -> ApiResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApiError::Internal(format!("Invalid {} in database: {}", column, e)))
}

fn lesson_from_row(row: &SqliteRow) -> ApiResult<Lesson> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let activities: String = row.get("activities");
    let questions: String = row.get("questions");
    let image_urls: String = row.get("image_urls");
    let video_links: String = row.get("video_links");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Lesson {
        id: Uuid::parse_str(&id)
            .map_err(|e| ApiError::Internal(format!("Invalid lesson id in database: {}", e)))?,
        user_id: Uuid::parse_str(&user_id)
            .map_err(|e| ApiError::Internal(format!("Invalid user_id in database: {}", e)))?,
        topic: row.get("topic"),
        subject: row.get("subject"),
        grade_level: row.get("grade_level"),
        duration_minutes: row.get("duration_minutes"),
        description: row.get("description"),
        content: row.get("content"),
        activities: decode_json_list(&activities),
        questions: decode_json_list(&questions),
        summary: row.get("summary"),
        image_urls: decode_json_list(&image_urls),
        video_links: decode_json_list(&video_links),
        is_public: row.get::<i64, _>("is_public") != 0,
        slug: row.get("slug"),
        created_at: parse_timestamp(&created_at, "created_at")?,
        updated_at: parse_timestamp(&updated_at, "updated_at")?,
    })
}

fn encode_list<T: serde::Serialize>(list: &[T], field: &str) -> ApiResult<String> {
    serde_json::to_string(list)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize {}: {}", field, e)))
}

/// Generate a unique slug from a lesson topic.
///
/// A taken base slug gets `-` plus the first 8 characters of a fresh UUID
/// appended, re-checked until unique.
pub async fn generate_unique_slug(pool: &SqlitePool, topic: &str) -> ApiResult<String> {
    let base = slugify(topic);
    let base = if base.is_empty() {
        "lesson".to_string()
    } else {
        base
    };

    let mut slug = base.clone();
    while slug_exists(pool, &slug).await? {
        let unique_id = Uuid::new_v4().to_string();
        slug = format!("{}-{}", base, &unique_id[..8]);
    }
    Ok(slug)
}

async fn slug_exists(pool: &SqlitePool, slug: &str) -> ApiResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons WHERE slug = ?")
        .bind(slug)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Insert a new lesson.
pub async fn insert_lesson(pool: &SqlitePool, lesson: &Lesson) -> ApiResult<()> {
    sqlx::query(
        r#"
        INSERT INTO lessons (
            id, user_id, topic, subject, grade_level, duration_minutes,
            description, content, activities, questions, summary,
            image_urls, video_links, is_public, slug, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(lesson.id.to_string())
    .bind(lesson.user_id.to_string())
    .bind(&lesson.topic)
    .bind(&lesson.subject)
    .bind(&lesson.grade_level)
    .bind(lesson.duration_minutes)
    .bind(&lesson.description)
    .bind(&lesson.content)
    .bind(encode_list(&lesson.activities, "activities")?)
    .bind(encode_list(&lesson.questions, "questions")?)
    .bind(&lesson.summary)
    .bind(encode_list(&lesson.image_urls, "image_urls")?)
    .bind(encode_list(&lesson.video_links, "video_links")?)
    .bind(lesson.is_public as i64)
    .bind(&lesson.slug)
    .bind(lesson.created_at.to_rfc3339())
    .bind(lesson.updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Update the writable fields of an existing lesson. The slug, owner, and
/// created_at are immutable; updated_at is refreshed.
pub async fn update_lesson(pool: &SqlitePool, lesson: &Lesson) -> ApiResult<()> {
    sqlx::query(
        r#"
        UPDATE lessons SET
            topic = ?, subject = ?, grade_level = ?, duration_minutes = ?,
            description = ?, content = ?, activities = ?, questions = ?,
            summary = ?, image_urls = ?, video_links = ?, is_public = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&lesson.topic)
    .bind(&lesson.subject)
    .bind(&lesson.grade_level)
    .bind(lesson.duration_minutes)
    .bind(&lesson.description)
    .bind(&lesson.content)
    .bind(encode_list(&lesson.activities, "activities")?)
    .bind(encode_list(&lesson.questions, "questions")?)
    .bind(&lesson.summary)
    .bind(encode_list(&lesson.image_urls, "image_urls")?)
    .bind(encode_list(&lesson.video_links, "video_links")?)
    .bind(lesson.is_public as i64)
    .bind(Utc::now().to_rfc3339())
    .bind(lesson.id.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a lesson by id.
pub async fn load_lesson(pool: &SqlitePool, id: Uuid) -> ApiResult<Option<Lesson>> {
    let row = sqlx::query("SELECT * FROM lessons WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(lesson_from_row).transpose()
}

/// Delete a lesson by id. Returns whether a row was removed.
pub async fn delete_lesson(pool: &SqlitePool, id: Uuid) -> ApiResult<bool> {
    let result = sqlx::query("DELETE FROM lessons WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// List a user's lessons, newest first. `search` filters topic OR subject by
/// case-insensitive substring.
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
    search: Option<&str>,
) -> ApiResult<Vec<Lesson>> {
    let rows = match search.filter(|s| !s.trim().is_empty()) {
        Some(term) => {
            let pattern = format!("%{}%", term.trim());
            sqlx::query(
                r#"
                SELECT * FROM lessons
                WHERE user_id = ? AND (topic LIKE ? OR subject LIKE ?)
                ORDER BY created_at DESC
                "#,
            )
            .bind(user_id.to_string())
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query("SELECT * FROM lessons WHERE user_id = ? ORDER BY created_at DESC")
                .bind(user_id.to_string())
                .fetch_all(pool)
                .await?
        }
    };

    rows.iter().map(lesson_from_row).collect()
}

fn lesson_with_creator_from_row(row: &SqliteRow) -> ApiResult<LessonWithCreator> {
    Ok(LessonWithCreator {
        lesson: lesson_from_row(row)?,
        creator_username: row.get("creator_username"),
        creator_email: row.get("creator_email"),
    })
}

/// List public lessons, newest first, with creator identity joined in.
pub async fn list_public(
    pool: &SqlitePool,
    search: Option<&str>,
) -> ApiResult<Vec<LessonWithCreator>> {
    let base = r#"
        SELECT lessons.*, users.username AS creator_username, users.email AS creator_email
        FROM lessons JOIN users ON users.id = lessons.user_id
        WHERE lessons.is_public = 1
    "#;

    let rows = match search.filter(|s| !s.trim().is_empty()) {
        Some(term) => {
            let pattern = format!("%{}%", term.trim());
            let query = format!(
                "{} AND (lessons.topic LIKE ? OR lessons.subject LIKE ?)
                 ORDER BY lessons.created_at DESC",
                base
            );
            sqlx::query(&query)
                .bind(&pattern)
                .bind(&pattern)
                .fetch_all(pool)
                .await?
        }
        None => {
            let query = format!("{} ORDER BY lessons.created_at DESC", base);
            sqlx::query(&query).fetch_all(pool).await?
        }
    };

    rows.iter().map(lesson_with_creator_from_row).collect()
}

/// Load a public lesson by slug. Private lessons are invisible here.
pub async fn load_public_by_slug(
    pool: &SqlitePool,
    slug: &str,
) -> ApiResult<Option<LessonWithCreator>> {
    let row = sqlx::query(
        r#"
        SELECT lessons.*, users.username AS creator_username, users.email AS creator_email
        FROM lessons JOIN users ON users.id = lessons.user_id
        WHERE lessons.slug = ? AND lessons.is_public = 1
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    row.as_ref().map(lesson_with_creator_from_row).transpose()
}
