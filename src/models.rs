//! Request and response payloads for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::lessons::{Lesson, LessonWithCreator};
use crate::db::users::User;

/// A titled link to an external video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VideoLink {
    pub title: String,
    pub url: String,
}

// ============================================================================
// Auth payloads
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

/// Login/register/refresh response: user profile plus token pair.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access: String,
    pub refresh: String,
}

// ============================================================================
// Lesson payloads
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct LessonCreateRequest {
    pub topic: String,
    pub subject: String,
    pub grade_level: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub video_links: Vec<VideoLink>,
    #[serde(default)]
    pub is_public: bool,
}

/// Partial update: absent fields leave the stored value untouched.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LessonUpdateRequest {
    pub topic: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    pub duration_minutes: Option<i64>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub activities: Option<Vec<String>>,
    pub questions: Option<Vec<String>>,
    pub summary: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub video_links: Option<Vec<VideoLink>>,
    pub is_public: Option<bool>,
}

/// Owner-facing lesson serialization.
#[derive(Debug, Serialize, ToSchema)]
pub struct LessonResponse {
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

impl From<&Lesson> for LessonResponse {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id,
            user_id: lesson.user_id,
            topic: lesson.topic.clone(),
            subject: lesson.subject.clone(),
            grade_level: lesson.grade_level.clone(),
            duration_minutes: lesson.duration_minutes,
            description: lesson.description.clone(),
            content: lesson.content.clone(),
            activities: lesson.activities.clone(),
            questions: lesson.questions.clone(),
            summary: lesson.summary.clone(),
            image_urls: lesson.image_urls.clone(),
            video_links: lesson.video_links.clone(),
            is_public: lesson.is_public,
            slug: lesson.slug.clone(),
            created_at: lesson.created_at,
            updated_at: lesson.updated_at,
        }
    }
}

/// Public lesson serialization: read-only, creator identity included,
/// visibility flag and update timestamp omitted.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicLessonResponse {
    pub id: Uuid,
    pub creator: String,
    pub creator_email: String,
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
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl From<&LessonWithCreator> for PublicLessonResponse {
    fn from(row: &LessonWithCreator) -> Self {
        let lesson = &row.lesson;
        Self {
            id: lesson.id,
            creator: row.creator_username.clone(),
            creator_email: row.creator_email.clone(),
            topic: lesson.topic.clone(),
            subject: lesson.subject.clone(),
            grade_level: lesson.grade_level.clone(),
            duration_minutes: lesson.duration_minutes,
            description: lesson.description.clone(),
            content: lesson.content.clone(),
            activities: lesson.activities.clone(),
            questions: lesson.questions.clone(),
            summary: lesson.summary.clone(),
            image_urls: lesson.image_urls.clone(),
            video_links: lesson.video_links.clone(),
            slug: lesson.slug.clone(),
            created_at: lesson.created_at,
        }
    }
}

/// Visibility toggle response.
#[derive(Debug, Serialize, ToSchema)]
pub struct VisibilityResponse {
    pub message: String,
    pub lesson: LessonResponse,
}

// ============================================================================
// Generation payloads
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub topic: String,
    pub subject: String,
    pub grade_level: String,
    pub duration_minutes: i64,
}

/// Generated lesson content. Nothing is persisted; the client follows up
/// with a create request. `warnings` is present only when at least one
/// third-party service degraded.
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub topic: String,
    pub subject: String,
    pub grade_level: String,
    pub duration_minutes: i64,
    pub description: String,
    pub content: String,
    pub activities: Vec<String>,
    pub questions: Vec<String>,
    pub summary: String,
    pub image_urls: Vec<String>,
    pub video_links: Vec<VideoLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}
