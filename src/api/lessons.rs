//! Owner-scoped lesson endpoints: CRUD, visibility toggle, generation,
//! printable export.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::auth::jwt::Claims;
use crate::auth::{AuthUser, MaybeAuthUser};
use crate::db::lessons::{self, Lesson};
use crate::error::{ApiError, ApiResult};
use crate::export;
use crate::models::{
    GenerateRequest, GenerateResponse, LessonCreateRequest, LessonResponse, LessonUpdateRequest,
    VisibilityResponse,
};
use crate::validators;
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Case-insensitive substring filter on topic or subject.
    pub search: Option<String>,
}

fn ensure_owner(lesson: &Lesson, claims: &Claims) -> ApiResult<()> {
    let caller = claims.user_id().map_err(|_| ApiError::Unauthorized)?;
    if lesson.user_id != caller {
        return Err(ApiError::Forbidden(
            "You do not have permission to access this lesson".to_string(),
        ));
    }
    Ok(())
}

async fn load_owned(state: &AppState, id: Uuid, claims: &Claims) -> ApiResult<Lesson> {
    let lesson = lessons::load_lesson(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;
    ensure_owner(&lesson, claims)?;
    Ok(lesson)
}

/// GET /api/lessons
#[utoipa::path(
    get,
    path = "/api/lessons",
    params(SearchParams),
    responses((status = 200, description = "Caller's lessons, newest first", body = [LessonResponse])),
    security(("bearer" = [])),
    tag = "lessons"
)]
pub async fn list_lessons(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<LessonResponse>>> {
    let user_id = claims.user_id().map_err(|_| ApiError::Unauthorized)?;
    let records = lessons::list_for_user(&state.db, user_id, params.search.as_deref()).await?;
    Ok(Json(records.iter().map(LessonResponse::from).collect()))
}

/// POST /api/lessons
#[utoipa::path(
    post,
    path = "/api/lessons",
    request_body = LessonCreateRequest,
    responses(
        (status = 201, description = "Lesson created", body = LessonResponse),
        (status = 400, description = "Validation failure"),
    ),
    security(("bearer" = [])),
    tag = "lessons"
)]
pub async fn create_lesson(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<LessonCreateRequest>,
) -> ApiResult<(StatusCode, Json<LessonResponse>)> {
    validators::validate_lesson_create(&req)?;
    let user_id = claims.user_id().map_err(|_| ApiError::Unauthorized)?;

    let now = Utc::now();
    let slug = lessons::generate_unique_slug(&state.db, &req.topic).await?;
    let lesson = Lesson {
        id: Uuid::new_v4(),
        user_id,
        topic: req.topic,
        subject: req.subject,
        grade_level: req.grade_level,
        duration_minutes: req.duration_minutes,
        description: req.description,
        content: req.content,
        activities: req.activities,
        questions: req.questions,
        summary: req.summary,
        image_urls: req.image_urls,
        video_links: req.video_links,
        is_public: req.is_public,
        slug,
        created_at: now,
        updated_at: now,
    };
    lessons::insert_lesson(&state.db, &lesson).await?;

    info!(lesson_id = %lesson.id, slug = %lesson.slug, "Lesson created");
    Ok((StatusCode::CREATED, Json(LessonResponse::from(&lesson))))
}

/// GET /api/lessons/:id
#[utoipa::path(
    get,
    path = "/api/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson id")),
    responses(
        (status = 200, body = LessonResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such lesson"),
    ),
    security(("bearer" = [])),
    tag = "lessons"
)]
pub async fn get_lesson(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LessonResponse>> {
    let lesson = load_owned(&state, id, &claims).await?;
    Ok(Json(LessonResponse::from(&lesson)))
}

/// PUT /api/lessons/:id - full update of writable fields.
#[utoipa::path(
    put,
    path = "/api/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson id")),
    request_body = LessonCreateRequest,
    responses(
        (status = 200, body = LessonResponse),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such lesson"),
    ),
    security(("bearer" = [])),
    tag = "lessons"
)]
pub async fn replace_lesson(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<LessonCreateRequest>,
) -> ApiResult<Json<LessonResponse>> {
    validators::validate_lesson_create(&req)?;
    let mut lesson = load_owned(&state, id, &claims).await?;

    lesson.topic = req.topic;
    lesson.subject = req.subject;
    lesson.grade_level = req.grade_level;
    lesson.duration_minutes = req.duration_minutes;
    lesson.description = req.description;
    lesson.content = req.content;
    lesson.activities = req.activities;
    lesson.questions = req.questions;
    lesson.summary = req.summary;
    lesson.image_urls = req.image_urls;
    lesson.video_links = req.video_links;
    lesson.is_public = req.is_public;

    lessons::update_lesson(&state.db, &lesson).await?;
    let updated = lessons::load_lesson(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;
    Ok(Json(LessonResponse::from(&updated)))
}

/// PATCH /api/lessons/:id - partial update; absent fields untouched.
#[utoipa::path(
    patch,
    path = "/api/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson id")),
    request_body = LessonUpdateRequest,
    responses(
        (status = 200, body = LessonResponse),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such lesson"),
    ),
    security(("bearer" = [])),
    tag = "lessons"
)]
pub async fn update_lesson(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<LessonUpdateRequest>,
) -> ApiResult<Json<LessonResponse>> {
    let mut lesson = load_owned(&state, id, &claims).await?;

    if let Some(topic) = req.topic {
        lesson.topic = topic;
    }
    if let Some(subject) = req.subject {
        lesson.subject = subject;
    }
    if let Some(grade_level) = req.grade_level {
        lesson.grade_level = grade_level;
    }
    if let Some(duration_minutes) = req.duration_minutes {
        lesson.duration_minutes = duration_minutes;
    }
    if let Some(description) = req.description {
        lesson.description = Some(description);
    }
    if let Some(content) = req.content {
        lesson.content = Some(content);
    }
    if let Some(activities) = req.activities {
        lesson.activities = activities;
    }
    if let Some(questions) = req.questions {
        lesson.questions = questions;
    }
    if let Some(summary) = req.summary {
        lesson.summary = Some(summary);
    }
    if let Some(image_urls) = req.image_urls {
        lesson.image_urls = image_urls;
    }
    if let Some(video_links) = req.video_links {
        lesson.video_links = video_links;
    }
    if let Some(is_public) = req.is_public {
        lesson.is_public = is_public;
    }

    // Re-validate the merged record before writing.
    validators::validate_lesson_fields(
        &lesson.topic,
        &lesson.subject,
        &lesson.grade_level,
        lesson.duration_minutes,
    )?;

    lessons::update_lesson(&state.db, &lesson).await?;
    let updated = lessons::load_lesson(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;
    Ok(Json(LessonResponse::from(&updated)))
}

/// DELETE /api/lessons/:id
#[utoipa::path(
    delete,
    path = "/api/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such lesson"),
    ),
    security(("bearer" = [])),
    tag = "lessons"
)]
pub async fn delete_lesson(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let lesson = load_owned(&state, id, &claims).await?;
    lessons::delete_lesson(&state.db, lesson.id).await?;
    info!(lesson_id = %lesson.id, "Lesson deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/lessons/:id/visibility - flip the public flag.
#[utoipa::path(
    patch,
    path = "/api/lessons/{id}/visibility",
    params(("id" = Uuid, Path, description = "Lesson id")),
    responses(
        (status = 200, body = VisibilityResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such lesson"),
    ),
    security(("bearer" = [])),
    tag = "lessons"
)]
pub async fn toggle_visibility(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<VisibilityResponse>> {
    let mut lesson = load_owned(&state, id, &claims).await?;
    lesson.is_public = !lesson.is_public;
    lessons::update_lesson(&state.db, &lesson).await?;

    let updated = lessons::load_lesson(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;
    let visibility = if updated.is_public { "public" } else { "private" };
    Ok(Json(VisibilityResponse {
        message: format!("Lesson visibility set to {}", visibility),
        lesson: LessonResponse::from(&updated),
    }))
}

/// POST /api/lessons/generate
///
/// Orchestrates OpenAI, Unsplash, and YouTube. Nothing is persisted; the
/// client follows up with a create request.
#[utoipa::path(
    post,
    path = "/api/lessons/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated content (possibly degraded, see warnings)", body = GenerateResponse),
        (status = 400, description = "Validation failure"),
    ),
    security(("bearer" = [])),
    tag = "lessons"
)]
pub async fn generate_lesson(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    validators::validate_generate(&req)?;

    let generated = state
        .generator
        .generate(&req.topic, &req.subject, &req.grade_level, req.duration_minutes)
        .await;

    Ok(Json(GenerateResponse {
        topic: req.topic,
        subject: req.subject,
        grade_level: req.grade_level,
        duration_minutes: req.duration_minutes,
        description: generated.content.description,
        content: generated.content.content,
        activities: generated.content.activities,
        questions: generated.content.questions,
        summary: generated.content.summary,
        image_urls: generated.image_urls,
        video_links: generated.video_links,
        warnings: if generated.warnings.is_empty() {
            None
        } else {
            Some(generated.warnings)
        },
    }))
}

/// GET /api/lessons/:id/export
///
/// Printable HTML document. Public lessons need no auth; private lessons
/// are owner-only.
#[utoipa::path(
    get,
    path = "/api/lessons/{id}/export",
    params(("id" = Uuid, Path, description = "Lesson id")),
    responses(
        (status = 200, description = "HTML document", body = String, content_type = "text/html"),
        (status = 403, description = "Private lesson, not the owner"),
        (status = 404, description = "No such lesson"),
    ),
    tag = "lessons"
)]
pub async fn export_lesson(
    State(state): State<AppState>,
    MaybeAuthUser(claims): MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let lesson = lessons::load_lesson(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    if !lesson.is_public {
        let is_owner = claims
            .as_ref()
            .and_then(|c| c.user_id().ok())
            .map(|caller| caller == lesson.user_id)
            .unwrap_or(false);
        if !is_owner {
            return Err(ApiError::Forbidden(
                "You do not have permission to download this lesson".to_string(),
            ));
        }
    }

    let html = export::render_lesson_html(&lesson);
    let disposition = format!("attachment; filename=\"{}\"", export::export_filename(&lesson));

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        html,
    )
        .into_response())
}

/// Build lesson routes
pub fn lesson_routes() -> Router<AppState> {
    Router::new()
        .route("/api/lessons", get(list_lessons).post(create_lesson))
        .route("/api/lessons/generate", post(generate_lesson))
        .route(
            "/api/lessons/:id",
            get(get_lesson)
                .put(replace_lesson)
                .patch(update_lesson)
                .delete(delete_lesson),
        )
        .route("/api/lessons/:id/visibility", patch(toggle_visibility))
        .route("/api/lessons/:id/export", get(export_lesson))
}
