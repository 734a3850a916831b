//! Public lesson endpoints. No authentication; only lessons whose owners
//! made them public are visible, addressed by slug.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use super::lessons::SearchParams;
use crate::db::lessons;
use crate::error::{ApiError, ApiResult};
use crate::models::PublicLessonResponse;
use crate::AppState;

/// GET /api/lessons/public
#[utoipa::path(
    get,
    path = "/api/lessons/public",
    params(SearchParams),
    responses((status = 200, description = "Public lessons, newest first", body = [PublicLessonResponse])),
    tag = "public"
)]
pub async fn list_public_lessons(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<PublicLessonResponse>>> {
    let records = lessons::list_public(&state.db, params.search.as_deref()).await?;
    Ok(Json(records.iter().map(PublicLessonResponse::from).collect()))
}

/// GET /api/lessons/public/:slug
///
/// A private lesson's slug is indistinguishable from a nonexistent one.
#[utoipa::path(
    get,
    path = "/api/lessons/public/{slug}",
    params(("slug" = String, Path, description = "Lesson slug")),
    responses(
        (status = 200, body = PublicLessonResponse),
        (status = 404, description = "Lesson not found or not public"),
    ),
    tag = "public"
)]
pub async fn get_public_lesson(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<PublicLessonResponse>> {
    let record = lessons::load_public_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lesson not found or not public".to_string()))?;
    Ok(Json(PublicLessonResponse::from(&record)))
}

/// Build public routes
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/lessons/public", get(list_public_lessons))
        .route("/api/lessons/public/:slug", get(get_public_lesson))
}
