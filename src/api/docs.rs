//! Generated OpenAPI documentation.

use axum::{routing::get, Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{
    AuthResponse, GenerateRequest, GenerateResponse, LessonCreateRequest, LessonResponse,
    LessonUpdateRequest, LoginRequest, PublicLessonResponse, RefreshRequest, RegisterRequest,
    UserResponse, VideoLink, VisibilityResponse,
};
use crate::AppState;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EduNova API",
        description = "API documentation for the EduNova educational platform",
    ),
    paths(
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::refresh,
        crate::api::auth::me,
        crate::api::lessons::list_lessons,
        crate::api::lessons::create_lesson,
        crate::api::lessons::get_lesson,
        crate::api::lessons::replace_lesson,
        crate::api::lessons::update_lesson,
        crate::api::lessons::delete_lesson,
        crate::api::lessons::toggle_visibility,
        crate::api::lessons::generate_lesson,
        crate::api::lessons::export_lesson,
        crate::api::public::list_public_lessons,
        crate::api::public::get_public_lesson,
        crate::api::health::health_check,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        RefreshRequest,
        UserResponse,
        AuthResponse,
        LessonCreateRequest,
        LessonUpdateRequest,
        LessonResponse,
        PublicLessonResponse,
        VisibilityResponse,
        GenerateRequest,
        GenerateResponse,
        VideoLink,
        crate::api::health::HealthResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registration and token management"),
        (name = "lessons", description = "Owner-scoped lesson management"),
        (name = "public", description = "Publicly shared lessons"),
        (name = "meta", description = "Service metadata"),
    )
)]
pub struct ApiDoc;

/// GET /api/docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build docs routes
pub fn docs_routes() -> Router<AppState> {
    Router::new().route("/api/docs/openapi.json", get(openapi_json))
}
