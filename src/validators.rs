//! Input validation for auth and lesson payloads.

use crate::error::{ApiError, ApiResult};
use crate::models::{GenerateRequest, LessonCreateRequest};

const MAX_TOPIC_LEN: usize = 255;
const MAX_SUBJECT_LEN: usize = 255;
const MAX_GRADE_LEVEL_LEN: usize = 50;
const MIN_PASSWORD_LEN: usize = 8;
const MAX_USERNAME_LEN: usize = 150;

fn require_text(value: &str, name: &str, max_len: usize) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} must not be empty", name)));
    }
    if value.chars().count() > max_len {
        return Err(ApiError::BadRequest(format!(
            "{} must be at most {} characters",
            name, max_len
        )));
    }
    Ok(())
}

pub fn validate_duration(duration_minutes: i64) -> ApiResult<()> {
    if duration_minutes < 1 {
        return Err(ApiError::BadRequest(
            "Duration must be a positive number".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_lesson_fields(
    topic: &str,
    subject: &str,
    grade_level: &str,
    duration_minutes: i64,
) -> ApiResult<()> {
    require_text(topic, "topic", MAX_TOPIC_LEN)?;
    require_text(subject, "subject", MAX_SUBJECT_LEN)?;
    require_text(grade_level, "grade_level", MAX_GRADE_LEVEL_LEN)?;
    validate_duration(duration_minutes)
}

pub fn validate_lesson_create(req: &LessonCreateRequest) -> ApiResult<()> {
    validate_lesson_fields(&req.topic, &req.subject, &req.grade_level, req.duration_minutes)
}

pub fn validate_generate(req: &GenerateRequest) -> ApiResult<()> {
    validate_lesson_fields(&req.topic, &req.subject, &req.grade_level, req.duration_minutes)
}

pub fn validate_username(username: &str) -> ApiResult<()> {
    require_text(username, "username", MAX_USERNAME_LEN)?;
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '@' | '+'))
    {
        return Err(ApiError::BadRequest(
            "username may only contain letters, digits and @ . + - _".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> ApiResult<()> {
    require_text(email, "email", 254)?;
    let parts: Vec<&str> = email.splitn(2, '@').collect();
    let valid = parts.len() == 2
        && !parts[0].is_empty()
        && parts[1].contains('.')
        && !parts[1].starts_with('.')
        && !parts[1].ends_with('.');
    if !valid {
        return Err(ApiError::BadRequest("Enter a valid email address".to_string()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> ApiResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> LessonCreateRequest {
        LessonCreateRequest {
            topic: "Photosynthesis".to_string(),
            subject: "Biology".to_string(),
            grade_level: "Grade 8".to_string(),
            duration_minutes: 45,
            description: None,
            content: None,
            activities: vec![],
            questions: vec![],
            summary: None,
            image_urls: vec![],
            video_links: vec![],
            is_public: false,
        }
    }

    #[test]
    fn valid_lesson_create_passes() {
        assert!(validate_lesson_create(&create_request()).is_ok());
    }

    #[test]
    fn empty_topic_rejected() {
        let mut req = create_request();
        req.topic = "   ".to_string();
        assert!(validate_lesson_create(&req).is_err());
    }

    #[test]
    fn overlong_grade_level_rejected() {
        let mut req = create_request();
        req.grade_level = "g".repeat(51);
        assert!(validate_lesson_create(&req).is_err());
    }

    #[test]
    fn non_positive_duration_rejected() {
        assert!(validate_duration(0).is_err());
        assert!(validate_duration(-5).is_err());
        assert!(validate_duration(1).is_ok());
    }

    #[test]
    fn username_charset_enforced() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("a.b@c+d-e").is_ok());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn email_shape_enforced() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@nodot").is_err());
    }

    #[test]
    fn short_password_rejected() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
    }
}
