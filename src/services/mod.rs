//! Third-party service clients and the lesson generation orchestrator.

pub mod generator;
pub mod openai;
pub mod unsplash;
pub mod youtube;

pub use generator::{GeneratedLesson, LessonGenerator};
pub use openai::{GeneratedContent, OpenAiClient};
pub use unsplash::UnsplashClient;
pub use youtube::YouTubeClient;

use thiserror::Error;

/// Error from an outbound service call. Generation never fails on these;
/// the orchestrator degrades per service and records a warning.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// API key missing - the service is configured off.
    #[error("{0} API key not configured")]
    NotConfigured(&'static str),

    /// Request could not be sent or timed out.
    #[error("Network error: {0}")]
    Network(String),

    /// Service answered with a non-success status.
    #[error("API error: {0}")]
    Api(String),

    /// Response body could not be interpreted.
    #[error("Parse error: {0}")]
    Parse(String),
}
