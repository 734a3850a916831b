//! Lesson generation orchestration.
//!
//! Three sequential outbound calls: OpenAI (content), Unsplash (images),
//! YouTube (videos). None of them can fail the request. OpenAI failure
//! substitutes locally templated content; image/video failures yield empty
//! lists. Each degradation records a warning for the response.

use tracing::warn;

use super::openai::{GeneratedContent, OpenAiClient};
use super::unsplash::UnsplashClient;
use super::youtube::YouTubeClient;
use super::ServiceError;
use crate::models::VideoLink;

const IMAGE_LIMIT: usize = 6;
const VIDEO_LIMIT: usize = 5;

/// Composed generation result.
#[derive(Debug)]
pub struct GeneratedLesson {
    pub content: GeneratedContent,
    pub image_urls: Vec<String>,
    pub video_links: Vec<VideoLink>,
    pub warnings: Vec<String>,
}

/// Orchestrates the three third-party clients.
pub struct LessonGenerator {
    openai: OpenAiClient,
    unsplash: UnsplashClient,
    youtube: YouTubeClient,
}

impl LessonGenerator {
    pub fn new(openai: OpenAiClient, unsplash: UnsplashClient, youtube: YouTubeClient) -> Self {
        Self {
            openai,
            unsplash,
            youtube,
        }
    }

    pub async fn generate(
        &self,
        topic: &str,
        subject: &str,
        grade_level: &str,
        duration_minutes: i64,
    ) -> GeneratedLesson {
        let mut warnings = Vec::new();

        let content = match self
            .openai
            .generate_lesson_content(topic, subject, grade_level, duration_minutes)
            .await
        {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "OpenAI generation failed; using templated fallback");
                warnings.push(match e {
                    ServiceError::NotConfigured(_) => {
                        format!("OpenAI service not configured: {}", e)
                    }
                    _ => format!("OpenAI service unavailable: {}", e),
                });
                GeneratedContent::fallback(topic, subject, grade_level, duration_minutes)
            }
        };

        let image_urls = match self.unsplash.fetch_images(topic, IMAGE_LIMIT).await {
            Ok(images) => {
                if images.is_empty() {
                    warn!(topic, "No images found for topic");
                }
                images
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch Unsplash images");
                warnings.push(format!("Image fetching failed: {}", e));
                Vec::new()
            }
        };

        let video_links = match self.youtube.fetch_videos(topic, subject, VIDEO_LIMIT).await {
            Ok(videos) => {
                if videos.is_empty() {
                    warn!(topic, subject, "No videos found");
                }
                videos
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch YouTube videos");
                warnings.push(format!("Video fetching failed: {}", e));
                Vec::new()
            }
        };

        GeneratedLesson {
            content,
            image_urls,
            video_links,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured_generator() -> LessonGenerator {
        LessonGenerator::new(
            OpenAiClient::new(None),
            UnsplashClient::new(None),
            YouTubeClient::new(None),
        )
    }

    #[tokio::test]
    async fn unconfigured_services_degrade_with_warnings() {
        let generator = unconfigured_generator();
        let result = generator.generate("Gravity", "Physics", "Grade 6", 45).await;

        // Templated fallback content
        assert!(result.content.description.contains("Gravity"));
        assert_eq!(result.content.activities.len(), 4);
        assert_eq!(result.content.questions.len(), 3);

        // Non-critical services degrade to empty
        assert!(result.image_urls.is_empty());
        assert!(result.video_links.is_empty());

        // One warning per degraded service
        assert_eq!(result.warnings.len(), 3);
        assert!(result.warnings[0].contains("OpenAI service not configured"));
        assert!(result.warnings[1].contains("Image fetching failed"));
        assert!(result.warnings[2].contains("Video fetching failed"));
    }
}
