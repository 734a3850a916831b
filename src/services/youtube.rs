//! YouTube Data API v3 search client.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::ServiceError;
use crate::models::VideoLink;

const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// YouTube caps maxResults at 50.
const MAX_RESULTS: usize = 50;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<VideoId>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct VideoId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: Option<String>,
}

/// YouTube search client for educational videos.
pub struct YouTubeClient {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key,
            base_url: YOUTUBE_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Fetch up to `limit` embeddable videos for a topic/subject pair.
    /// The search query appends "lesson" to bias toward educational content.
    pub async fn fetch_videos(
        &self,
        topic: &str,
        subject: &str,
        limit: usize,
    ) -> Result<Vec<VideoLink>, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::NotConfigured("YouTube"))?;

        let topic = topic.trim();
        if topic.is_empty() {
            debug!("Empty topic given to YouTube search; skipping request");
            return Ok(Vec::new());
        }

        let mut query_parts = vec![topic];
        let subject = subject.trim();
        if !subject.is_empty() {
            query_parts.push(subject);
        }
        query_parts.push("lesson");
        let search_query = query_parts.join(" ");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("part", "snippet"),
                ("q", &search_query),
                ("type", "video"),
                ("maxResults", &limit.min(MAX_RESULTS).to_string()),
                ("key", api_key),
                ("videoEmbeddable", "true"),
                ("order", "relevance"),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::Network(format!("YouTube request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api(format!(
                "YouTube API returned error {}: {}",
                status, body
            )));
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(format!("Failed to parse YouTube response: {}", e)))?;

        let videos: Vec<VideoLink> = search
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.and_then(|id| id.video_id)?;
                let title = item.snippet.and_then(|s| s.title).filter(|t| !t.is_empty())?;
                Some(VideoLink {
                    title,
                    url: format!("https://www.youtube.com/watch?v={}", video_id),
                })
            })
            .collect();

        info!(count = videos.len(), topic, subject, "Fetched YouTube videos");
        Ok(videos)
    }
}
