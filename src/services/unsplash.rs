//! Unsplash image search client.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::ServiceError;

const UNSPLASH_API_URL: &str = "https://api.unsplash.com/search/photos";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Unsplash caps per_page at 30.
const MAX_PER_PAGE: usize = 30;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    #[serde(default)]
    urls: PhotoUrls,
}

#[derive(Debug, Default, Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
    small: Option<String>,
    thumb: Option<String>,
}

/// Unsplash search client. Authenticates with the Access Key (also called
/// the Application ID) as a `Client-ID` authorization header.
pub struct UnsplashClient {
    http_client: Client,
    access_key: Option<String>,
    base_url: String,
}

impl UnsplashClient {
    pub fn new(access_key: Option<String>) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap_or_default(),
            access_key,
            base_url: UNSPLASH_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Fetch up to `limit` landscape image URLs for a topic. Prefers the
    /// regular size, falling back to small then thumb.
    pub async fn fetch_images(&self, topic: &str, limit: usize) -> Result<Vec<String>, ServiceError> {
        let access_key = self
            .access_key
            .as_deref()
            .ok_or(ServiceError::NotConfigured("Unsplash"))?;

        let topic = topic.trim();
        if topic.is_empty() {
            debug!("Empty topic given to Unsplash search; skipping request");
            return Ok(Vec::new());
        }

        let response = self
            .http_client
            .get(&self.base_url)
            .header("Authorization", format!("Client-ID {}", access_key))
            .query(&[
                ("query", topic),
                ("per_page", &limit.min(MAX_PER_PAGE).to_string()),
                ("orientation", "landscape"),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::Network(format!("Unsplash request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api(format!(
                "Unsplash API returned error {}: {}",
                status, body
            )));
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(format!("Failed to parse Unsplash response: {}", e)))?;

        let images: Vec<String> = search
            .results
            .into_iter()
            .take(limit)
            .filter_map(|photo| photo.urls.regular.or(photo.urls.small).or(photo.urls.thumb))
            .collect();

        info!(count = images.len(), topic, "Fetched Unsplash images");
        Ok(images)
    }
}
