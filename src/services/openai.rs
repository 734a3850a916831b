//! OpenAI chat-completions client for lesson content generation.
//!
//! The model is asked for a strict JSON object; the response is stripped of
//! markdown code fences before parsing since models occasionally wrap their
//! output despite instructions.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use super::ServiceError;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_PROMPT: &str = "You are an expert educational content creator. \
Always respond with valid JSON only, no markdown formatting.";

/// Structured lesson content from the model (or the local fallback).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedContent {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

impl GeneratedContent {
    /// Locally templated content used when the OpenAI call fails. The body
    /// scales with the requested duration.
    pub fn fallback(topic: &str, subject: &str, grade_level: &str, duration_minutes: i64) -> Self {
        let description = format!(
            "This lesson on {topic} for {grade_level} covers key concepts in {subject} \
             and is designed for a {duration_minutes}-minute session. \
             Students will explore the fundamental principles of {topic} through \
             interactive activities and discussions."
        );

        let content = if duration_minutes <= 30 {
            format!(
                "{topic} is an important concept in {subject} that {grade_level} students \
                 should understand. This lesson provides an overview of the key ideas and \
                 principles related to {topic}. Students will learn the fundamental aspects \
                 and how they apply in real-world contexts."
            )
        } else if duration_minutes <= 60 {
            format!(
                "{topic} is a significant topic in {subject} that requires careful study. \
                 This lesson explores the main concepts, principles, and applications of \
                 {topic}. Students will gain a solid understanding of how {topic} works and \
                 why it matters in {subject}. We will examine examples and discuss practical \
                 applications that help illustrate the key ideas."
            )
        } else {
            format!(
                "{topic} represents a comprehensive area of study within {subject} that \
                 demands thorough exploration. This extended lesson delves deep into the \
                 concepts, mechanisms, and real-world significance of {topic}. Students will \
                 engage with detailed explanations, multiple examples, and in-depth \
                 discussions. We will cover the foundational principles, examine various \
                 applications, and explore how {topic} connects to broader themes in \
                 {subject}. Through this comprehensive approach, students will develop a \
                 nuanced understanding of {topic} and its importance."
            )
        };

        Self {
            description,
            content,
            activities: vec![
                format!("Warm-up discussion on prior knowledge about {topic}"),
                format!("Interactive demonstration related to {subject}"),
                format!("Group activity exploring {topic} applications"),
                "Wrap-up and reflection".to_string(),
            ],
            questions: vec![
                format!("What are the main ideas behind {topic}?"),
                format!("How does {topic} connect to real-world {subject} examples?"),
                "What questions do you still have after this lesson?".to_string(),
            ],
            summary: format!(
                "Students will understand foundational aspects of {topic} and how it fits \
                 within {subject}."
            ),
        }
    }
}

// ============================================================================
// API request/response types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: &'static str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

// ============================================================================
// Client
// ============================================================================

/// OpenAI chat-completions client.
pub struct OpenAiClient {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key,
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Generate lesson content for a topic/subject/grade/duration.
    pub async fn generate_lesson_content(
        &self,
        topic: &str,
        subject: &str,
        grade_level: &str,
        duration_minutes: i64,
    ) -> Result<GeneratedContent, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::NotConfigured("OpenAI"))?;

        let request = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(topic, subject, grade_level, duration_minutes),
                },
            ],
            temperature: 0.7,
            max_tokens: 2000,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        debug!(topic, subject, grade_level, "Requesting lesson content from OpenAI");

        let response = self
            .http_client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::Network(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, "OpenAI API returned error");
            return Err(ServiceError::Api(format!(
                "OpenAI API returned error {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(format!("Failed to parse OpenAI response: {}", e)))?;

        let content = chat
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| ServiceError::Parse("OpenAI response contained no content".to_string()))?;

        parse_content(content)
    }
}

/// Build the lesson construction prompt.
fn build_prompt(topic: &str, subject: &str, grade_level: &str, duration_minutes: i64) -> String {
    format!(
        r#"You are an expert educational content creator. Generate comprehensive lesson content for the following:

Topic: {topic}
Subject: {subject}
Grade Level: {grade_level}
Duration: {duration_minutes} minutes

Please provide:
1. Description: Write 2-3 paragraphs explaining the lesson topic in an engaging, age-appropriate way for {grade_level} students studying {subject}.

2. Activities: Provide 3-6 classroom activities (as a numbered list) that students can do to learn about {topic}. Each activity should be practical and suitable for a {duration_minutes}-minute lesson.

3. Questions: Provide 4-8 practice questions (as a numbered list) that test understanding of {topic}. Include a mix of comprehension and application questions.

4. Summary: Write a 2-3 sentence conclusion that summarizes the key takeaways from this lesson.

5. Content: Write the main lesson body that a teacher can present during the session.

Format your response as a JSON object with the following structure:
{{
    "description": "2-3 paragraphs of text",
    "content": "main lesson body",
    "activities": ["Activity 1", "Activity 2", ...],
    "questions": ["Question 1", "Question 2", ...],
    "summary": "2-3 sentence summary"
}}

Return ONLY the JSON object, no additional text or markdown formatting."#
    )
}

/// Strip surrounding markdown code fences, if any.
fn strip_code_fences(content: &str) -> &str {
    let mut text = content.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parse model output into structured content. Missing fields default to
/// empty rather than failing.
fn parse_content(raw: &str) -> Result<GeneratedContent, ServiceError> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(cleaned).map_err(|e| {
        error!(error = %e, "Failed to parse OpenAI content as JSON");
        ServiceError::Parse(format!("Invalid JSON response from OpenAI: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_mentions_all_inputs() {
        let prompt = build_prompt("Photosynthesis", "Biology", "Grade 8", 45);
        assert!(prompt.contains("Topic: Photosynthesis"));
        assert!(prompt.contains("Subject: Biology"));
        assert!(prompt.contains("Grade Level: Grade 8"));
        assert!(prompt.contains("Duration: 45 minutes"));
    }

    #[test]
    fn strips_json_code_fence() {
        let raw = "```json\n{\"description\": \"d\"}\n```";
        assert_eq!(strip_code_fences(raw), "{\"description\": \"d\"}");
    }

    #[test]
    fn strips_bare_code_fence() {
        let raw = "```\n{}\n```";
        assert_eq!(strip_code_fences(raw), "{}");
    }

    #[test]
    fn unfenced_content_unchanged() {
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn parse_content_fills_missing_fields() {
        let parsed = parse_content(r#"{"description": "intro"}"#).unwrap();
        assert_eq!(parsed.description, "intro");
        assert!(parsed.content.is_empty());
        assert!(parsed.activities.is_empty());
        assert!(parsed.questions.is_empty());
        assert!(parsed.summary.is_empty());
    }

    #[test]
    fn parse_content_full_object() {
        let parsed = parse_content(
            r#"{
                "description": "d",
                "content": "c",
                "activities": ["a1", "a2"],
                "questions": ["q1"],
                "summary": "s"
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.activities.len(), 2);
        assert_eq!(parsed.questions, vec!["q1".to_string()]);
        assert_eq!(parsed.summary, "s");
    }

    #[test]
    fn parse_content_rejects_non_json() {
        assert!(parse_content("I'm sorry, I can't do that").is_err());
    }

    #[test]
    fn fallback_scales_with_duration() {
        let short = GeneratedContent::fallback("Gravity", "Physics", "Grade 6", 20);
        let medium = GeneratedContent::fallback("Gravity", "Physics", "Grade 6", 45);
        let long = GeneratedContent::fallback("Gravity", "Physics", "Grade 6", 90);
        assert!(short.content.len() < medium.content.len());
        assert!(medium.content.len() < long.content.len());
        assert_eq!(short.activities.len(), 4);
        assert_eq!(short.questions.len(), 3);
        assert!(short.description.contains("Gravity"));
        assert!(short.summary.contains("Physics"));
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let client = OpenAiClient::new(None);
        let result = client
            .generate_lesson_content("Gravity", "Physics", "Grade 6", 30)
            .await;
        assert!(matches!(result, Err(ServiceError::NotConfigured(_))));
    }
}
