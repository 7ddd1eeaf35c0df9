use super::Summarizer;
use crate::config::SummarizerConfig;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Keeps the key out of the URL, which reqwest echoes into its errors
const API_KEY_HEADER: &str = "x-goog-api-key";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

// ============================================================================
// Client
// ============================================================================

/// Summarizer backed by the Gemini `generateContent` API
pub struct GeminiSummarizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiSummarizer {
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .unwrap_or_default();

        if api_key.is_empty() {
            warn!("No Gemini API key configured; summaries will fail");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Prompt sent to the model for a meeting transcript
pub fn build_prompt(transcript: &str) -> String {
    format!(
        "Summarize this meeting: key points, action items, decisions.\n\nTranscript:\n{}",
        transcript
    )
}

fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait::async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, transcript: &str) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(build_prompt(transcript)),
                }],
            }],
        };

        debug!(model = %self.model, chars = transcript.len(), "Requesting summary");

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to reach Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Gemini API returned {}: {}", status, body_text);
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to parse Gemini response")?;

        extract_text(parsed).context("Gemini response contained no summary text")
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SummarizerConfig {
        SummarizerConfig {
            model: "test-model".to_string(),
            base_url: "http://localhost:9999/v1beta/".to_string(),
            api_key: Some("secret".to_string()),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_endpoint_uses_model_and_trims_base() {
        let summarizer = GeminiSummarizer::new(&config()).unwrap();
        assert_eq!(
            summarizer.endpoint(),
            "http://localhost:9999/v1beta/models/test-model:generateContent"
        );
    }

    #[test]
    fn test_prompt_contains_transcript() {
        let prompt = build_prompt("we agreed to ship friday");
        assert!(prompt.starts_with("Summarize this meeting"));
        assert!(prompt.ends_with("Transcript:\nwe agreed to ship friday"));
    }

    #[test]
    fn test_extract_text_joins_parts_of_first_candidate() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Key points: "}, {"text": "ship it"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();

        assert_eq!(extract_text(response).as_deref(), Some("Key points: ship it"));
    }

    #[test]
    fn test_extract_text_rejects_empty_response() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(extract_text(response).is_none());

        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#)
                .unwrap();
        assert!(extract_text(response).is_none());
    }
}
