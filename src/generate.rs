use std::future::Future;
use std::time::Duration;

use log::debug;
use serde::Deserialize;

use crate::error::GenerationError;

pub const DEFAULT_MODEL: &str = "gemini-pro";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// A hosted generative-language model
pub trait GenerativeModel {
    /// Generate text for a single prompt
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, GenerationError>>;
}

/// Gemini `generateContent` REST client
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            timeout,
        }
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/{}:generateContent", self.model)
    }
}

impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!("Generating via Gemini model {} ({} prompt chars)", self.model, prompt.len());

        let body = serde_json::json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ]
        });

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &body));
        }

        let json: serde_json::Value = resp.json().await.map_err(transport_failure)?;
        extract_gemini_text(&json)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Sort a failed response into retryable and fatal kinds
pub fn classify_failure(http_status: u16, body: &str) -> GenerationError {
    let (status, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.status, envelope.error.message),
        Err(_) => (String::new(), body.trim().to_string()),
    };

    match (status.as_str(), http_status) {
        ("DEADLINE_EXCEEDED", _) | ("", 504) => GenerationError::DeadlineExceeded(message),
        ("INTERNAL", _) | ("", 500) => GenerationError::Internal(message),
        ("", code) => GenerationError::fatal(format!("HTTP {code}"), message),
        (status, _) => GenerationError::fatal(status, message),
    }
}

fn transport_failure(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        GenerationError::DeadlineExceeded(e.to_string())
    } else {
        GenerationError::fatal("TRANSPORT", e.to_string())
    }
}

fn extract_gemini_text(json: &serde_json::Value) -> Result<String, GenerationError> {
    let candidate = json.get("candidates").and_then(|c| c.get(0));

    if let Some(parts) = candidate
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
    {
        let text = parts
            .iter()
            .filter_map(|p| p.get("text")?.as_str())
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }

    let reason = candidate
        .and_then(|c| c.get("finishReason"))
        .or_else(|| json.get("promptFeedback").and_then(|f| f.get("blockReason")))
        .and_then(|r| r.as_str())
        .unwrap_or("unexpected response format");

    Err(GenerationError::fatal("EMPTY_RESPONSE", reason))
}
