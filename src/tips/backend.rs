//! AI backend abstraction for tip generation.
//!
//! - Local: Ollama (default)
//! - Remote: Anthropic (feature-flagged)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::TipError;

/// A text-completion backend: system prompt and user prompt in, one text
/// blob out.
#[async_trait]
pub trait TipBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Run one completion.
    async fn complete(&self, system: &str, user: &str) -> Result<String, TipError>;

    /// Check if the backend is available.
    async fn health_check(&self) -> Result<bool, TipError>;
}

/// Ollama backend implementation.
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    pub fn new(base_url: String, model: String, timeout_seconds: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            model,
        }
    }
}

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

#[async_trait]
impl TipBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, TipError> {
        let url = format!("{}/api/chat", self.base_url);

        let request = OllamaRequest {
            model: self.model.clone(),
            messages: vec![
                OllamaMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                OllamaMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            stream: false,
        };

        debug!("Sending request to Ollama: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TipError::BackendUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TipError::BackendUnavailable(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let parsed: OllamaResponse = response
            .json()
            .await
            .map_err(|e| TipError::ResponseParse(e.to_string()))?;

        Ok(parsed.message.content)
    }

    async fn health_check(&self) -> Result<bool, TipError> {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                warn!("Ollama health check failed: {}", e);
                Ok(false)
            }
        }
    }
}

// --- Anthropic backend ---

#[cfg(feature = "remote-ai")]
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
    system: String,
}

#[cfg(feature = "remote-ai")]
#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[cfg(feature = "remote-ai")]
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[cfg(feature = "remote-ai")]
#[derive(Debug, Deserialize)]
struct AnthropicContent {
    text: String,
}

/// Anthropic API backend implementation.
#[cfg(feature = "remote-ai")]
pub struct AnthropicBackend {
    client: reqwest::Client,
    model: String,
    api_key: String,
}

#[cfg(feature = "remote-ai")]
impl AnthropicBackend {
    pub fn new(api_key: String, model: String, timeout_seconds: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            model,
            api_key,
        }
    }
}

#[cfg(feature = "remote-ai")]
#[async_trait]
impl TipBackend for AnthropicBackend {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, TipError> {
        let url = "https://api.anthropic.com/v1/messages";

        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: 1024,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: user.to_string(),
            }],
            system: system.to_string(),
        };

        debug!("Sending request to Anthropic API");

        // Retry loop for rate limiting (429) with exponential backoff
        let max_retries = 3;

        for attempt in 0..=max_retries {
            let response = self
                .client
                .post(url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", "2023-06-01")
                .header("content-type", "application/json")
                .json(&request)
                .send()
                .await
                .map_err(|e| TipError::BackendUnavailable(e.to_string()))?;

            if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if attempt == max_retries {
                    let body = response.text().await.unwrap_or_default();
                    return Err(TipError::BackendUnavailable(format!(
                        "Anthropic API rate limit after {} retries: {}",
                        max_retries, body
                    )));
                }

                // Parse retry-after header, default to exponential backoff
                let wait_secs = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(5 * (1 << attempt));

                warn!(
                    "Rate limited (attempt {}/{}), waiting {}s before retry",
                    attempt + 1,
                    max_retries,
                    wait_secs
                );
                tokio::time::sleep(std::time::Duration::from_secs(wait_secs)).await;
                continue;
            }

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(TipError::BackendUnavailable(format!(
                    "Anthropic API returned {}: {}",
                    status, body
                )));
            }

            let parsed: AnthropicResponse = response
                .json()
                .await
                .map_err(|e| TipError::ResponseParse(e.to_string()))?;

            let text = parsed
                .content
                .into_iter()
                .map(|c| c.text)
                .collect::<Vec<_>>()
                .join("");
            return Ok(text);
        }

        Err(TipError::BackendUnavailable(
            "No response after retries".to_string(),
        ))
    }

    async fn health_check(&self) -> Result<bool, TipError> {
        // Anthropic has no health endpoint; assume available if key is set
        Ok(!self.api_key.is_empty())
    }
}

/// Mock backend for testing.
#[cfg(test)]
pub struct MockBackend {
    response: Option<String>,
}

#[cfg(test)]
impl MockBackend {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
        }
    }

    /// A backend whose every completion fails.
    pub fn failing() -> Self {
        Self { response: None }
    }
}

#[cfg(test)]
#[async_trait]
impl TipBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, _system: &str, _user: &str) -> Result<String, TipError> {
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(TipError::BackendUnavailable("mock outage".to_string())),
        }
    }

    async fn health_check(&self) -> Result<bool, TipError> {
        Ok(self.response.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend() {
        let backend = MockBackend::new("1. Go outside in the morning.");

        let text = backend.complete("system", "user").await.unwrap();
        assert_eq!(text, "1. Go outside in the morning.");
        assert!(backend.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_backend_failure() {
        let backend = MockBackend::failing();

        assert!(backend.complete("system", "user").await.is_err());
        assert!(!backend.health_check().await.unwrap());
    }

    #[test]
    fn test_ollama_request_serialization() {
        let request = OllamaRequest {
            model: "llama3.2".to_string(),
            messages: vec![OllamaMessage {
                role: "user".to_string(),
                content: "Hello".to_string(),
            }],
            stream: false,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("llama3.2"));
        assert!(json.contains("\"stream\":false"));
    }

    #[test]
    fn test_ollama_response_deserialization() {
        let json = r#"{"message": {"content": "1. Avoid caffeine."}, "model": "llama3.2"}"#;

        let response: OllamaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.message.content, "1. Avoid caffeine.");
    }

    #[cfg(feature = "remote-ai")]
    #[test]
    fn test_anthropic_response_deserialization() {
        let json = r#"{
            "content": [{"type": "text", "text": "1. Keep the room cool."}],
            "model": "claude-sonnet-4-20250514"
        }"#;

        let response: AnthropicResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content.len(), 1);
        assert_eq!(response.content[0].text, "1. Keep the room cool.");
    }
}
