// ============================================
// Generation Provider Client
// ============================================
//
// Seam to the hosted generative-language API. The provider is opaque to the
// rest of the service: callers see `generate(prompt, params) -> text` and a
// small error taxonomy. The HTTP client is time-bounded and is never
// invoked while a session or profile lock is held.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation disabled: no api key configured")]
    Disabled,

    #[error("provider request failed: {0}")]
    Http(String),

    #[error("provider timed out after {0}s")]
    Timeout(u64),

    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 800,
        }
    }
}

#[async_trait]
pub trait GenerateText: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String>;
}

/// HTTP client for the generative-language provider. Without an API key the
/// client reports itself disabled and the chat layer serves its fallback.
pub struct HttpGenerationClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

impl HttpGenerationClient {
    pub fn new(api_url: &str, api_key: Option<String>, model: &str, timeout_secs: u64) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn extract_text(body: &serde_json::Value) -> Result<String> {
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(|value| value.as_str())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| GenerationError::InvalidResponse("no candidate text".to_string()))
    }
}

#[async_trait]
impl GenerateText for HttpGenerationClient {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(GenerationError::Disabled);
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_url, self.model, api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": params.temperature,
                "maxOutputTokens": params.max_output_tokens,
            }
        });

        let request = self.http.post(&url).json(&body).send();
        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout.as_secs()))?
            .map_err(|err| GenerationError::Http(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Http(format!("status {status}")));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|err| GenerationError::InvalidResponse(err.to_string()))?;

        let text = Self::extract_text(&payload)?;
        debug!(chars = text.len(), "Provider response received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_without_api_key() {
        let client = HttpGenerationClient::new("http://localhost:9", None, "test-model", 1);
        assert!(!client.is_enabled());

        let result = client.generate("hello", &GenerationParams::default()).await;
        assert!(matches!(result, Err(GenerationError::Disabled)));
    }

    #[test]
    fn test_extract_text() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "  Namaste!  " }] } }]
        });
        assert_eq!(
            HttpGenerationClient::extract_text(&body).unwrap(),
            "Namaste!"
        );

        let empty = json!({ "candidates": [] });
        assert!(matches!(
            HttpGenerationClient::extract_text(&empty),
            Err(GenerationError::InvalidResponse(_))
        ));

        let blank = json!({
            "candidates": [{ "content": { "parts": [{ "text": "   " }] } }]
        });
        assert!(HttpGenerationClient::extract_text(&blank).is_err());
    }
}
