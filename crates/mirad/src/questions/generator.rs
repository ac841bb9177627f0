//! Remote question generation client.
//!
//! Speaks the hosted-inference wire format: POST a prompt with generation
//! parameters, get back either a list of `{generated_text}` objects or a
//! single one. All failures are recoverable - the engine degrades to the
//! local question bank.

use crate::config::GeneratorConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

/// Generation failures. Never surfaced to API clients; logged and absorbed
/// by the fallback path.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeneratorError {
    #[error("generation API is not configured")]
    NotConfigured,

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {0} from generation API")]
    Status(u16),

    #[error("invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("generator returned empty text")]
    Empty,
}

/// A source of generated interview questions.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Generate one candidate question for the rendered prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}

/// Real client for a remote text-generation endpoint.
pub struct HttpGenerator {
    client: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

impl HttpGenerator {
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl QuestionGenerator for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        let url = self.api_url.as_deref().ok_or(GeneratorError::NotConfigured)?;

        let payload = serde_json::json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": self.max_tokens,
                "temperature": self.temperature,
                "return_full_text": false,
            },
        });

        let mut request = self.client.post(url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GeneratorError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeneratorError::Status(response.status().as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GeneratorError::InvalidJson(e.to_string()))?;

        let text = extract_generated_text(&body);
        if text.is_empty() {
            return Err(GeneratorError::Empty);
        }
        Ok(text)
    }
}

/// Pull the generated text out of the response body: first element of a
/// list of objects, a single object, or the stringified value as a last
/// resort. Always trimmed.
pub fn extract_generated_text(body: &Value) -> String {
    let text = match body {
        Value::Array(items) => items
            .first()
            .and_then(|item| item.get("generated_text"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Value::Object(map) => map
            .get("generated_text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    text.trim().to_string()
}

/// Scripted generator for tests: replays a fixed sequence of results, then
/// keeps repeating the last one (or `Empty` when scripted with nothing).
pub struct FakeGenerator {
    responses: Mutex<Vec<Result<String, GeneratorError>>>,
    calls: Mutex<usize>,
}

impl FakeGenerator {
    pub fn new(responses: Vec<Result<String, GeneratorError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(0),
        }
    }

    /// Always produce the same question.
    pub fn always(text: impl Into<String>) -> Self {
        Self::new(vec![Ok(text.into())])
    }

    /// Always fail with the given error.
    pub fn always_error(error: GeneratorError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Number of generate calls made so far.
    pub fn call_count(&self) -> usize {
        *self.calls.lock().expect("calls mutex poisoned")
    }
}

#[async_trait]
impl QuestionGenerator for FakeGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GeneratorError> {
        *self.calls.lock().expect("calls mutex poisoned") += 1;

        let mut responses = self.responses.lock().expect("responses mutex poisoned");
        if responses.is_empty() {
            return Err(GeneratorError::Empty);
        }
        if responses.len() == 1 {
            responses[0].clone()
        } else {
            responses.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_list_of_objects() {
        let body = serde_json::json!([{"generated_text": "  שאלה ראשונה  "}]);
        assert_eq!(extract_generated_text(&body), "שאלה ראשונה");
    }

    #[test]
    fn test_extract_from_single_object() {
        let body = serde_json::json!({"generated_text": "שאלה"});
        assert_eq!(extract_generated_text(&body), "שאלה");
    }

    #[test]
    fn test_extract_from_bare_string() {
        let body = serde_json::json!("שאלה ישירה");
        assert_eq!(extract_generated_text(&body), "שאלה ישירה");
    }

    #[test]
    fn test_extract_missing_field_is_empty() {
        let body = serde_json::json!([{"something_else": 1}]);
        assert_eq!(extract_generated_text(&body), "");
        let body = serde_json::json!({});
        assert_eq!(extract_generated_text(&body), "");
    }

    #[tokio::test]
    async fn test_fake_generator_replays_then_repeats() {
        let fake = FakeGenerator::new(vec![
            Ok("אחת".to_string()),
            Err(GeneratorError::Status(500)),
            Ok("שתיים".to_string()),
        ]);

        assert_eq!(fake.generate("p").await.unwrap(), "אחת");
        assert!(matches!(
            fake.generate("p").await,
            Err(GeneratorError::Status(500))
        ));
        assert_eq!(fake.generate("p").await.unwrap(), "שתיים");
        // Last response repeats.
        assert_eq!(fake.generate("p").await.unwrap(), "שתיים");
        assert_eq!(fake.call_count(), 4);
    }

    #[tokio::test]
    async fn test_http_generator_requires_configuration() {
        let generator = HttpGenerator::new(&GeneratorConfig::default()).unwrap();
        assert!(matches!(
            generator.generate("prompt").await,
            Err(GeneratorError::NotConfigured)
        ));
    }
}
