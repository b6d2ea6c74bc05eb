//! Answer synthesis abstraction
//!
//! The workflow treats text generation as an oracle: system instructions and
//! the raw user query go in, answer text comes out. Failures here are the
//! only ones the engine lets escape to its caller.

use crate::config::SynthesisSettings;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Trait for answer generation backends
#[async_trait]
pub trait AnswerSynthesizer: Send + Sync {
    /// Generate an answer for `user_query` under `system_instructions`.
    async fn generate(&self, system_instructions: &str, user_query: &str) -> Result<String>;
}

/// Chat completion request in the OpenAI-compatible format
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Groq (OpenAI-compatible) chat completion client with retry logic
pub struct GroqSynthesizer {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl GroqSynthesizer {
    pub fn new(settings: &SynthesisSettings, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_retries: settings.max_retries,
            retry_delay_ms: settings.retry_delay_ms,
        })
    }

    /// Make a single API request
    async fn make_request(&self, system_instructions: &str, user_query: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_instructions,
                },
                ChatMessage {
                    role: "user",
                    content: user_query,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: ChatResponse = response.json().await?;
                extract_content(body)
            }
            StatusCode::UNAUTHORIZED => {
                Err(Error::Config("Invalid synthesis API key".to_string()))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(Error::HttpStatus(format!("{}: {}", status, error_text)))
            }
        }
    }

    /// Check if an error is retryable
    fn is_retryable_error(error: &Error) -> bool {
        match error {
            Error::Request(e) => e.is_timeout() || e.is_connect(),
            Error::HttpStatus(msg) => msg.starts_with("429") || msg.starts_with('5'),
            _ => false,
        }
    }

    /// Calculate exponential backoff delay
    fn calculate_backoff(&self, retry_count: u32) -> u64 {
        self.retry_delay_ms * 2u64.pow(retry_count.saturating_sub(1))
    }
}

#[async_trait]
impl AnswerSynthesizer for GroqSynthesizer {
    async fn generate(&self, system_instructions: &str, user_query: &str) -> Result<String> {
        let mut retry_count = 0;
        loop {
            match self.make_request(system_instructions, user_query).await {
                Ok(answer) => {
                    debug!("Synthesis returned {} characters", answer.len());
                    return Ok(answer);
                }
                Err(e) => {
                    if retry_count >= self.max_retries || !Self::is_retryable_error(&e) {
                        return Err(Error::Synthesis(e.to_string()));
                    }

                    retry_count += 1;
                    let delay = self.calculate_backoff(retry_count);
                    warn!(
                        "Synthesis attempt {} failed ({}), retrying in {}ms",
                        retry_count, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }
}

// Internal API response structures
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

fn extract_content(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| Error::Synthesis("Response contained no message content".to_string()))
}

pub type CalledPrompts = Arc<Mutex<Vec<(String, String)>>>;

/// Mock synthesizer for testing
///
/// Queued responses are returned in order; once the queue is empty the
/// fallback answer is used, or an error if none was set.
#[derive(Clone, Default)]
pub struct MockSynthesizer {
    responses: Arc<Mutex<VecDeque<Result<String>>>>,
    fallback: Option<String>,
    /// `(system_instructions, user_query)` for every call, in order
    pub calls: CalledPrompts,
}

impl MockSynthesizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that answers every call with the same text
    #[must_use]
    pub fn always(answer: impl Into<String>) -> Self {
        Self {
            fallback: Some(answer.into()),
            ..Self::default()
        }
    }

    pub async fn add_response(&self, answer: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(answer.into()));
    }

    pub async fn add_error(&self, message: impl Into<String>) {
        self.responses
            .lock()
            .await
            .push_back(Err(Error::Synthesis(message.into())));
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    pub async fn called_prompts(&self) -> Vec<(String, String)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl AnswerSynthesizer for MockSynthesizer {
    async fn generate(&self, system_instructions: &str, user_query: &str) -> Result<String> {
        self.calls
            .lock()
            .await
            .push((system_instructions.to_string(), user_query.to_string()));

        if let Some(response) = self.responses.lock().await.pop_front() {
            return response;
        }

        self.fallback
            .clone()
            .ok_or_else(|| Error::Synthesis("No mock response configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content_takes_first_choice() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Hello there"}},
                           {"message":{"role":"assistant","content":"ignored"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(body).unwrap(), "Hello there");
    }

    #[test]
    fn test_extract_content_without_choices_fails() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(extract_content(body), Err(Error::Synthesis(_))));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(GroqSynthesizer::is_retryable_error(&Error::HttpStatus(
            "429 Too Many Requests: slow down".to_string()
        )));
        assert!(GroqSynthesizer::is_retryable_error(&Error::HttpStatus(
            "503 Service Unavailable: ".to_string()
        )));
        assert!(!GroqSynthesizer::is_retryable_error(&Error::HttpStatus(
            "400 Bad Request: bad".to_string()
        )));
        assert!(!GroqSynthesizer::is_retryable_error(&Error::Config(
            "Invalid synthesis API key".to_string()
        )));
    }

    #[test]
    fn test_backoff_doubles() {
        let synthesizer =
            GroqSynthesizer::new(&SynthesisSettings::default(), "key".to_string()).unwrap();
        assert_eq!(synthesizer.calculate_backoff(1), 500);
        assert_eq!(synthesizer.calculate_backoff(2), 1000);
        assert_eq!(synthesizer.calculate_backoff(3), 2000);
    }

    #[tokio::test]
    async fn test_mock_returns_queue_then_fallback() {
        let mock = MockSynthesizer::always("fallback answer");
        mock.add_response("first").await;

        assert_eq!(mock.generate("sys", "q1").await.unwrap(), "first");
        assert_eq!(mock.generate("sys", "q2").await.unwrap(), "fallback answer");

        let calls = mock.called_prompts().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], ("sys".to_string(), "q2".to_string()));
    }

    #[tokio::test]
    async fn test_mock_without_responses_errors() {
        let mock = MockSynthesizer::new();
        assert!(mock.generate("sys", "q").await.is_err());

        mock.add_error("backend down").await;
        let err = mock.generate("sys", "q").await.unwrap_err();
        assert!(err.to_string().contains("backend down"));
    }
}
