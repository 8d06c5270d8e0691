/// LLM client: every outbound text-generation call goes through a `TextGenerator`.
///
/// One implementation per provider (`OpenAiClient`, `GeminiClient`). Calls are
/// single-shot: no retries, bounded by the HTTP client timeout. Callers decide
/// what a failure means; the feedback generator degrades to its template.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

pub mod gemini;
pub mod openai;
pub mod prompts;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

/// Upper bound on tokens requested from any provider.
pub const MAX_OUTPUT_TOKENS: u32 = 1000;
pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("No JSON object found in LLM output")]
    NoJson,

    #[error("Provider timed out after {0:?}")]
    Timeout(Duration),
}

/// A text-generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short provider label, e.g. `"openai"`.
    fn name(&self) -> &'static str;

    /// Sends one system + user prompt pair and returns the generated text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

/// Calls the generator and deserializes the first JSON object in its reply.
/// The prompt must instruct the model to return JSON.
pub async fn call_json<T: DeserializeOwned>(
    generator: &dyn TextGenerator,
    system: &str,
    prompt: &str,
) -> Result<T, LlmError> {
    let text = generator.complete(system, prompt).await?;
    let json = extract_json_object(&text).ok_or(LlmError::NoJson)?;
    serde_json::from_str(json).map_err(LlmError::Parse)
}

/// Builds the shared HTTP client used by provider implementations.
pub(crate) fn http_client(timeout: Duration) -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Error envelope shared by the OpenAI and Gemini APIs: `{"error": {"message": ...}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Turns a non-success response into `LlmError::Api`, preferring the
/// provider's own error message over the raw body.
pub(crate) async fn api_error(response: reqwest::Response) -> LlmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Finds the outermost `{ ... }` span after fence stripping; tolerates prose
/// around the object.
fn extract_json_object(text: &str) -> Option<&str> {
    let text = strip_json_fences(text);
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
