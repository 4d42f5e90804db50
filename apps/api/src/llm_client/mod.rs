/// LLM Client: the single point of entry for all external model calls in the screener.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All model interactions MUST go through `CompletionModel`.
///
/// One request per call. There is no retry loop here: the matcher falls back to the
/// heuristic scorer on the first failure.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::MatchConfig;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Sampling and transport settings for one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl CompletionOptions {
    pub fn from_config(config: &MatchConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: MAX_TOKENS,
            timeout: config.request_timeout,
        }
    }
}

/// The external scoring model boundary: prompt in, raw text out.
/// Parsing the text is the caller's job.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Identifier recorded on every result this model produces.
    fn model_id(&self) -> &str;

    async fn complete(
        &self,
        prompt: &str,
        system: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Concatenates every text block; `None` when there is no text at all.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .content
            .iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(client: Client, api_key: String, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }

    /// `None` when no credential is configured; callers skip model scoring entirely.
    pub fn from_config(api_key: Option<&str>, config: &MatchConfig) -> Option<Self> {
        let api_key = api_key.map(str::trim).filter(|k| !k.is_empty())?;
        Some(Self::new(
            Client::new(),
            api_key.to_string(),
            config.model_identifier.clone(),
        ))
    }

    /// Makes a raw call to the Messages API, returning the full response object.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        options: &CompletionOptions,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: &self.model,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .timeout(options.timeout)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, options.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response
            .json()
            .await
            .map_err(|e| classify_transport_error(e, options.timeout))?;

        debug!(
            "LLM call succeeded: model={}, input_tokens={}, output_tokens={}",
            self.model, llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

fn classify_transport_error(error: reqwest::Error, timeout: Duration) -> LlmError {
    if error.is_timeout() {
        LlmError::Timeout(timeout)
    } else {
        LlmError::Http(error)
    }
}

#[async_trait]
impl CompletionModel for LlmClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        prompt: &str,
        system: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        let response = self.call(prompt, system, options).await?;
        response.text().ok_or(LlmError::EmptyContent)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_from_config_without_key_is_none() {
        let config = MatchConfig::default();
        assert!(LlmClient::from_config(None, &config).is_none());
        assert!(LlmClient::from_config(Some("  "), &config).is_none());
    }

    #[test]
    fn test_from_config_uses_model_identifier() {
        let config = MatchConfig {
            model_identifier: "claude-haiku-4-5".to_string(),
            ..MatchConfig::default()
        };
        let client = LlmClient::from_config(Some("sk-test"), &config).unwrap();
        assert_eq!(client.model_id(), "claude-haiku-4-5");
    }

    #[test]
    fn test_options_follow_config() {
        let config = MatchConfig::default();
        let options = CompletionOptions::from_config(&config);
        assert_eq!(options.temperature, config.temperature);
        assert_eq!(options.timeout, config.request_timeout);
    }

    #[test]
    fn test_response_text_joins_text_blocks() {
        let response: LlmResponse = serde_json::from_str(
            r#"{
                "content": [
                    {"type": "text", "text": "{\"score\": "},
                    {"type": "tool_use"},
                    {"type": "text", "text": "7}"}
                ],
                "usage": {"input_tokens": 10, "output_tokens": 3}
            }"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"score\": 7}"));
    }

    #[test]
    fn test_response_text_empty_is_none() {
        let response: LlmResponse = serde_json::from_str(
            r#"{"content": [{"type": "text", "text": "  "}], "usage": {"input_tokens": 1, "output_tokens": 0}}"#,
        )
        .unwrap();
        assert!(response.text().is_none());
    }
}
