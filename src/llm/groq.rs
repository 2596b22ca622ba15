// ABOUTME: Groq LLM provider implementation
// ABOUTME: Uses the OpenAI-compatible chat completions API for Llama models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! # Groq Provider
//!
//! [`LlmProvider`] implementation for Groq's LPU-accelerated inference.
//! Set the `GROQ_API_KEY` environment variable with an API key from
//! <https://console.groq.com/keys>. The default model is
//! `llama-3.1-8b-instant`, which is fast enough for the classification and
//! synthesis calls this crate makes.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage};
use crate::errors::AppError;

/// Environment variable for the Groq API key
const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Default model to use
const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Base URL for the Groq API (OpenAI-compatible)
const API_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Groq LLM provider using LPU-accelerated inference
pub struct GroqProvider {
    client: Client,
    api_key: String,
}

impl GroqProvider {
    /// Create a new Groq provider with the given API key
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Create a Groq provider from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if `GROQ_API_KEY` is not set.
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = std::env::var(GROQ_API_KEY_ENV).map_err(|_| {
            AppError::config(format!(
                "Missing {GROQ_API_KEY_ENV} environment variable. Get your API key from https://console.groq.com/keys"
            ))
        })?;
        Ok(Self::new(api_key))
    }

    fn endpoint(path: &str) -> String {
        format!("{API_BASE_URL}/{path}")
    }

    /// Map a non-2xx completion response to an [`AppError`]: 401 is a key
    /// problem, 400 a request problem, everything else a service problem
    fn map_api_error(status: reqwest::StatusCode, body: &str) -> AppError {
        let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) else {
            let snippet: String = body.chars().take(200).collect();
            return AppError::oracle_unavailable("Groq", format!("API error ({status}): {snippet}"));
        };

        let detail = envelope.error;
        match status.as_u16() {
            401 => AppError::config(format!("Groq API authentication failed: {}", detail.message)),
            400 => AppError::invalid_input(format!("Groq API validation error: {}", detail.message)),
            _ => AppError::oracle_unavailable(
                "Groq",
                format!(
                    "{} - {}",
                    detail.error_type.as_deref().unwrap_or("unknown"),
                    detail.message
                ),
            ),
        }
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    fn display_name(&self) -> &'static str {
        "Groq (Llama)"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE
    }

    fn default_model(&self) -> &'static str {
        DEFAULT_MODEL
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(DEFAULT_MODEL)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let body = CompletionRequest {
            model: request.model.as_deref().unwrap_or(DEFAULT_MODEL).to_owned(),
            messages: request
                .messages
                .iter()
                .map(|message| CompletionMessage {
                    role: message.role.as_str().to_owned(),
                    content: message.content.clone(),
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(messages = body.messages.len(), "sending Groq chat completion");

        let response = self
            .client
            .post(Self::endpoint("chat/completions"))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach Groq API: {}", e);
                AppError::oracle_unavailable("Groq", format!("Failed to connect: {e}"))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            AppError::oracle_unavailable("Groq", format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::map_api_error(status, &text));
        }

        let completion: CompletionResponse = serde_json::from_str(&text).map_err(|e| {
            error!("Unparseable Groq response: {}", e);
            AppError::oracle_unavailable("Groq", format!("Failed to parse response: {e}"))
        })?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::oracle_unavailable("Groq", "API returned no choices"))?;

        let content = choice.message.content.unwrap_or_default();
        debug!(
            chars = content.len(),
            finish_reason = ?choice.finish_reason,
            "Groq completion received"
        );

        Ok(ChatResponse {
            content,
            model: completion.model,
            usage: completion.usage.map(|usage| TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        // the models listing is the cheapest authenticated call
        let response = self
            .client
            .get(Self::endpoint("models"))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| {
                error!("Groq health check failed: {}", e);
                AppError::oracle_unavailable("Groq", format!("Health check failed: {e}"))
            })?;

        let healthy = response.status().is_success();
        if !healthy {
            warn!(status = %response.status(), "Groq health check returned an error status");
        }
        Ok(healthy)
    }
}

// OpenAI-compatible wire format

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<CompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct CompletionMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<CompletionUsage>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_bad_key_maps_to_config_error() {
        let body = r#"{"error": {"message": "Invalid API Key", "type": "invalid_request_error"}}"#;
        let err = GroqProvider::map_api_error(reqwest::StatusCode::UNAUTHORIZED, body);
        assert_eq!(err.code, ErrorCode::Config);
    }

    #[test]
    fn test_bad_request_maps_to_invalid_input() {
        let body = r#"{"error": {"message": "max_tokens too large", "type": "invalid_request_error"}}"#;
        let err = GroqProvider::map_api_error(reqwest::StatusCode::BAD_REQUEST, body);
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_server_errors_and_garbage_map_to_unavailable() {
        let body = r#"{"error": {"message": "overloaded", "type": "server_error"}}"#;
        let err = GroqProvider::map_api_error(reqwest::StatusCode::SERVICE_UNAVAILABLE, body);
        assert_eq!(err.code, ErrorCode::OracleUnavailable);

        let err = GroqProvider::map_api_error(reqwest::StatusCode::BAD_GATEWAY, "<html>502</html>");
        assert_eq!(err.code, ErrorCode::OracleUnavailable);
    }
}
