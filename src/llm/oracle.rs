// ABOUTME: Oracle client wrapping an LLM provider with timeout and retry policy
// ABOUTME: Every oracle round-trip in the plan pipeline goes through this wrapper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! Bounded oracle access.
//!
//! The oracle is network-bound and may stall or fail transiently. Every call
//! is bounded by a deadline (timeout maps to `OracleTimeout`, never a partial
//! result) and transport-level failures retry with bounded exponential
//! backoff. Non-retryable failures (bad input, malformed output) surface on
//! the first attempt.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use super::{ChatRequest, ChatResponse, LlmProvider};
use crate::errors::AppError;

/// Initial backoff before the first retry; doubles per attempt
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Oracle client with a per-call deadline and retry-with-backoff
#[derive(Clone)]
pub struct OracleClient {
    provider: Arc<dyn LlmProvider>,
    call_timeout: Duration,
    max_retries: u32,
}

impl OracleClient {
    /// Wrap a provider with the given deadline and retry budget.
    ///
    /// `max_retries` counts additional attempts after the first; 0 disables
    /// retrying entirely.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, call_timeout: Duration, max_retries: u32) -> Self {
        Self {
            provider,
            call_timeout,
            max_retries,
        }
    }

    /// Provider identifier, for health reporting
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Default model of the wrapped provider
    #[must_use]
    pub fn default_model(&self) -> &str {
        self.provider.default_model()
    }

    /// Check that the wrapped provider is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the probe itself cannot be made.
    pub async fn health_check(&self) -> Result<bool, AppError> {
        self.provider.health_check().await
    }

    /// Perform a chat completion, honoring the deadline and retry policy.
    ///
    /// # Errors
    ///
    /// Returns `OracleTimeout` when the deadline elapses, or the provider's
    /// error once the retry budget is exhausted.
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let mut backoff = INITIAL_BACKOFF;
        let mut attempt = 0u32;

        loop {
            let result = self.attempt(request).await;
            match result {
                Ok(response) => return Ok(response),
                Err(error) if error.code.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = self.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        "oracle call failed, retrying: {error}"
                    );
                    sleep(backoff).await;
                    backoff *= 2;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn attempt(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        debug!(
            provider = self.provider.name(),
            timeout_ms = self.call_timeout.as_millis() as u64,
            "issuing oracle call"
        );
        match timeout(self.call_timeout, self.provider.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::oracle_timeout(format!(
                "{} did not respond within {}s",
                self.provider.display_name(),
                self.call_timeout.as_secs()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::llm::{ChatMessage, LlmCapabilities};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Provider that fails a fixed number of times before succeeding
    struct FlakyProvider {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl LlmProvider for FlakyProvider {
        fn name(&self) -> &'static str {
            "flaky"
        }
        fn display_name(&self) -> &'static str {
            "Flaky"
        }
        fn capabilities(&self) -> LlmCapabilities {
            LlmCapabilities::SYSTEM_MESSAGES
        }
        fn default_model(&self) -> &'static str {
            "flaky-1"
        }
        async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(AppError::oracle_unavailable("Flaky", "connection reset"))
            } else {
                Ok(ChatResponse {
                    content: "ok".to_owned(),
                    model: "flaky-1".to_owned(),
                    usage: None,
                    finish_reason: Some("stop".to_owned()),
                })
            }
        }
        async fn health_check(&self) -> Result<bool, AppError> {
            Ok(true)
        }
    }

    /// Provider that never completes within any deadline
    struct StalledProvider;

    #[async_trait]
    impl LlmProvider for StalledProvider {
        fn name(&self) -> &'static str {
            "stalled"
        }
        fn display_name(&self) -> &'static str {
            "Stalled"
        }
        fn capabilities(&self) -> LlmCapabilities {
            LlmCapabilities::SYSTEM_MESSAGES
        }
        fn default_model(&self) -> &'static str {
            "stalled-1"
        }
        async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
            sleep(Duration::from_secs(3600)).await;
            unreachable!("sleep never returns within the test deadline")
        }
        async fn health_check(&self) -> Result<bool, AppError> {
            Ok(true)
        }
    }

    fn request() -> ChatRequest {
        ChatRequest::new(vec![ChatMessage::user("hello")])
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried() {
        let provider = Arc::new(FlakyProvider {
            failures: 2,
            calls: AtomicU32::new(0),
        });
        let client = OracleClient::new(provider.clone(), Duration::from_secs(5), 2);

        let response = client.complete(&request()).await.unwrap();
        assert_eq!(response.content, "ok");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_budget_exhaustion_surfaces_error() {
        let provider = Arc::new(FlakyProvider {
            failures: 10,
            calls: AtomicU32::new(0),
        });
        let client = OracleClient::new(provider.clone(), Duration::from_secs(5), 1);

        let error = client.complete(&request()).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::OracleUnavailable);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_maps_to_oracle_timeout() {
        let client = OracleClient::new(Arc::new(StalledProvider), Duration::from_secs(1), 0);
        let error = client.complete(&request()).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::OracleTimeout);
    }
}
