// ABOUTME: LLM provider abstraction layer for the generative oracle
// ABOUTME: Defines the chat completion contract implemented by Groq and test doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! # LLM Provider Service Provider Interface
//!
//! The generative oracle is untrusted, non-deterministic, and network-bound;
//! this module defines the narrow contract the rest of the crate talks to.
//! Production uses [`GroqProvider`]; tests inject scripted doubles through
//! the same trait. All calls in this crate are unary chat completions made
//! through [`OracleClient`], which adds the timeout and retry policy.

mod groq;
mod oracle;
/// Compile-time system prompts
pub mod prompts;

pub use groq::GroqProvider;
pub use oracle::OracleClient;
pub use prompts::coach_system_prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Contract for a unary chat-completion backend.
///
/// Implementations own their transport and credentials; callers never see
/// provider wire formats, only [`ChatRequest`] in and [`ChatResponse`] out.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Stable provider identifier, e.g. "groq"
    fn name(&self) -> &'static str;

    /// Human-readable name for logs and health output
    fn display_name(&self) -> &'static str;

    /// What this provider can do
    fn capabilities(&self) -> LlmCapabilities;

    /// Model used when a request names none
    fn default_model(&self) -> &str;

    /// One chat completion round-trip
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;

    /// Cheap authenticated probe; `Ok(false)` means reachable but unhealthy
    async fn health_check(&self) -> Result<bool, AppError>;
}

/// Who authored a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instruction to the model
    System,
    /// End-user turn
    User,
    /// Model turn
    Assistant,
}

impl MessageRole {
    /// Wire-format spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parse a wire-format role; `None` for anything unrecognized
    #[must_use]
    pub fn parse(role: &str) -> Option<Self> {
        match role {
            "system" => Some(Self::System),
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// One turn of a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who said it
    pub role: MessageRole,
    /// What was said
    pub content: String,
}

impl ChatMessage {
    /// Message with an explicit role
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// System-role message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// User-role message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Assistant-role message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// A chat completion request: the conversation plus generation knobs.
/// Unset knobs fall back to provider defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation, oldest message first
    pub messages: Vec<ChatMessage>,
    /// Provider-specific model identifier
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Completion token budget
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Request with every knob left at the provider default
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the sampling temperature
    #[must_use]
    pub fn with_temperature(self, temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            ..self
        }
    }

    /// Set the completion token budget
    #[must_use]
    pub fn with_max_tokens(self, max_tokens: u32) -> Self {
        Self {
            max_tokens: Some(max_tokens),
            ..self
        }
    }
}

/// What came back from the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated text
    pub content: String,
    /// Model that actually served the request
    pub model: String,
    /// Token accounting, when the provider reports it
    pub usage: Option<TokenUsage>,
    /// Why generation stopped ("stop", "length", ...)
    pub finish_reason: Option<String>,
}

/// Token accounting for one completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens generated
    pub completion_tokens: u32,
    /// Prompt plus completion
    pub total_tokens: u32,
}

bitflags::bitflags! {
    /// Provider feature flags reported through [`LlmProvider::capabilities`]
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LlmCapabilities: u8 {
        /// Provider honors system-role messages
        const SYSTEM_MESSAGES = 0b0000_0001;
        /// Provider can be forced into JSON-only output
        const JSON_MODE = 0b0000_0010;
    }
}

impl LlmCapabilities {
    /// Whether system-role messages are honored
    #[must_use]
    pub const fn supports_system_messages(&self) -> bool {
        self.contains(Self::SYSTEM_MESSAGES)
    }
}
