// ABOUTME: Chat route handler for the coach persona
// ABOUTME: Stateless passthrough to the oracle with a fixed system prompt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! `POST /chat`: forwards the caller's conversation to the oracle under the
//! FitPro coach persona. No plan logic, no server-side history; the caller
//! owns the transcript.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use crate::errors::ErrorResponse;
use crate::llm::{coach_system_prompt, ChatMessage, ChatRequest, MessageRole};
use crate::resources::ServerResources;

/// Token budget for coach replies; short, practical advice by design
const CHAT_MAX_TOKENS: u32 = 300;

/// One message in the caller-owned transcript
#[derive(Debug, Deserialize)]
pub struct WireMessage {
    /// "user", "assistant", or "system"
    pub role: String,
    /// Message text
    pub content: String,
}

/// Request body for `POST /chat`
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    /// Conversation so far, oldest first
    #[serde(default)]
    pub messages: Vec<WireMessage>,
}

/// Response body: `{"reply": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    /// The coach's reply
    pub reply: String,
}

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create the chat routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/chat", post(Self::chat))
            .with_state(resources)
    }

    /// Build the oracle conversation: persona first, then the transcript.
    /// Messages with unknown roles are skipped rather than failing the call.
    fn build_messages(transcript: &[WireMessage]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(ChatMessage::system(coach_system_prompt()));

        for wire in transcript {
            match MessageRole::parse(&wire.role) {
                Some(role) => messages.push(ChatMessage::new(role, &wire.content)),
                None => warn!(role = %wire.role, "skipping message with unknown role"),
            }
        }
        messages
    }

    /// Handle `POST /chat`
    async fn chat(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<ChatBody>,
    ) -> Response {
        let request = ChatRequest::new(Self::build_messages(&body.messages))
            .with_max_tokens(CHAT_MAX_TOKENS);

        match resources.oracle.complete(&request).await {
            Ok(response) => (
                StatusCode::OK,
                Json(ChatReply {
                    reply: response.content,
                }),
            )
                .into_response(),
            Err(err) => {
                error!("chat completion failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::terse("Chat failed")),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_always_leads_the_conversation() {
        let messages = ChatRoutes::build_messages(&[WireMessage {
            role: "user".to_owned(),
            content: "I want to lose weight".to_owned(),
        }]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert!(messages[0].content.contains("FitPro AI Coach"));
        assert_eq!(messages[1].role, MessageRole::User);
    }

    #[test]
    fn test_unknown_roles_are_skipped() {
        let messages = ChatRoutes::build_messages(&[
            WireMessage {
                role: "tool".to_owned(),
                content: "ignored".to_owned(),
            },
            WireMessage {
                role: "assistant".to_owned(),
                content: "kept".to_owned(),
            },
        ]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, MessageRole::Assistant);
    }
}
