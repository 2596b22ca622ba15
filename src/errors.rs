// ABOUTME: Unified error handling for the FitPro backend
// ABOUTME: Defines error codes, the AppError type, and HTTP response formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! # Unified Error Handling
//!
//! Centralized error types for the plan pipeline and HTTP surface. Every
//! failure is expressed as an [`AppError`] carrying an [`ErrorCode`] that maps
//! to an HTTP status; route boundaries convert errors into structured
//! `{error, message}` JSON so no internal detail leaks to callers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Malformed or out-of-range caller input
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// Plan-update instruction that is not workout-related
    #[serde(rename = "OFF_TOPIC_INSTRUCTION")]
    OffTopicInstruction,
    /// Oracle reply was not parseable JSON of the expected shape
    #[serde(rename = "MALFORMED_ORACLE_OUTPUT")]
    MalformedOracleOutput,
    /// Oracle output violated a structural plan invariant
    #[serde(rename = "PLAN_VALIDATION_FAILED")]
    PlanValidation,
    /// Oracle call exceeded the configured deadline
    #[serde(rename = "ORACLE_TIMEOUT")]
    OracleTimeout,
    /// Transport-level failure talking to the oracle or embedding provider
    #[serde(rename = "ORACLE_UNAVAILABLE")]
    OracleUnavailable,
    /// Missing or invalid configuration
    #[serde(rename = "CONFIG_ERROR")]
    Config,
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    Internal,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidInput | Self::OffTopicInstruction => StatusCode::BAD_REQUEST,
            Self::MalformedOracleOutput | Self::PlanValidation | Self::OracleUnavailable => {
                StatusCode::BAD_GATEWAY
            }
            Self::OracleTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Config | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-facing description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::OffTopicInstruction => "Off-topic instruction",
            Self::MalformedOracleOutput => "The model returned output that could not be parsed",
            Self::PlanValidation => "The generated plan violated a structural invariant",
            Self::OracleTimeout => "The model did not respond within the deadline",
            Self::OracleUnavailable => "The model service is unavailable",
            Self::Config => "Configuration error encountered",
            Self::Internal => "An internal server error occurred",
        }
    }

    /// Whether a failed oracle call with this code is worth retrying
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::OracleTimeout | Self::OracleUnavailable)
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach a source error for chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Invalid caller input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Instruction rejected by the intent gate
    pub fn off_topic(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::OffTopicInstruction, message)
    }

    /// Unparseable oracle reply
    pub fn malformed_output(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedOracleOutput, message)
    }

    /// Structural plan invariant violation
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PlanValidation, message)
    }

    /// Oracle deadline exceeded
    pub fn oracle_timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::OracleTimeout, message)
    }

    /// Transport-level oracle failure
    pub fn oracle_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::OracleUnavailable,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Config, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response body: `{"error": ..., "message": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short, stable error label
    pub error: String,
    /// Human-readable detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Build a response body with a fixed error label and no detail
    #[must_use]
    pub fn terse(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            error: error.code.description().to_owned(),
            message: Some(error.message.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::from(&self);
        (self.http_status(), Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::Internal, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidInput.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::OffTopicInstruction.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::MalformedOracleOutput.http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ErrorCode::OracleTimeout.http_status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ErrorCode::Internal.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ErrorCode::OracleTimeout.is_retryable());
        assert!(ErrorCode::OracleUnavailable.is_retryable());
        assert!(!ErrorCode::MalformedOracleOutput.is_retryable());
        assert!(!ErrorCode::OffTopicInstruction.is_retryable());
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::off_topic(
            "It looks like you're asking about something else. Please provide instructions related to your workout plan.",
        );
        let body = ErrorResponse::from(&error);
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("Off-topic instruction"));
        assert!(json.contains("workout plan"));
    }

    #[test]
    fn test_terse_response_omits_message() {
        let json = serde_json::to_string(&ErrorResponse::terse("Plan generation failed")).unwrap();
        assert_eq!(json, r#"{"error":"Plan generation failed"}"#);
    }
}
