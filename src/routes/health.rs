// ABOUTME: Health check route handler for service monitoring
// ABOUTME: Reports liveness, catalog size, and the configured oracle provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! `GET /health`: cheap liveness probe. Reports catalog statistics and
//! which oracle provider is configured; it deliberately makes no outbound
//! calls so monitoring never burns oracle quota.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::resources::ServerResources;

/// Response body for `GET /health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" when the process answers
    pub status: String,
    /// Records in the exercise catalog
    pub corpus_size: usize,
    /// Catalog records carrying an embedding
    pub embedded_records: usize,
    /// Configured oracle provider name
    pub provider: String,
    /// Oracle model used by default
    pub model: String,
}

/// Health routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health))
            .with_state(resources)
    }

    /// Handle `GET /health`
    async fn health(State(resources): State<Arc<ServerResources>>) -> Json<HealthResponse> {
        Json(HealthResponse {
            status: "ok".to_owned(),
            corpus_size: resources.corpus.len(),
            embedded_records: resources.corpus.embedded_count(),
            provider: resources.oracle.provider_name().to_owned(),
            model: resources.oracle.default_model().to_owned(),
        })
    }
}
