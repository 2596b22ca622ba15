// ABOUTME: Route module organization for the FitPro HTTP surface
// ABOUTME: Assembles the plan, chat, and health routers with shared middleware
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! HTTP route definitions, organized by domain. Handlers are thin: they
//! deserialize the request, delegate to the plan engine or the oracle, and
//! convert failures into the fixed response shapes the front end expects.

/// Free chat with the coach persona
pub mod chat;
/// Liveness and status endpoint
pub mod health;
/// Plan generation and update endpoints
pub mod plan;

pub use chat::ChatRoutes;
pub use health::HealthRoutes;
pub use plan::PlanRoutes;

use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::resources::ServerResources;

/// Hard ceiling on request handling; generous because a plan request makes
/// up to two oracle round-trips plus one embedding call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Build the full application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(PlanRoutes::routes(Arc::clone(&resources)))
        .merge(ChatRoutes::routes(Arc::clone(&resources)))
        .merge(HealthRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
}
