// ABOUTME: Plan route handlers for generation and natural-language updates
// ABOUTME: Converts pipeline failures into the fixed error shapes the front end expects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! `/plan` and `/update-plan`. Either a fully validated and hydrated plan is
//! returned, or a structured error; a generation failure is always the terse
//! `500 {"error": "Plan generation failed"}`, an update failure either the
//! off-topic 400 or the terse `500 {"error": "Update failed"}`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::errors::{ErrorCode, ErrorResponse};
use crate::models::{UserProfile, WorkoutPlan};
use crate::resources::ServerResources;

/// Request body for `POST /plan`
#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    /// Age in years
    pub age: u32,
    /// Weight in kilograms
    pub weight: f64,
    /// Height in centimeters
    pub height: f64,
    /// Training goal, free text
    pub goal: String,
    /// Injury statement, free text
    #[serde(default)]
    pub injury: String,
    /// Minutes available per day
    pub time: u32,
    /// Additional preference, free text
    #[serde(default)]
    pub pref: String,
    /// Requested workout days per week
    #[serde(rename = "daysPerWeek")]
    pub days_per_week: Option<i64>,
}

impl GeneratePlanRequest {
    fn into_profile(self) -> UserProfile {
        let requested_days = UserProfile::clamp_days(self.days_per_week);
        UserProfile {
            age: self.age,
            weight: self.weight,
            height: self.height,
            goal: self.goal,
            injury: self.injury,
            preference: self.pref,
            available_minutes_per_day: self.time,
            requested_days,
        }
    }
}

/// Request body for `POST /update-plan`
#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    /// The plan to edit; replaced wholesale on success
    #[serde(rename = "currentPlan")]
    pub current_plan: WorkoutPlan,
    /// Natural-language edit instruction
    pub instruction: String,
}

/// Successful plan response: `{"plan": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    /// The validated, hydrated plan
    pub plan: WorkoutPlan,
}

/// Plan routes handler
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create the plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/plan", post(Self::generate_plan))
            .route("/update-plan", post(Self::update_plan))
            .with_state(resources)
    }

    /// Handle `POST /plan`
    async fn generate_plan(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<GeneratePlanRequest>,
    ) -> Response {
        let profile = request.into_profile();
        info!(days = profile.requested_days, goal = %profile.goal, "plan generation requested");

        match resources.engine.generate(&profile).await {
            Ok(plan) => (StatusCode::OK, Json(PlanResponse { plan })).into_response(),
            Err(err) => {
                error!("plan generation failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::terse("Plan generation failed")),
                )
                    .into_response()
            }
        }
    }

    /// Handle `POST /update-plan`
    async fn update_plan(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<UpdatePlanRequest>,
    ) -> Response {
        info!(
            days = request.current_plan.days.len(),
            "plan update requested"
        );

        match resources
            .engine
            .update(&request.current_plan, &request.instruction)
            .await
        {
            Ok(plan) => (StatusCode::OK, Json(PlanResponse { plan })).into_response(),
            Err(err) if err.code == ErrorCode::OffTopicInstruction => {
                info!("plan update rejected as off-topic");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "Off-topic instruction".to_owned(),
                        message: Some(err.message),
                    }),
                )
                    .into_response()
            }
            Err(err) => {
                error!("plan update failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::terse("Update failed")),
                )
                    .into_response()
            }
        }
    }
}
