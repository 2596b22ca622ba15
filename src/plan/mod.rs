// ABOUTME: Plan pipeline module organization
// ABOUTME: Avoidance classification, prompt building, synthesis, validation, hydration, updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! # Workout Plan Pipeline
//!
//! Generation: classify avoidance → embed query → retrieve candidates →
//! build prompt → synthesize → validate → hydrate. Update: intent gate →
//! re-synthesize around the current plan → validate (no-empty-day hard) →
//! hydrate. [`PlanEngine`] is the single entry point the routes call.

/// Injury/preference text to body-part-to-avoid classification
pub mod avoidance;
/// Pipeline orchestration
pub mod engine;
/// Catalog metadata join onto oracle output
pub mod hydrate;
/// Synthesis and update prompt builders
pub mod prompt;
/// Oracle invocation and JSON extraction
pub mod synthesis;
/// Structural invariant enforcement
pub mod validate;

pub use engine::{PlanEngine, PlanSettings};
