// ABOUTME: Plan hydration joining oracle output against the exercise catalog
// ABOUTME: Attaches body part, equipment, level, and description metadata by title
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! Enriches oracle-produced assignments with full catalog metadata. Total
//! and pure: it never fails and never drops an assignment; an unmatched
//! title passes through with only the oracle-chosen fields so the caller
//! still has a name to render.

use tracing::debug;

use crate::corpus::ExerciseCorpus;
use crate::models::WorkoutPlan;

/// Join every assignment in `plan` against `corpus` by case-insensitive
/// title, preserving the oracle-chosen sets and reps.
#[must_use]
pub fn hydrate(mut plan: WorkoutPlan, corpus: &ExerciseCorpus) -> WorkoutPlan {
    let mut matched = 0usize;
    let mut total = 0usize;

    for day in &mut plan.days {
        for exercise in &mut day.exercises {
            total += 1;
            if let Some(record) = corpus.find_by_title(&exercise.name) {
                matched += 1;
                exercise.body_part = Some(record.body_part.clone());
                exercise.description = Some(record.description.clone());
                exercise.equipment = Some(record.equipment.clone());
                exercise.level = Some(record.level.clone());
                exercise.exercise_type = Some(record.exercise_type.clone());
            }
        }
    }

    debug!(matched, total, "plan hydrated");
    plan
}
