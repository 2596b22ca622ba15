// ABOUTME: Structural validation of oracle-produced plans
// ABOUTME: Enforces day count, positive sets, candidate scope, and update band rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! Enforces the plan invariants the oracle cannot be trusted to keep.
//!
//! Policy for fresh plans: an exercise whose name is outside the candidate
//! universe is dropped and logged rather than failing the whole plan (the
//! oracle mildly hallucinates; strict rejection would make the feature
//! unusable), but a day that would end up empty is a hard failure. Updates
//! are validated structurally: same day count as the input plan, 2-4
//! exercises per day, positive sets.

use std::collections::HashSet;
use tracing::warn;

use crate::errors::AppError;
use crate::models::WorkoutPlan;

/// Minimum exercises per day after an update
pub const MIN_EXERCISES_PER_DAY: usize = 2;
/// Maximum exercises per day after an update
pub const MAX_EXERCISES_PER_DAY: usize = 4;

fn check_sets_positive(plan: &WorkoutPlan) -> Result<(), AppError> {
    for day in &plan.days {
        for exercise in &day.exercises {
            if exercise.sets == 0 {
                return Err(AppError::validation(format!(
                    "Exercise \"{}\" in {} has zero sets",
                    exercise.name, day.label
                )));
            }
        }
    }
    Ok(())
}

/// Validate a freshly generated plan against the request and the candidate
/// universe it was restricted to.
///
/// `candidate_titles` must be lowercased. Off-candidate exercises are
/// dropped with a warning; everything else is a hard validation error.
///
/// # Errors
///
/// Returns `PlanValidation` on day-count mismatch, zero sets, or a day left
/// without exercises after dropping off-candidate entries.
pub fn validate_generated(
    mut plan: WorkoutPlan,
    requested_days: usize,
    candidate_titles: &[String],
) -> Result<WorkoutPlan, AppError> {
    if plan.days.len() != requested_days {
        return Err(AppError::validation(format!(
            "Requested {requested_days} days, oracle produced {}",
            plan.days.len()
        )));
    }

    check_sets_positive(&plan)?;

    let universe: HashSet<&str> = candidate_titles.iter().map(String::as_str).collect();
    for day in &mut plan.days {
        day.exercises.retain(|exercise| {
            let known = universe.contains(exercise.name.to_lowercase().as_str());
            if !known {
                warn!(
                    exercise = %exercise.name,
                    day = %day.label,
                    "dropping exercise outside the candidate set"
                );
            }
            known
        });
        if day.exercises.is_empty() {
            return Err(AppError::validation(format!(
                "{} has no exercises from the candidate set",
                day.label
            )));
        }
    }

    Ok(plan)
}

/// Validate an updated plan against the plan it replaces.
///
/// The no-empty-day rule and the 2-4 band are hard failures here, as is a
/// changed day count: updates may rearrange a plan but never resize it.
///
/// # Errors
///
/// Returns `PlanValidation` on any violated invariant.
pub fn validate_updated(plan: WorkoutPlan, previous_days: usize) -> Result<WorkoutPlan, AppError> {
    if plan.days.len() != previous_days {
        return Err(AppError::validation(format!(
            "Update changed day count from {previous_days} to {}",
            plan.days.len()
        )));
    }

    check_sets_positive(&plan)?;

    for day in &plan.days {
        let count = day.exercises.len();
        if count < MIN_EXERCISES_PER_DAY || count > MAX_EXERCISES_PER_DAY {
            return Err(AppError::validation(format!(
                "{} has {count} exercises, expected {MIN_EXERCISES_PER_DAY}-{MAX_EXERCISES_PER_DAY}",
                day.label
            )));
        }
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::models::{PlanDay, PlanExercise, Reps};

    fn day(label: &str, names: &[&str]) -> PlanDay {
        PlanDay {
            label: label.to_owned(),
            exercises: names
                .iter()
                .map(|name| PlanExercise::bare(*name, 3, Reps::Count(12)))
                .collect(),
        }
    }

    fn candidates() -> Vec<String> {
        vec!["squat".to_owned(), "plank".to_owned(), "push-ups".to_owned()]
    }

    #[test]
    fn test_day_count_mismatch_fails() {
        let plan = WorkoutPlan {
            days: vec![day("Day 1", &["Squat"]), day("Day 2", &["Plank"])],
        };
        let err = validate_generated(plan, 3, &candidates()).unwrap_err();
        assert_eq!(err.code, ErrorCode::PlanValidation);
    }

    #[test]
    fn test_zero_sets_fails() {
        let mut plan = WorkoutPlan {
            days: vec![day("Day 1", &["Squat"])],
        };
        plan.days[0].exercises[0].sets = 0;
        let err = validate_generated(plan, 1, &candidates()).unwrap_err();
        assert_eq!(err.code, ErrorCode::PlanValidation);
    }

    #[test]
    fn test_off_candidate_exercise_is_dropped_not_fatal() {
        let plan = WorkoutPlan {
            days: vec![day("Day 1", &["Squat", "Invented Move"])],
        };
        let validated = validate_generated(plan, 1, &candidates()).unwrap();
        assert_eq!(validated.days[0].exercises.len(), 1);
        assert_eq!(validated.days[0].exercises[0].name, "Squat");
    }

    #[test]
    fn test_candidate_match_is_case_insensitive() {
        let plan = WorkoutPlan {
            days: vec![day("Day 1", &["SQUAT", "plank"])],
        };
        let validated = validate_generated(plan, 1, &candidates()).unwrap();
        assert_eq!(validated.days[0].exercises.len(), 2);
    }

    #[test]
    fn test_day_emptied_by_drops_fails() {
        let plan = WorkoutPlan {
            days: vec![day("Day 1", &["Invented Move"])],
        };
        let err = validate_generated(plan, 1, &candidates()).unwrap_err();
        assert_eq!(err.code, ErrorCode::PlanValidation);
    }

    #[test]
    fn test_update_preserves_day_count() {
        let plan = WorkoutPlan {
            days: vec![day("Day 1", &["Squat", "Plank"])],
        };
        let err = validate_updated(plan, 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::PlanValidation);
    }

    #[test]
    fn test_update_band_violations_fail() {
        let thin = WorkoutPlan {
            days: vec![day("Day 1", &["Squat"])],
        };
        assert!(validate_updated(thin, 1).is_err());

        let bloated = WorkoutPlan {
            days: vec![day("Day 1", &["Squat", "Plank", "Push-ups", "Lunge", "Row"])],
        };
        assert!(validate_updated(bloated, 1).is_err());
    }

    #[test]
    fn test_update_within_band_passes() {
        let plan = WorkoutPlan {
            days: vec![
                day("Day 1", &["Squat", "Plank"]),
                day("Day 2", &["Push-ups", "Plank", "Squat", "Lunge"]),
            ],
        };
        assert!(validate_updated(plan, 2).is_ok());
    }
}
