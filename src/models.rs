// ABOUTME: Core data models for the FitPro backend
// ABOUTME: Defines ExerciseRecord, UserProfile, BodyPart, and the workout plan schema
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! Core data models shared across the retrieval and plan pipelines.
//!
//! The plan types double as the strict schema for oracle output: anything the
//! model returns must decode into [`WorkoutPlan`] or it is rejected as
//! malformed, rather than duck-typed into the response.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One exercise in the catalog, with optional precomputed embedding.
///
/// Field aliases match the catalog file produced by the embedding seeder
/// (`Title`, `BodyPart`, `Desc`, ...), so both raw and enriched catalogs load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseRecord {
    /// Catalog identifier; assigned from file position when absent
    #[serde(default)]
    pub id: String,
    /// Human-readable exercise name, the hydration join key
    #[serde(alias = "Title")]
    pub title: String,
    /// Primary body part trained, used by the avoidance filter
    #[serde(alias = "BodyPart")]
    pub body_part: String,
    /// Required equipment
    #[serde(alias = "Equipment", default)]
    pub equipment: String,
    /// Difficulty level
    #[serde(alias = "Level", default)]
    pub level: String,
    /// Exercise type (strength, stretching, ...)
    #[serde(rename = "type", alias = "Type", default)]
    pub exercise_type: String,
    /// Free-text description
    #[serde(alias = "Desc", default)]
    pub description: String,
    /// Embedding vector; records without one are never retrieval candidates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

/// Anatomical labels the avoidance classifier may choose from.
///
/// The set is fixed; the classifier falls back to "none" for anything the
/// oracle returns that does not match one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyPart {
    /// Abdominal muscles
    Abdominals,
    /// Hip abductors
    Abductors,
    /// Hip adductors
    Adductors,
    /// Biceps
    Biceps,
    /// Calves
    Calves,
    /// Chest
    Chest,
    /// Forearms
    Forearms,
    /// Glutes
    Glutes,
    /// Hamstrings
    Hamstrings,
    /// Latissimus dorsi
    Lats,
    /// Lower back
    LowerBack,
    /// Middle back
    MiddleBack,
    /// Trapezius
    Traps,
    /// Quadriceps
    Quadriceps,
    /// Shoulders
    Shoulders,
    /// Triceps
    Triceps,
}

impl BodyPart {
    /// All labels, in the order presented to the classifier
    pub const ALL: [Self; 16] = [
        Self::Abdominals,
        Self::Abductors,
        Self::Adductors,
        Self::Biceps,
        Self::Calves,
        Self::Chest,
        Self::Forearms,
        Self::Glutes,
        Self::Hamstrings,
        Self::Lats,
        Self::LowerBack,
        Self::MiddleBack,
        Self::Traps,
        Self::Quadriceps,
        Self::Shoulders,
        Self::Triceps,
    ];

    /// Canonical catalog spelling of this label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Abdominals => "Abdominals",
            Self::Abductors => "Abductors",
            Self::Adductors => "Adductors",
            Self::Biceps => "Biceps",
            Self::Calves => "Calves",
            Self::Chest => "Chest",
            Self::Forearms => "Forearms",
            Self::Glutes => "Glutes",
            Self::Hamstrings => "Hamstrings",
            Self::Lats => "Lats",
            Self::LowerBack => "Lower Back",
            Self::MiddleBack => "Middle Back",
            Self::Traps => "Traps",
            Self::Quadriceps => "Quadriceps",
            Self::Shoulders => "Shoulders",
            Self::Triceps => "Triceps",
        }
    }

    /// Case-insensitive parse against the canonical spellings
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let needle = text.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|part| part.as_str().eq_ignore_ascii_case(needle))
    }

    /// Whether this label matches a catalog body-part string
    #[must_use]
    pub fn matches(self, body_part: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(body_part.trim())
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request user profile; never persisted by this crate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Age in years
    pub age: u32,
    /// Weight in kilograms
    pub weight: f64,
    /// Height in centimeters
    pub height: f64,
    /// Training goal, free text ("lose weight", "build muscle", ...)
    pub goal: String,
    /// Injury statement, free text; empty means none reported
    #[serde(default)]
    pub injury: String,
    /// Additional preference, free text
    #[serde(default)]
    pub preference: String,
    /// Minutes available per training day
    pub available_minutes_per_day: u32,
    /// Requested number of workout days, already clamped to 1..=7
    pub requested_days: usize,
}

impl UserProfile {
    /// Clamp a raw day count into the supported 1..=7 range, defaulting to 3
    #[must_use]
    pub fn clamp_days(raw: Option<i64>) -> usize {
        usize::try_from(raw.unwrap_or(3).clamp(1, 7)).unwrap_or(3)
    }

    /// Text embedded to form the retrieval query vector
    #[must_use]
    pub fn retrieval_query_text(&self) -> String {
        format!("{} {}", self.goal, self.preference).trim().to_owned()
    }
}

/// Sets/reps prescription; the oracle returns either a bare count or
/// free text like "12-15" or "30 seconds"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reps {
    /// Plain repetition count
    Count(u32),
    /// Free-text prescription
    Text(String),
}

impl fmt::Display for Reps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One exercise assignment within a plan day.
///
/// The oracle produces only `name`, `sets`, and `reps`; the remaining fields
/// are filled by hydration when the name resolves in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanExercise {
    /// Exercise name as chosen by the oracle
    pub name: String,
    /// Number of sets, must be positive
    pub sets: u32,
    /// Repetition prescription
    pub reps: Reps,
    /// Body part, from the catalog
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "bodyPart")]
    pub body_part: Option<String>,
    /// Description, from the catalog
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "desc")]
    pub description: Option<String>,
    /// Equipment, from the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    /// Level, from the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Exercise type, from the catalog
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub exercise_type: Option<String>,
}

impl PlanExercise {
    /// Bare assignment as the oracle emits it, before hydration
    #[must_use]
    pub fn bare(name: impl Into<String>, sets: u32, reps: Reps) -> Self {
        Self {
            name: name.into(),
            sets,
            reps,
            body_part: None,
            description: None,
            equipment: None,
            level: None,
            exercise_type: None,
        }
    }
}

/// One day of a workout plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDay {
    /// Display label, e.g. "Day 1"
    #[serde(rename = "day")]
    pub label: String,
    /// Exercises assigned to this day
    pub exercises: Vec<PlanExercise>,
}

/// A multi-day workout plan; the shape the oracle must produce and the
/// shape returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Workout days, in order
    pub days: Vec<PlanDay>,
}

impl WorkoutPlan {
    /// Lowercased titles of every exercise in the plan
    #[must_use]
    pub fn exercise_names(&self) -> Vec<String> {
        self.days
            .iter()
            .flat_map(|day| day.exercises.iter().map(|ex| ex.name.to_lowercase()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_part_parse_is_case_insensitive() {
        assert_eq!(BodyPart::parse("quadriceps"), Some(BodyPart::Quadriceps));
        assert_eq!(BodyPart::parse(" LOWER BACK "), Some(BodyPart::LowerBack));
        assert_eq!(BodyPart::parse("None"), None);
        assert_eq!(BodyPart::parse("spleen"), None);
    }

    #[test]
    fn test_clamp_days() {
        assert_eq!(UserProfile::clamp_days(Some(4)), 4);
        assert_eq!(UserProfile::clamp_days(Some(0)), 1);
        assert_eq!(UserProfile::clamp_days(Some(12)), 7);
        assert_eq!(UserProfile::clamp_days(None), 3);
    }

    #[test]
    fn test_reps_accepts_count_or_text() {
        let counted: PlanExercise = serde_json::from_str(
            r#"{"name": "Squat", "sets": 3, "reps": 12}"#,
        )
        .unwrap();
        assert_eq!(counted.reps, Reps::Count(12));

        let ranged: PlanExercise = serde_json::from_str(
            r#"{"name": "Plank", "sets": 3, "reps": "30 seconds"}"#,
        )
        .unwrap();
        assert_eq!(ranged.reps, Reps::Text("30 seconds".to_owned()));
    }

    #[test]
    fn test_plan_day_uses_day_key() {
        let plan: WorkoutPlan = serde_json::from_str(
            r#"{"days": [{"day": "Day 1", "exercises": [{"name": "Squat", "sets": 3, "reps": 12}]}]}"#,
        )
        .unwrap();
        assert_eq!(plan.days[0].label, "Day 1");

        let out = serde_json::to_value(&plan).unwrap();
        assert_eq!(out["days"][0]["day"], "Day 1");
        // unhydrated assignments serialize without catalog fields
        assert!(out["days"][0]["exercises"][0].get("bodyPart").is_none());
    }

    #[test]
    fn test_exercise_record_accepts_catalog_aliases() {
        let record: ExerciseRecord = serde_json::from_str(
            r#"{"Title": "Push-ups", "BodyPart": "Chest", "Equipment": "Body Only",
                "Level": "Beginner", "Type": "Strength", "Desc": "Classic push-up",
                "embedding": [1.0, 0.0, 0.0]}"#,
        )
        .unwrap();
        assert_eq!(record.title, "Push-ups");
        assert_eq!(record.body_part, "Chest");
        assert_eq!(record.embedding.as_deref(), Some(&[1.0, 0.0, 0.0][..]));
    }
}
