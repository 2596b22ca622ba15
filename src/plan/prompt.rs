// ABOUTME: Prompt builders for plan synthesis and plan updates
// ABOUTME: Embeds hard constraints the oracle must obey into the request text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! Assembles the structured synthesis requests sent to the oracle. The
//! constraints are non-negotiable: exact day count, exercise universe
//! restricted to the retrieved candidates, JSON-only output matching the
//! [`WorkoutPlan`](crate::models::WorkoutPlan) shape, no prose.

use crate::errors::AppError;
use crate::llm::{ChatMessage, ChatRequest};
use crate::models::{UserProfile, WorkoutPlan};
use crate::retrieval::Candidate;
use std::fmt::Write as _;

/// A fully assembled oracle request for plan synthesis
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Messages sent to the oracle
    pub request: ChatRequest,
    /// Lowercased titles of the candidate universe; validation scope
    pub candidate_titles: Vec<String>,
    /// Day count the plan must have
    pub expected_days: usize,
}

fn candidate_context(candidates: &[Candidate<'_>]) -> String {
    let mut context = String::new();
    for candidate in candidates {
        let record = candidate.record;
        let _ = write!(
            context,
            "---\nExercise: {}\nFocus: {}\nDescription: {}\n\n",
            record.title, record.body_part, record.description
        );
    }
    context.trim_end().to_owned()
}

const OUTPUT_SHAPE: &str = r#"{
  "days": [
    {
      "day": "Day 1",
      "exercises": [
        { "name": "Squat", "sets": 3, "reps": 12 }
      ]
    }
  ]
}"#;

/// Build the synthesis request for a fresh plan.
///
/// # Errors
///
/// Returns an invalid-input error when `candidates` is empty; the oracle is
/// never invoked with zero usable exercises.
pub fn build(
    profile: &UserProfile,
    candidates: &[Candidate<'_>],
    requested_days: usize,
) -> Result<SynthesisRequest, AppError> {
    if candidates.is_empty() {
        return Err(AppError::invalid_input(
            "No usable candidate exercises for this profile",
        ));
    }

    let injury = if profile.injury.trim().is_empty() {
        "None"
    } else {
        profile.injury.trim()
    };

    let prompt = format!(
        "You are a professional personal trainer.\n\
         \n\
         STRICT RULES:\n\
         - Create a workout plan with EXACTLY {requested_days} workout days\n\
         - The \"days\" array length MUST be {requested_days}\n\
         - Make a workout plan that suits the user's needs\n\
         - Match exercises to the user's goal\n\
         - Do not repeat an exercise unnecessarily\n\
         - If the user wants to avoid a body part, replace with another muscle\n\
         - Return ONLY valid JSON (Very Important)\n\
         - English only\n\
         - No explanation text\n\
         - Only use exercise names from the following list\n\
         \n\
         Exercise List:\n\
         {context}\n\
         \n\
         User's Information:\n\
         - age: {age}\n\
         - weight: {weight} kg\n\
         - height: {height} cm\n\
         - goal: {goal}\n\
         - injury: {injury}\n\
         - free time: {minutes} minute/day\n\
         - additional: {preference}\n\
         \n\
         OUTPUT FORMAT EXACTLY JSON:\n\
         {shape}",
        context = candidate_context(candidates),
        age = profile.age,
        weight = profile.weight,
        height = profile.height,
        goal = profile.goal,
        minutes = profile.available_minutes_per_day,
        preference = profile.preference,
        shape = OUTPUT_SHAPE,
    );

    let request = ChatRequest::new(vec![
        ChatMessage::system("You are a professional fitness trainer."),
        ChatMessage::user(prompt),
    ]);

    Ok(SynthesisRequest {
        request,
        candidate_titles: candidates
            .iter()
            .map(|c| c.record.title.to_lowercase())
            .collect(),
        expected_days: requested_days,
    })
}

/// Build the re-synthesis request for a natural-language plan update.
///
/// The current plan is embedded verbatim; the rules guarantee no day is
/// emptied and every day keeps 2-4 exercises.
///
/// # Errors
///
/// Returns an error if the current plan cannot be serialized.
pub fn build_update(current: &WorkoutPlan, instruction: &str) -> Result<ChatRequest, AppError> {
    let current_json = serde_json::to_string(current)
        .map_err(|e| AppError::internal(format!("Cannot serialize current plan: {e}")))?;

    let prompt = format!(
        "You are updating a workout plan.\n\
         You are a professional personal trainer.\n\
         STRICT RULES:\n\
         - Never remove all exercises from a day\n\
         - If an exercise is removed, REPLACE it with a suitable alternative\n\
         - Keep at least 2-4 exercises per day\n\
         - Keep the same number of days as the input plan\n\
         - Match replacement exercises to the user's goal\n\
         - If the user wants to avoid a body part, replace with another muscle\n\
         - Return ONLY valid JSON\n\
         - Same structure as input\n\
         - English only\n\
         - No explanation text\n\
         \n\
         CURRENT PLAN:\n\
         {current_json}\n\
         \n\
         USER REQUEST:\n\
         \"{instruction}\"\n\
         \n\
         OUTPUT FORMAT EXACTLY:\n\
         {OUTPUT_SHAPE}"
    );

    Ok(ChatRequest::new(vec![
        ChatMessage::system("Workout plan editor (JSON only)"),
        ChatMessage::user(prompt),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::ExerciseCorpus;
    use crate::models::ExerciseRecord;
    use crate::retrieval::SimilarityRetriever;

    fn fixture_corpus() -> ExerciseCorpus {
        ExerciseCorpus::from_records(vec![
            ExerciseRecord {
                id: String::new(),
                title: "Squat".to_owned(),
                body_part: "Quadriceps".to_owned(),
                equipment: "Barbell".to_owned(),
                level: "Intermediate".to_owned(),
                exercise_type: "Strength".to_owned(),
                description: "Back squat".to_owned(),
                embedding: Some(vec![0.0, 1.0, 0.0]),
            },
            ExerciseRecord {
                id: String::new(),
                title: "Plank".to_owned(),
                body_part: "Abdominals".to_owned(),
                equipment: "Body Only".to_owned(),
                level: "Beginner".to_owned(),
                exercise_type: "Strength".to_owned(),
                description: "Isometric hold".to_owned(),
                embedding: Some(vec![0.0, 0.0, 1.0]),
            },
        ])
    }

    fn profile() -> UserProfile {
        UserProfile {
            age: 30,
            weight: 70.0,
            height: 175.0,
            goal: "build muscle".to_owned(),
            injury: String::new(),
            preference: "home workouts".to_owned(),
            available_minutes_per_day: 45,
            requested_days: 4,
        }
    }

    #[test]
    fn test_build_embeds_constraints_and_candidates() {
        let corpus = fixture_corpus();
        let candidates = SimilarityRetriever::new(&corpus).retrieve(&[0.0, 1.0, 0.0], None, 7);
        let synthesis = build(&profile(), &candidates, 4).unwrap();

        let user_message = &synthesis.request.messages[1].content;
        assert!(user_message.contains("EXACTLY 4 workout days"));
        assert!(user_message.contains("Exercise: Squat"));
        assert!(user_message.contains("Focus: Abdominals"));
        assert!(user_message.contains("injury: None"));
        assert_eq!(synthesis.expected_days, 4);
        assert_eq!(synthesis.candidate_titles, vec!["squat", "plank"]);
    }

    #[test]
    fn test_build_rejects_empty_candidate_set() {
        let err = build(&profile(), &[], 3).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::InvalidInput);
    }

    #[test]
    fn test_update_prompt_embeds_current_plan_verbatim() {
        let plan: WorkoutPlan = serde_json::from_str(
            r#"{"days": [{"day": "Day 1", "exercises": [{"name": "Squat", "sets": 3, "reps": 12}]}]}"#,
        )
        .unwrap();
        let request = build_update(&plan, "swap squats for lunges").unwrap();

        let user_message = &request.messages[1].content;
        assert!(user_message.contains(r#""name":"Squat""#));
        assert!(user_message.contains("swap squats for lunges"));
        assert!(user_message.contains("Never remove all exercises from a day"));
    }
}
