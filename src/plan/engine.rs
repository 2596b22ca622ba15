// ABOUTME: Plan engine orchestrating the generation and update pipelines
// ABOUTME: Classify, embed, retrieve, synthesize, validate, hydrate in strict order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! The single entry point for plan work. Stateless between requests: the
//! corpus is a shared read-only snapshot, every other value lives for one
//! request. Either a fully validated and hydrated plan comes back, or an
//! error; a partial plan is never returned.

use std::sync::Arc;
use tracing::{info, instrument};

use super::{avoidance, hydrate, prompt, synthesis, validate};
use crate::corpus::ExerciseCorpus;
use crate::embedding::Embedder;
use crate::errors::AppError;
use crate::llm::{ChatMessage, ChatRequest, OracleClient};
use crate::models::{UserProfile, WorkoutPlan};
use crate::retrieval::SimilarityRetriever;

/// Tunables for the synthesis calls
#[derive(Debug, Clone)]
pub struct PlanSettings {
    /// Candidate exercises retrieved per request
    pub candidate_limit: usize,
    /// Temperature for synthesis completions
    pub temperature: f32,
    /// Token budget for synthesis completions
    pub synthesis_max_tokens: u32,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            candidate_limit: 7,
            temperature: 0.7,
            synthesis_max_tokens: 900,
        }
    }
}

/// Orchestrates plan generation and updates over injected collaborators
#[derive(Clone)]
pub struct PlanEngine {
    corpus: Arc<ExerciseCorpus>,
    oracle: OracleClient,
    embedder: Arc<dyn Embedder>,
    settings: PlanSettings,
}

impl PlanEngine {
    /// Create an engine over the given corpus and collaborators
    #[must_use]
    pub fn new(
        corpus: Arc<ExerciseCorpus>,
        oracle: OracleClient,
        embedder: Arc<dyn Embedder>,
        settings: PlanSettings,
    ) -> Self {
        Self {
            corpus,
            oracle,
            embedder,
            settings,
        }
    }

    /// Generate a fresh plan for the given profile.
    ///
    /// # Errors
    ///
    /// Returns an error when no candidates survive retrieval, the oracle
    /// fails, its output is malformed, or validation rejects the plan.
    #[instrument(skip(self, profile), fields(days = profile.requested_days))]
    pub async fn generate(&self, profile: &UserProfile) -> Result<WorkoutPlan, AppError> {
        let avoid = avoidance::classify(&self.oracle, &profile.injury, &profile.preference).await?;
        info!(avoid = ?avoid, "avoidance classification complete");

        let query = self.embedder.embed(&profile.retrieval_query_text()).await?;
        let retriever = SimilarityRetriever::new(&self.corpus);
        let candidates = retriever.retrieve(&query, avoid, self.settings.candidate_limit);

        let synthesis_request = prompt::build(profile, &candidates, profile.requested_days)?;
        let request = synthesis_request
            .request
            .clone()
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.synthesis_max_tokens);

        let raw_plan = synthesis::synthesize(&self.oracle, &request).await?;
        let validated = validate::validate_generated(
            raw_plan,
            synthesis_request.expected_days,
            &synthesis_request.candidate_titles,
        )?;

        Ok(hydrate::hydrate(validated, &self.corpus))
    }

    /// Apply a natural-language edit to an existing plan.
    ///
    /// The output replaces, never patches, the caller-supplied plan.
    ///
    /// # Errors
    ///
    /// Returns `OffTopicInstruction` when the intent gate rejects the
    /// instruction; otherwise the same failure modes as generation, with the
    /// no-empty-day rule enforced as a hard validation failure.
    #[instrument(skip(self, current, instruction))]
    pub async fn update(
        &self,
        current: &WorkoutPlan,
        instruction: &str,
    ) -> Result<WorkoutPlan, AppError> {
        if !self.is_workout_related(instruction).await? {
            return Err(AppError::off_topic(
                "It looks like you're asking about something else. \
                 Please provide instructions related to your workout plan.",
            ));
        }

        let request = prompt::build_update(current, instruction)?
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.synthesis_max_tokens);

        let raw_plan = synthesis::synthesize(&self.oracle, &request).await?;
        let validated = validate::validate_updated(raw_plan, current.days.len())?;

        Ok(hydrate::hydrate(validated, &self.corpus))
    }

    /// Intent gate: does the instruction ask to change a workout plan?
    async fn is_workout_related(&self, instruction: &str) -> Result<bool, AppError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(
                "You are a filter. Determine if the user's input is a request to modify, \
                 add, remove, or change a workout plan. Respond with ONLY 'true' or 'false'.",
            ),
            ChatMessage::user(format!("Instruction: \"{instruction}\"")),
        ])
        .with_max_tokens(5);

        let response = self.oracle.complete(&request).await?;
        Ok(parse_intent(&response.content))
    }

    /// Corpus backing this engine
    #[must_use]
    pub fn corpus(&self) -> &ExerciseCorpus {
        &self.corpus
    }
}

/// Interpret the intent gate's reply; anything containing "true"
/// (case-insensitive) counts as workout-related
#[must_use]
pub fn parse_intent(reply: &str) -> bool {
    reply.to_lowercase().contains("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intent() {
        assert!(parse_intent("true"));
        assert!(parse_intent(" True."));
        assert!(parse_intent("TRUE, this is a workout request"));
        assert!(!parse_intent("false"));
        assert!(!parse_intent("no idea"));
    }
}
