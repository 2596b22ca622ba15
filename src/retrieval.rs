// ABOUTME: Cosine-similarity retrieval over the exercise corpus
// ABOUTME: Applies the body-part exclusion filter and returns a stable ranked top-K
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! Nearest-neighbor retrieval over exercise embeddings.
//!
//! Pure function of the corpus snapshot and the query: no caching, no
//! mutation. Records without an embedding are never candidates; a zero-norm
//! similarity scores 0 instead of propagating NaN; a wrong-dimension query
//! degrades to an empty result rather than failing the request.

use crate::corpus::ExerciseCorpus;
use crate::models::{BodyPart, ExerciseRecord};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// One retrieved exercise with its similarity score
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// The matching catalog record
    pub record: &'a ExerciseRecord,
    /// Cosine similarity in [-1, 1]
    pub score: f32,
}

/// Cosine similarity between two equal-length vectors; 0.0 when either
/// vector has zero norm
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    let sim = dot / denom;
    if sim.is_nan() {
        0.0
    } else {
        sim
    }
}

/// Ranked retrieval over an injected corpus snapshot
#[derive(Debug, Clone, Copy)]
pub struct SimilarityRetriever<'a> {
    corpus: &'a ExerciseCorpus,
}

impl<'a> SimilarityRetriever<'a> {
    /// Create a retriever over the given corpus
    #[must_use]
    pub const fn new(corpus: &'a ExerciseCorpus) -> Self {
        Self { corpus }
    }

    /// Retrieve up to `limit` candidates ranked by cosine similarity,
    /// excluding records whose body part matches `avoid`.
    ///
    /// Ties keep catalog order (stable sort). A query whose dimension does
    /// not match the corpus embedding dimension yields an empty result.
    #[must_use]
    pub fn retrieve(
        &self,
        query: &[f32],
        avoid: Option<BodyPart>,
        limit: usize,
    ) -> Vec<Candidate<'a>> {
        if limit == 0 || query.is_empty() {
            return Vec::new();
        }
        if let Some(dimension) = self.corpus.dimension() {
            if query.len() != dimension {
                warn!(
                    query_len = query.len(),
                    corpus_dim = dimension,
                    "query vector dimension mismatch, returning no candidates"
                );
                return Vec::new();
            }
        }

        let mut candidates: Vec<Candidate<'a>> = self
            .corpus
            .records()
            .iter()
            .filter(|record| avoid.is_none_or(|part| !part.matches(&record.body_part)))
            .filter_map(|record| {
                record.embedding.as_ref().map(|embedding| Candidate {
                    record,
                    score: cosine_similarity(query, embedding),
                })
            })
            .collect();

        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        candidates.truncate(limit);

        debug!(
            returned = candidates.len(),
            limit,
            avoid = ?avoid,
            "retrieved exercise candidates"
        );
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExerciseRecord;

    fn record(title: &str, body_part: &str, embedding: Option<Vec<f32>>) -> ExerciseRecord {
        ExerciseRecord {
            id: String::new(),
            title: title.to_owned(),
            body_part: body_part.to_owned(),
            equipment: String::new(),
            level: String::new(),
            exercise_type: String::new(),
            description: String::new(),
            embedding,
        }
    }

    fn fixture_corpus() -> ExerciseCorpus {
        ExerciseCorpus::from_records(vec![
            record("Push-ups", "Chest", Some(vec![1.0, 0.0, 0.0])),
            record("Squat", "Quadriceps", Some(vec![0.0, 1.0, 0.0])),
            record("Plank", "Abdominals", Some(vec![0.0, 0.0, 1.0])),
        ])
    }

    #[test]
    fn test_top_match_ranks_first() {
        let corpus = fixture_corpus();
        let retriever = SimilarityRetriever::new(&corpus);
        let results = retriever.retrieve(&[0.0, 1.0, 0.0], None, 2);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].record.title, "Squat");
        assert!((results[0].score - 1.0).abs() < 1e-6);
        assert!(results[1].score.abs() < 1e-6);
    }

    #[test]
    fn test_avoided_body_part_is_excluded() {
        let corpus = fixture_corpus();
        let retriever = SimilarityRetriever::new(&corpus);
        let results = retriever.retrieve(&[0.0, 1.0, 0.0], Some(BodyPart::Quadriceps), 3);

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|c| c.record.title != "Squat"));
    }

    #[test]
    fn test_records_without_embeddings_never_returned() {
        let corpus = ExerciseCorpus::from_records(vec![
            record("Squat", "Quadriceps", Some(vec![0.0, 1.0, 0.0])),
            record("Lunge", "Quadriceps", None),
        ]);
        let retriever = SimilarityRetriever::new(&corpus);
        let results = retriever.retrieve(&[0.0, 1.0, 0.0], None, 5);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.title, "Squat");
    }

    #[test]
    fn test_scores_descend_and_result_is_bounded() {
        let corpus = fixture_corpus();
        let retriever = SimilarityRetriever::new(&corpus);
        let results = retriever.retrieve(&[0.5, 0.5, 0.0], None, 2);

        assert_eq!(results.len(), 2);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_short_result_when_few_survive() {
        let corpus = fixture_corpus();
        let retriever = SimilarityRetriever::new(&corpus);
        let results = retriever.retrieve(&[1.0, 0.0, 0.0], Some(BodyPart::Chest), 10);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_dimension_mismatch_degrades_to_empty() {
        let corpus = fixture_corpus();
        let retriever = SimilarityRetriever::new(&corpus);
        assert!(retriever.retrieve(&[1.0, 0.0], None, 5).is_empty());
    }

    #[test]
    fn test_zero_norm_query_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        let corpus = fixture_corpus();
        let retriever = SimilarityRetriever::new(&corpus);
        let results = retriever.retrieve(&[0.0, 0.0, 0.0], None, 3);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|c| c.score == 0.0));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let corpus = fixture_corpus();
        let retriever = SimilarityRetriever::new(&corpus);
        let results = retriever.retrieve(&[0.0, 1.0, 0.0], None, 3);
        // Push-ups and Plank both score 0; catalog order breaks the tie
        assert_eq!(results[1].record.title, "Push-ups");
        assert_eq!(results[2].record.title, "Plank");
    }
}
