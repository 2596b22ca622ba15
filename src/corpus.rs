// ABOUTME: Immutable exercise catalog loaded once at process start
// ABOUTME: Provides case-insensitive title lookup and embedding dimension checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! The exercise corpus: a read-only snapshot of the catalog shared by every
//! request. Constructed explicitly and injected into the retriever and
//! hydrator, so tests can substitute a small fixture corpus.

use crate::errors::AppError;
use crate::models::ExerciseRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// Immutable, process-lifetime collection of exercise records.
///
/// Safe to share across concurrent requests without synchronization.
#[derive(Debug)]
pub struct ExerciseCorpus {
    records: Vec<ExerciseRecord>,
    by_title: HashMap<String, usize>,
    dimension: Option<usize>,
}

impl ExerciseCorpus {
    /// Build a corpus from records already in memory.
    ///
    /// Records missing an id are assigned their catalog position. The
    /// embedding dimension is taken from the first embedded record; records
    /// whose embedding disagrees with it keep their data but are flagged so
    /// retrieval never scores them.
    #[must_use]
    pub fn from_records(mut records: Vec<ExerciseRecord>) -> Self {
        let mut dimension = None;
        for (index, record) in records.iter_mut().enumerate() {
            if record.id.is_empty() {
                record.id = index.to_string();
            }
            if let Some(embedding) = &record.embedding {
                match dimension {
                    None => dimension = Some(embedding.len()),
                    Some(dim) if dim != embedding.len() => {
                        warn!(
                            title = %record.title,
                            expected = dim,
                            actual = embedding.len(),
                            "dropping embedding with mismatched dimension"
                        );
                        record.embedding = None;
                    }
                    Some(_) => {}
                }
            }
        }

        let by_title = records
            .iter()
            .enumerate()
            .map(|(index, record)| (record.title.to_lowercase(), index))
            .collect();

        Self {
            records,
            by_title,
            dimension,
        }
    }

    /// Load the corpus from a JSON catalog file (an array of records).
    ///
    /// # Errors
    ///
    /// Returns a config error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            AppError::config(format!("Cannot open exercise catalog {}: {e}", path.display()))
        })?;
        let records: Vec<ExerciseRecord> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                AppError::config(format!(
                    "Cannot parse exercise catalog {}: {e}",
                    path.display()
                ))
            })?;

        let corpus = Self::from_records(records);
        info!(
            records = corpus.len(),
            embedded = corpus.embedded_count(),
            dimension = ?corpus.dimension(),
            "exercise catalog loaded"
        );
        Ok(corpus)
    }

    /// All records, in catalog order
    #[must_use]
    pub fn records(&self) -> &[ExerciseRecord] {
        &self.records
    }

    /// Case-insensitive lookup by exercise title
    #[must_use]
    pub fn find_by_title(&self, title: &str) -> Option<&ExerciseRecord> {
        self.by_title
            .get(&title.trim().to_lowercase())
            .map(|&index| &self.records[index])
    }

    /// Embedding dimension, if any record carries an embedding
    #[must_use]
    pub const fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Number of records in the catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records carrying a usable embedding
    #[must_use]
    pub fn embedded_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.embedding.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn record(title: &str, body_part: &str, embedding: Option<Vec<f32>>) -> ExerciseRecord {
        ExerciseRecord {
            id: String::new(),
            title: title.to_owned(),
            body_part: body_part.to_owned(),
            equipment: "Body Only".to_owned(),
            level: "Beginner".to_owned(),
            exercise_type: "Strength".to_owned(),
            description: format!("{title} description"),
            embedding,
        }
    }

    #[test]
    fn test_title_lookup_is_case_insensitive() {
        let corpus = ExerciseCorpus::from_records(vec![record("Push-ups", "Chest", None)]);
        assert!(corpus.find_by_title("push-ups").is_some());
        assert!(corpus.find_by_title("  PUSH-UPS ").is_some());
        assert!(corpus.find_by_title("pull-ups").is_none());
    }

    #[test]
    fn test_ids_assigned_from_position() {
        let corpus = ExerciseCorpus::from_records(vec![
            record("Squat", "Quadriceps", None),
            record("Plank", "Abdominals", None),
        ]);
        assert_eq!(corpus.records()[0].id, "0");
        assert_eq!(corpus.records()[1].id, "1");
    }

    #[test]
    fn test_mismatched_embedding_dimension_is_dropped() {
        let corpus = ExerciseCorpus::from_records(vec![
            record("Squat", "Quadriceps", Some(vec![0.0, 1.0, 0.0])),
            record("Plank", "Abdominals", Some(vec![1.0])),
        ]);
        assert_eq!(corpus.dimension(), Some(3));
        assert_eq!(corpus.embedded_count(), 1);
    }

    #[test]
    fn test_load_accepts_catalog_field_names() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"Title": "Squat", "BodyPart": "Quadriceps", "Equipment": "Barbell",
                 "Level": "Intermediate", "Type": "Strength", "Desc": "Back squat",
                 "embedding": [0.0, 1.0, 0.0]}}]"#
        )
        .unwrap();

        let corpus = ExerciseCorpus::load(file.path()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.dimension(), Some(3));
        assert_eq!(corpus.find_by_title("squat").unwrap().body_part, "Quadriceps");
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = ExerciseCorpus::load("/nonexistent/catalog.json").unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::Config);
    }
}
