// ABOUTME: Shared server resources injected into route handlers
// ABOUTME: Holds the corpus snapshot and the plan engine behind an Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! Process-wide state shared by all requests. Everything here is read-only
//! after construction, so the whole struct is shared by `Arc` with no locks.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::corpus::ExerciseCorpus;
use crate::embedding::Embedder;
use crate::llm::{LlmProvider, OracleClient};
use crate::plan::{PlanEngine, PlanSettings};

/// Shared state behind every route handler
pub struct ServerResources {
    /// Server configuration
    pub config: ServerConfig,
    /// Read-only exercise catalog
    pub corpus: Arc<ExerciseCorpus>,
    /// Oracle client with timeout and retry policy applied
    pub oracle: OracleClient,
    /// Plan generation/update engine
    pub engine: PlanEngine,
}

impl ServerResources {
    /// Assemble resources from a loaded corpus and collaborator providers
    #[must_use]
    pub fn new(
        config: ServerConfig,
        corpus: ExerciseCorpus,
        provider: Arc<dyn LlmProvider>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        let corpus = Arc::new(corpus);
        let oracle = OracleClient::new(provider, config.oracle_timeout, config.oracle_max_retries);
        let engine = PlanEngine::new(
            Arc::clone(&corpus),
            oracle.clone(),
            embedder,
            PlanSettings::default(),
        );
        Self {
            config,
            corpus,
            oracle,
            engine,
        }
    }
}
