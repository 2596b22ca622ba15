// ABOUTME: Catalog embedding seeder producing the enriched exercise catalog
// ABOUTME: Batch-embeds exercise descriptions through a token-bucket rate limiter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! # Embedding Seeder
//!
//! Reads a raw exercise catalog (no embeddings), embeds each record's text
//! through the Hugging Face provider in small batches, and writes the
//! enriched catalog the server loads at startup.
//!
//! Usage:
//! ```bash
//! # Default paths and rate
//! cargo run --bin seed-embeddings
//!
//! # Explicit input/output and a slower request rate
//! cargo run --bin seed-embeddings -- \
//!     --input data/exercises_raw.json \
//!     --output data/exercises.json \
//!     --requests-per-minute 6
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use fitpro_server::{
    embedding::{Embedder, HuggingFaceEmbedder},
    logging,
    models::ExerciseRecord,
    ratelimit::TokenBucket,
};
use std::fs;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "seed-embeddings",
    about = "FitPro catalog embedding seeder",
    long_about = "Embed the exercise catalog through the configured embedding provider"
)]
struct SeedArgs {
    /// Raw catalog JSON path
    #[arg(long, default_value = "data/exercises_raw.json")]
    input: String,

    /// Enriched catalog output path
    #[arg(long, default_value = "data/exercises.json")]
    output: String,

    /// Records embedded per provider call
    #[arg(long, default_value_t = 5)]
    batch_size: usize,

    /// Provider request budget per minute
    #[arg(long, default_value_t = 10)]
    requests_per_minute: u32,

    /// Re-embed records that already carry an embedding
    #[arg(long)]
    force: bool,
}

/// Text embedded for one catalog record; this exact shape is what the
/// server-side query vectors are compared against
fn embedding_text(record: &ExerciseRecord) -> String {
    format!(
        "Title: {}\nBody Part: {}\nEquipment: {}\nLevel: {}\nType: {}\nDescription: {}",
        record.title,
        record.body_part,
        record.equipment,
        record.level,
        record.exercise_type,
        record.description
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init()?;
    let args = SeedArgs::parse();

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("Cannot read catalog {}", args.input))?;
    let mut records: Vec<ExerciseRecord> =
        serde_json::from_str(&raw).with_context(|| format!("Cannot parse catalog {}", args.input))?;

    info!(records = records.len(), "catalog loaded");

    let embedder = HuggingFaceEmbedder::from_env()?;
    info!(model = embedder.model(), "embedding provider ready");

    let capacity = f64::from(args.requests_per_minute.max(1));
    let mut bucket = TokenBucket::new(capacity, capacity / 60.0);

    let pending: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| args.force || record.embedding.is_none())
        .map(|(index, _)| index)
        .collect();
    info!(pending = pending.len(), "records to embed");

    let mut embedded = 0usize;
    for chunk in pending.chunks(args.batch_size.max(1)) {
        bucket.acquire(1.0).await;

        let texts: Vec<String> = chunk
            .iter()
            .map(|&index| embedding_text(&records[index]))
            .collect();
        let vectors = embedder.embed_batch(&texts).await?;

        for (&index, vector) in chunk.iter().zip(vectors) {
            records[index].embedding = Some(vector);
            embedded += 1;
        }
        info!(embedded, total = pending.len(), "batch complete");
    }

    let output = serde_json::to_string_pretty(&records).context("Cannot serialize catalog")?;
    fs::write(&args.output, output)
        .with_context(|| format!("Cannot write catalog {}", args.output))?;

    info!(path = %args.output, records = records.len(), embedded, "enriched catalog written");
    Ok(())
}
