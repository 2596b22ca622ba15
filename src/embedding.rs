// ABOUTME: Embedding provider abstraction and Hugging Face inference client
// ABOUTME: Turns free text into fixed-length query vectors for retrieval
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! # Embedding Provider
//!
//! Computing embeddings is delegated to an external provider; this crate only
//! makes request/response calls. Production uses the Hugging Face inference
//! router's feature-extraction pipeline with a sentence-transformers MiniLM
//! model (384 dimensions); tests inject fixed-vector doubles through the
//! [`Embedder`] trait.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::errors::AppError;

/// Environment variable for the Hugging Face API token
const HF_TOKEN_ENV: &str = "HUGGINGFACE_TOKEN";

/// Environment variable overriding the embedding model
const EMBEDDING_MODEL_ENV: &str = "EMBEDDING_MODEL";

/// Default sentence-transformers model (384-dimensional)
const DEFAULT_MODEL: &str = "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2";

/// Embedding provider contract
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model identifier used for embedding
    fn model(&self) -> &str;

    /// Embed a single text into a fixed-length vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError>;

    /// Embed a batch of texts, one vector per input, in order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AppError>;
}

#[derive(Debug, Serialize)]
struct FeatureExtractionRequest<T: Serialize> {
    inputs: T,
    options: FeatureExtractionOptions,
}

#[derive(Debug, Serialize)]
struct FeatureExtractionOptions {
    wait_for_model: bool,
}

/// The router returns either a flat vector or a one-per-input nested array
/// depending on the input shape
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureExtractionResponse {
    Single(Vec<f32>),
    Batch(Vec<Vec<f32>>),
}

/// Hugging Face feature-extraction client
pub struct HuggingFaceEmbedder {
    client: Client,
    token: String,
    model: String,
}

impl HuggingFaceEmbedder {
    /// Create a client with an explicit token and model
    #[must_use]
    pub fn new(token: String, model: String) -> Self {
        Self {
            client: Client::new(),
            token,
            model,
        }
    }

    /// Create a client from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if `HUGGINGFACE_TOKEN` is not set.
    pub fn from_env() -> Result<Self, AppError> {
        let token = std::env::var(HF_TOKEN_ENV).map_err(|_| {
            AppError::config(format!("Missing {HF_TOKEN_ENV} environment variable"))
        })?;
        let model =
            std::env::var(EMBEDDING_MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        Ok(Self::new(token, model))
    }

    fn api_url(&self) -> String {
        format!(
            "https://router.huggingface.co/hf-inference/models/{}/pipeline/feature-extraction",
            self.model
        )
    }

    async fn request<T: Serialize>(&self, inputs: T) -> Result<FeatureExtractionResponse, AppError> {
        let response = self
            .client
            .post(self.api_url())
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .json(&FeatureExtractionRequest {
                inputs,
                options: FeatureExtractionOptions {
                    wait_for_model: true,
                },
            })
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach Hugging Face inference API: {}", e);
                AppError::oracle_unavailable("HuggingFace", format!("Failed to connect: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::oracle_unavailable("HuggingFace", format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(AppError::oracle_unavailable(
                "HuggingFace",
                format!(
                    "API error ({}): {}",
                    status,
                    body.chars().take(200).collect::<String>()
                ),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse embedding response: {}", e);
            AppError::oracle_unavailable("HuggingFace", format!("Failed to parse response: {e}"))
        })
    }
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, text), fields(model = %self.model, chars = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
        debug!("Requesting single embedding");
        match self.request(text).await? {
            FeatureExtractionResponse::Single(vector) => Ok(vector),
            // the router wraps single inputs for some models
            FeatureExtractionResponse::Batch(mut vectors) => {
                vectors.pop().ok_or_else(|| {
                    AppError::oracle_unavailable("HuggingFace", "empty embedding response")
                })
            }
        }
    }

    #[instrument(skip(self, texts), fields(model = %self.model, batch = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AppError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!("Requesting batch embeddings");
        match self.request(texts).await? {
            FeatureExtractionResponse::Batch(vectors) if vectors.len() == texts.len() => {
                Ok(vectors)
            }
            FeatureExtractionResponse::Batch(vectors) => Err(AppError::oracle_unavailable(
                "HuggingFace",
                format!(
                    "expected {} embeddings, received {}",
                    texts.len(),
                    vectors.len()
                ),
            )),
            FeatureExtractionResponse::Single(vector) if texts.len() == 1 => Ok(vec![vector]),
            FeatureExtractionResponse::Single(_) => Err(AppError::oracle_unavailable(
                "HuggingFace",
                "flat response for a batch request",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_accepts_flat_and_nested_shapes() {
        let flat: FeatureExtractionResponse = serde_json::from_str("[0.1, 0.2, 0.3]").unwrap();
        assert!(matches!(flat, FeatureExtractionResponse::Single(v) if v.len() == 3));

        let nested: FeatureExtractionResponse =
            serde_json::from_str("[[0.1, 0.2], [0.3, 0.4]]").unwrap();
        assert!(matches!(nested, FeatureExtractionResponse::Batch(v) if v.len() == 2));
    }
}
