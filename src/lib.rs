// ABOUTME: Main library entry point for the FitPro workout planning backend
// ABOUTME: Wires exercise retrieval, LLM plan synthesis, and the REST API surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

#![deny(unsafe_code)]

//! # FitPro Server
//!
//! A backend for AI-assisted workout planning. Given a user profile and an
//! exercise catalog with precomputed embeddings, the server retrieves the most
//! relevant constraint-satisfying exercises by cosine similarity, drives a
//! generative LLM to produce a structured multi-day plan restricted to those
//! candidates, validates and hydrates the result against the catalog, and
//! applies natural-language edits to existing plans while preserving
//! structural invariants (no empty days, 2-4 exercises per day on update).
//!
//! ## Architecture
//!
//! - **Corpus**: immutable exercise catalog loaded once at startup
//! - **Retrieval**: cosine similarity ranking with hard body-part exclusion
//! - **LLM**: provider SPI with a Groq implementation and a timeout/retry wrapper
//! - **Plan**: prompt building, synthesis, validation, hydration, and updates
//! - **Routes**: the `/plan`, `/chat`, `/update-plan`, and `/health` endpoints
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fitpro_server::config::ServerConfig;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ServerConfig::from_env()?;
//! println!("FitPro server configured for port {}", config.http_port);
//! # Ok(())
//! # }
//! ```

/// Environment-based server configuration
pub mod config;
/// Immutable exercise catalog with embedding vectors
pub mod corpus;
/// Embedding provider abstraction and Hugging Face client
pub mod embedding;
/// Unified error handling with HTTP status mapping
pub mod errors;
/// LLM provider SPI, Groq implementation, and the oracle client wrapper
pub mod llm;
/// Structured logging configuration
pub mod logging;
/// Core data models: exercises, profiles, and workout plans
pub mod models;
/// Plan generation and update pipelines
pub mod plan;
/// Token-bucket rate limiting for batch embedding
pub mod ratelimit;
/// Shared server state injected into route handlers
pub mod resources;
/// Cosine-similarity candidate retrieval
pub mod retrieval;
/// HTTP route handlers
pub mod routes;
