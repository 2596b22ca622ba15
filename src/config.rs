// ABOUTME: Environment-based server configuration
// ABOUTME: Loads ports, catalog path, and oracle client tuning from env variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! Environment-only configuration. A `.env` file is honored when present;
//! every knob has a default so a bare environment still boots (provider API
//! keys are validated by the providers themselves at construction).

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Default HTTP port
const DEFAULT_HTTP_PORT: u16 = 8080;
/// Default catalog location
const DEFAULT_CATALOG_PATH: &str = "data/exercises.json";
/// Default per-call oracle deadline in seconds
const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 30;
/// Default oracle retry budget (attempts after the first)
const DEFAULT_ORACLE_MAX_RETRIES: u32 = 2;

fn env_var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port (`HTTP_PORT`)
    pub http_port: u16,
    /// Exercise catalog JSON path (`EXERCISE_CATALOG_PATH`)
    pub catalog_path: PathBuf,
    /// Per-call oracle deadline (`ORACLE_TIMEOUT_SECS`)
    pub oracle_timeout: Duration,
    /// Oracle retry budget after the first attempt (`ORACLE_MAX_RETRIES`)
    pub oracle_max_retries: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a set variable fails to parse.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let config = Self {
            http_port: env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            catalog_path: PathBuf::from(env_var_or(
                "EXERCISE_CATALOG_PATH",
                DEFAULT_CATALOG_PATH,
            )),
            oracle_timeout: Duration::from_secs(
                env_var_or(
                    "ORACLE_TIMEOUT_SECS",
                    &DEFAULT_ORACLE_TIMEOUT_SECS.to_string(),
                )
                .parse()
                .context("Invalid ORACLE_TIMEOUT_SECS value")?,
            ),
            oracle_max_retries: env_var_or(
                "ORACLE_MAX_RETRIES",
                &DEFAULT_ORACLE_MAX_RETRIES.to_string(),
            )
            .parse()
            .context("Invalid ORACLE_MAX_RETRIES value")?,
        };

        info!(
            port = config.http_port,
            catalog = %config.catalog_path.display(),
            "configuration loaded"
        );
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            oracle_timeout: Duration::from_secs(DEFAULT_ORACLE_TIMEOUT_SECS),
            oracle_max_retries: DEFAULT_ORACLE_MAX_RETRIES,
        }
    }
}
