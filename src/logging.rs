// ABOUTME: Logging configuration and structured logging setup
// ABOUTME: Configures log levels and output formats from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! Production-ready logging configuration with structured output

use anyhow::Result;
use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format options
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    /// JSON format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl LogFormat {
    fn from_env() -> Self {
        match env::var("LOG_FORMAT").unwrap_or_default().to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter directive (`LOG_LEVEL`, e.g. "info" or "fitpro_server=debug")
    pub level: String,
    /// Output format (`LOG_FORMAT`: json, pretty, compact)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_owned()),
            format: LogFormat::from_env(),
        }
    }
}

/// Initialize the global tracing subscriber from the environment.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed.
pub fn init() -> Result<()> {
    init_with(&LoggingConfig::default())
}

/// Initialize the global tracing subscriber with an explicit configuration.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed.
pub fn init_with(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init()?,
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init()?,
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init()?,
    }
    Ok(())
}
