// ABOUTME: System prompts for LLM interactions loaded at compile time
// ABOUTME: Provides the FitPro coach persona used by the chat endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! # System Prompts
//!
//! Static prompts are loaded at compile time from markdown files for easy
//! maintenance. Dynamic prompts (plan synthesis, avoidance classification)
//! are built per request in `plan::prompt` and `plan::avoidance`.

/// FitPro AI Coach persona for the free-chat endpoint
pub const COACH_SYSTEM_PROMPT: &str = include_str!("coach_system.md");

/// Get the system prompt for the chat coach persona
#[must_use]
pub const fn coach_system_prompt() -> &'static str {
    COACH_SYSTEM_PROMPT
}
