// ABOUTME: Plan synthesis client: oracle invocation plus JSON extraction and decoding
// ABOUTME: Isolates the failure-prone free-text-to-JSON boundary behind one function
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! Drives the oracle to produce a plan and parses its reply. The reply is
//! advisory free text: code fences and surrounding prose are stripped, the
//! first top-level JSON object is located, and the result is decoded through
//! the strict [`WorkoutPlan`] schema. Anything else is `MalformedOracleOutput`.

use tracing::{debug, instrument};

use crate::errors::AppError;
use crate::llm::{ChatRequest, OracleClient};
use crate::models::WorkoutPlan;

/// Locate the first top-level JSON object in free text.
///
/// Handles fenced code blocks, leading prose, and trailing prose. Returns
/// the balanced `{...}` slice, respecting string literals and escapes.
#[must_use]
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse an oracle reply into a [`WorkoutPlan`].
///
/// # Errors
///
/// Returns `MalformedOracleOutput` when no JSON object is found or the
/// object does not decode as the plan schema (missing `days`, missing
/// per-day `exercises`, wrong types).
pub fn parse_plan(raw: &str) -> Result<WorkoutPlan, AppError> {
    let json = extract_json(raw).ok_or_else(|| {
        AppError::malformed_output(format!(
            "No JSON object in oracle reply: {}",
            raw.chars().take(120).collect::<String>()
        ))
    })?;

    let plan: WorkoutPlan = serde_json::from_str(json)
        .map_err(|e| AppError::malformed_output(format!("Plan does not match schema: {e}")))?;

    if plan.days.is_empty() {
        return Err(AppError::malformed_output("Plan has no days"));
    }
    Ok(plan)
}

/// One oracle round-trip producing an unvalidated plan.
///
/// # Errors
///
/// Propagates oracle transport errors and malformed-output parse failures.
#[instrument(skip(oracle, request))]
pub async fn synthesize(
    oracle: &OracleClient,
    request: &ChatRequest,
) -> Result<WorkoutPlan, AppError> {
    let response = oracle.complete(request).await?;
    debug!(chars = response.content.len(), "oracle synthesis reply received");
    parse_plan(&response.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    const PLAN_JSON: &str = r#"{"days": [{"day": "Day 1", "exercises": [{"name": "Squat", "sets": 3, "reps": 12}, {"name": "Plank", "sets": 3, "reps": "30 seconds"}]}]}"#;

    #[test]
    fn test_extract_bare_object() {
        assert_eq!(extract_json(PLAN_JSON), Some(PLAN_JSON));
    }

    #[test]
    fn test_extract_from_fenced_code_block() {
        let fenced = format!("```json\n{PLAN_JSON}\n```");
        assert_eq!(extract_json(&fenced), Some(PLAN_JSON));
    }

    #[test]
    fn test_extract_with_leading_and_trailing_prose() {
        let wrapped = format!("Here is your plan!\n{PLAN_JSON}\nStay consistent!");
        assert_eq!(extract_json(&wrapped), Some(PLAN_JSON));
    }

    #[test]
    fn test_extract_ignores_braces_inside_strings() {
        let tricky = r#"{"days": [{"day": "Day {1}", "exercises": [{"name": "a \"b\"", "sets": 1, "reps": 1}]}]}"#;
        assert_eq!(extract_json(tricky), Some(tricky));
    }

    #[test]
    fn test_extract_none_without_json() {
        assert_eq!(extract_json("no plan here"), None);
        assert_eq!(extract_json("unbalanced { \"days\": ["), None);
    }

    #[test]
    fn test_parse_happy_path() {
        let plan = parse_plan(&format!("```json\n{PLAN_JSON}\n```")).unwrap();
        assert_eq!(plan.days.len(), 1);
        assert_eq!(plan.days[0].exercises.len(), 2);
    }

    #[test]
    fn test_parse_missing_days_key_is_malformed() {
        let err = parse_plan(r#"{"plan": []}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedOracleOutput);
    }

    #[test]
    fn test_parse_missing_exercises_key_is_malformed() {
        let err = parse_plan(r#"{"days": [{"day": "Day 1"}]}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedOracleOutput);
    }

    #[test]
    fn test_parse_empty_days_is_malformed() {
        let err = parse_plan(r#"{"days": []}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedOracleOutput);
    }

    #[test]
    fn test_parse_prose_only_is_malformed() {
        let err = parse_plan("I cannot create a plan right now.").unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedOracleOutput);
    }
}
