// ABOUTME: Avoidance classifier mapping injury/preference text to a body-part label
// ABOUTME: Normalizes the untrusted oracle reply against the fixed label set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! Turns a free-text injury or preference statement into at most one
//! body-part-to-avoid label. The oracle reply is free text and untrusted:
//! it is trimmed, stripped of quoting, and matched exactly against the
//! enumeration; anything else falls back to "none".

use tracing::{debug, instrument};

use crate::errors::AppError;
use crate::llm::{ChatMessage, ChatRequest, OracleClient};
use crate::models::BodyPart;

/// Token budget for the single-label classification reply
const CLASSIFY_MAX_TOKENS: u32 = 20;

fn label_list() -> String {
    let names: Vec<String> = BodyPart::ALL
        .iter()
        .map(|part| format!("'{part}'"))
        .collect();
    names.join(", ")
}

fn classification_prompt(injury: &str, preference: &str) -> String {
    format!(
        "The user says they have this injury: \"{injury}\" or preference: \"{preference}\".\n\
         Which body part should they avoid exercising?\n\
         Choose ONLY ONE from this list:\n\
         [{}].\n\
         If no specific body part should be avoided, return \"None\".\n\
         Return ONLY the body part name or \"None\".",
        label_list()
    )
}

/// Normalize an oracle reply into a label, or `None` when the reply is
/// "none" or does not match the enumeration
#[must_use]
pub fn parse_label(reply: &str) -> Option<BodyPart> {
    let cleaned = reply.trim().trim_matches(['"', '\'', '.', '`']).trim();
    if cleaned.eq_ignore_ascii_case("none") {
        return None;
    }
    BodyPart::parse(cleaned)
}

/// Classify which body part, if any, the user should avoid.
///
/// # Errors
///
/// Returns an error only when the oracle call itself fails; an
/// unrecognizable reply degrades to no avoidance.
#[instrument(skip(oracle, injury, preference))]
pub async fn classify(
    oracle: &OracleClient,
    injury: &str,
    preference: &str,
) -> Result<Option<BodyPart>, AppError> {
    if injury.trim().is_empty() && preference.trim().is_empty() {
        return Ok(None);
    }

    let request = ChatRequest::new(vec![
        ChatMessage::system("You are a fitness expert."),
        ChatMessage::user(classification_prompt(injury, preference)),
    ])
    .with_max_tokens(CLASSIFY_MAX_TOKENS);

    let response = oracle.complete(&request).await?;
    let label = parse_label(&response.content);
    debug!(reply = %response.content.trim(), label = ?label, "avoidance classified");
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_label() {
        assert_eq!(parse_label("Quadriceps"), Some(BodyPart::Quadriceps));
    }

    #[test]
    fn test_parse_folds_case_and_whitespace() {
        assert_eq!(parse_label("  lower back \n"), Some(BodyPart::LowerBack));
    }

    #[test]
    fn test_parse_strips_quoting() {
        assert_eq!(parse_label("\"Chest\""), Some(BodyPart::Chest));
        assert_eq!(parse_label("'Biceps'."), Some(BodyPart::Biceps));
    }

    #[test]
    fn test_none_sentinel() {
        assert_eq!(parse_label("None"), None);
        assert_eq!(parse_label("\"none\""), None);
    }

    #[test]
    fn test_chatty_reply_falls_back_to_none() {
        assert_eq!(parse_label("I think you should avoid the knees."), None);
        assert_eq!(parse_label(""), None);
    }
}
