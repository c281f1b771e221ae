//! Structured-record extraction from raw model text
//!
//! The prompt asks for bare JSON, but models routinely wrap the record in
//! a markdown fence and sometimes add prose around it. Extraction handles
//! three shapes in priority order: a ```json-tagged fence, any untagged
//! fence, and raw text. Anything that still fails to parse is a
//! malformed response, never silently replaced with a default record.

use serde_json::Value;

use crate::error::DiagnosisError;

const TAGGED_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Recover the structured record from raw model output.
///
/// Returns the parsed JSON value; the typed mapping happens in assembly so
/// that "not JSON at all" and "JSON missing required fields" stay
/// distinguishable failures.
pub fn extract_record(raw: &str) -> Result<Value, DiagnosisError> {
    let trimmed = raw.trim();

    let candidate = if let Some(inner) = fenced_content(trimmed, TAGGED_FENCE) {
        inner
    } else if let Some(inner) = fenced_content(trimmed, FENCE) {
        inner
    } else {
        trimmed
    };

    serde_json::from_str(candidate).map_err(|e| DiagnosisError::MalformedResponse {
        reason: e.to_string(),
        raw: raw.to_string(),
    })
}

/// Content strictly between the first `opening` marker and the next fence,
/// or to the end of text when the model forgot to close the fence.
fn fenced_content<'a>(text: &'a str, opening: &str) -> Option<&'a str> {
    let start = text.find(opening)? + opening.len();
    let rest = &text[start..];
    let content = match rest.find(FENCE) {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(content.trim())
}
