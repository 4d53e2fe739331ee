//! Reply payload extraction and strict parsing.
//!
//! Models frequently wrap JSON in markdown fences or add a sentence of
//! commentary. Extraction slices the outermost `{...}` span, which handles
//! both; everything after that is strict serde deserialization, with any
//! violation reported as a malformed response.

use serde::de::DeserializeOwned;

use crate::error::{GatewayError, Result};

/// Slices the outermost JSON object span out of a model reply.
///
/// Returns `None` when no balanced-looking `{...}` span exists.
pub(crate) fn extract_payload(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parses a model reply into `T`, surfacing shape violations.
///
/// Field presence, field types, and enum membership are enforced by the
/// target type's serde implementation; callers layer count/bound checks on
/// top where serde cannot express them.
pub(crate) fn parse_reply<T: DeserializeOwned>(operation: &'static str, text: &str) -> Result<T> {
    let payload = extract_payload(text)
        .ok_or_else(|| GatewayError::malformed(operation, "no JSON object found in reply"))?;
    serde_json::from_str(payload).map_err(|e| GatewayError::malformed(operation, e.to_string()))
}
