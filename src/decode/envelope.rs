//! Envelope decoding

use super::types::PageOutcome;
use crate::error::{Error, Result};
use crate::pagination::PageResult;
use crate::types::{JsonObject, JsonValue};
use reqwest::StatusCode;

/// Extract the message of an upstream error envelope
///
/// Handles both shapes upstream uses:
/// - Web API: `{"error": {"status": 401, "message": "..."}}`
/// - Accounts: `{"error": "invalid_grant", "error_description": "..."}`
pub fn error_message(body: &JsonValue) -> Option<String> {
    let error = body.get("error")?;
    match error {
        JsonValue::Null => None,
        JsonValue::String(code) => Some(
            body.get("error_description")
                .and_then(JsonValue::as_str)
                .filter(|description| !description.is_empty())
                .unwrap_or(code.as_str())
                .to_string(),
        ),
        JsonValue::Object(fields) => Some(
            fields
                .get("message")
                .and_then(JsonValue::as_str)
                .map_or_else(|| error.to_string(), str::to_string),
        ),
        other => Some(other.to_string()),
    }
}

/// Classify a collection response as page, rejection or malformed
///
/// An error envelope wins regardless of status. A non-2xx response
/// without one is a transport failure, as is a 2xx body without `items`.
pub fn decode_page(status: StatusCode, body: &JsonValue) -> Result<PageOutcome> {
    if let Some(message) = error_message(body) {
        return Ok(PageOutcome::rejected(status.as_u16(), message));
    }

    if !status.is_success() {
        return Err(Error::http_status(status.as_u16(), body.to_string()));
    }

    let envelope = body
        .as_object()
        .ok_or_else(|| Error::decode("Collection envelope is not an object"))?;
    Ok(PageOutcome::Page(page_from_envelope(envelope)?))
}

fn page_from_envelope(envelope: &JsonObject) -> Result<PageResult> {
    let items = envelope
        .get("items")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| Error::decode("Collection envelope has no items array"))?
        .clone();

    let total = envelope
        .get("total")
        .and_then(JsonValue::as_u64)
        .unwrap_or(items.len() as u64);

    let next = envelope
        .get("next")
        .and_then(JsonValue::as_str)
        .filter(|next| !next.is_empty())
        .map(str::to_string);

    Ok(PageResult::new(items, total, next))
}
