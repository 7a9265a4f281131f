//! Typed decoding of an `Outcome` into entities.
//!
//! Each helper checks, in order: the captured failure, the expected status
//! (404 becomes `NotFound`), the presence of a body, and finally the JSON.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::outcome::Outcome;
use crate::types::Envelope;

/// Succeed only if the round trip completed with `expected`.
pub fn no_content(outcome: &Outcome, expected: u16) -> Result<(), ApiError> {
    if let Some(failure) = outcome.failure() {
        return Err(ApiError::Transport(failure.clone()));
    }
    match outcome.status() {
        Some(status) if status == expected => Ok(()),
        Some(404) => Err(ApiError::NotFound),
        status => Err(ApiError::HttpError {
            status: status.unwrap_or_default(),
            body: outcome.body().unwrap_or_default().to_string(),
        }),
    }
}

/// Decode a single JSON object.
pub fn entity<E: DeserializeOwned>(outcome: &Outcome, expected: u16) -> Result<E, ApiError> {
    no_content(outcome, expected)?;
    let body = outcome.body().ok_or(ApiError::MissingBody)?;
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Decode a bare JSON array, preserving order. See `elements` for how a
/// malformed element is handled.
pub fn list<E: DeserializeOwned>(outcome: &Outcome, expected: u16) -> Result<Vec<E>, ApiError> {
    let values: Vec<Value> = entity(outcome, expected)?;
    Ok(elements(values))
}

/// Decode an `{ok, data}` envelope. A missing or false `ok` yields no items.
pub fn envelope<E: DeserializeOwned>(outcome: &Outcome, expected: u16) -> Result<Vec<E>, ApiError> {
    let envelope: Envelope<Value> = entity(outcome, expected)?;
    Ok(elements(envelope.into_results()))
}

/// Decode array elements in order, stopping at the first one that does not
/// decode. Everything before it is kept.
fn elements<E: DeserializeOwned>(values: Vec<Value>) -> Vec<E> {
    let total = values.len();
    let mut decoded = Vec::with_capacity(total);
    for value in values {
        match serde_json::from_value(value) {
            Ok(item) => decoded.push(item),
            Err(err) => {
                debug!(kept = decoded.len(), total, error = %err, "stopped decoding array");
                break;
            }
        }
    }
    decoded
}
