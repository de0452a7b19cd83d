//! Decides which error, if any, a finished call surfaces.
//!
//! A body carrying a non-empty `errors` envelope outranks whatever the
//! transport reported: a 4xx with `{"errors":[{"description":"Invalid API
//! key"}]}` surfaces the description, not the status. Only the first entry is
//! used.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, TransportError};
use crate::types::ErrorEnvelope;

/// Extract the backend-declared error from a raw payload, if it has one.
pub fn backend_error(raw: &Value) -> Option<ApiError> {
    let envelope = parse_envelope(raw)?;
    envelope
        .first_description()
        .map(|description| ApiError::Backend {
            description: description.to_string(),
        })
}

/// `None` means the success path should proceed.
pub fn resolve_error(raw: Option<&Value>, transport: Option<TransportError>) -> Option<ApiError> {
    raw.and_then(backend_error)
        .or_else(|| transport.map(ApiError::Transport))
}

fn parse_envelope(raw: &Value) -> Option<ErrorEnvelope> {
    // Only objects can carry an envelope.
    if !raw.is_object() {
        return None;
    }
    ErrorEnvelope::deserialize(raw).ok()
}
