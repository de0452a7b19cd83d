//! Error types for the checkout API client.
//!
//! # Design
//! `TransportError` covers everything that went wrong between sending the
//! request and receiving a usable body: connectivity, timeouts and non-2xx
//! statuses. `ApiError::Backend` is the error the backend declared in its own
//! `errors` envelope; it outranks any transport error for the same call.

use thiserror::Error;

/// Failures reported by a `Transport`, or derived from a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    /// The server answered with a status outside 200..300.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport failed: {0}")]
    Other(String),
}

/// Errors returned by `CheckoutClient`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// First entry of a backend `errors` envelope. Displays verbatim.
    #[error("{description}")]
    Backend { description: String },

    /// The response body could not be projected into the expected type.
    #[error("deserialization failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// HTTP status behind the error, when one is known.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::Transport(TransportError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_displays_description_only() {
        let err = ApiError::Backend {
            description: "Invalid API key".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid API key");
    }

    #[test]
    fn transport_error_is_transparent() {
        let err: ApiError = TransportError::Timeout.into();
        assert_eq!(err.to_string(), "request timed out");
        assert_eq!(err.http_status(), None);
    }

    #[test]
    fn status_error_exposes_http_status() {
        let err: ApiError = TransportError::Status {
            status: 502,
            body: String::new(),
        }
        .into();
        assert_eq!(err.http_status(), Some(502));
    }
}
