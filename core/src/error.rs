//! Error types for the Lardi-Trans client.
//!
//! # Design
//! Every failed operation returns an [`Error`] that names the operation and
//! wraps an [`ErrorKind`]. Callers branch on the kind: `Api` means the server
//! rejected the request, everything else is a local or infrastructure
//! failure.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::client::Endpoint;

/// Error body returned by the API for any non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Error)]
#[serde(default)]
#[error("API error: status={status}, error={error_code}, message={message}")]
pub struct ApiError {
    pub status: i64,
    #[serde(rename = "error")]
    pub error_code: String,
    pub message: String,
}

/// A cargo request that must not be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("waypointListSource is required")]
    MissingWaypointSource,

    #[error("waypointListTarget is required")]
    MissingWaypointTarget,
}

/// The round-trip itself failed; no status code was received.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request cancelled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// True when the caller's context stopped the request.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TransportError::Cancelled | TransportError::DeadlineExceeded)
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to marshal request body: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The status was not 2xx and the body was not an `ApiError` either.
    #[error("failed to decode error response (status {status}): {source}")]
    DecodeErrorBody {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A failed client operation.
#[derive(Debug, Error)]
#[error("{} failed: {kind}", .endpoint.operation())]
pub struct Error {
    endpoint: Endpoint,
    #[source]
    kind: ErrorKind,
}

impl Error {
    pub(crate) fn new(endpoint: Endpoint, kind: impl Into<ErrorKind>) -> Self {
        Self {
            endpoint,
            kind: kind.into(),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// The server's rejection, if that is what this error is.
    pub fn api_error(&self) -> Option<&ApiError> {
        match &self.kind {
            ErrorKind::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn transport_error(&self) -> Option<&TransportError> {
        match &self.kind {
            ErrorKind::Transport(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::Validation(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self.kind, ErrorKind::Decode(_) | ErrorKind::DecodeErrorBody { .. })
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn api_error_decodes_wire_names() {
        let err: ApiError =
            serde_json::from_str(r#"{"status":400,"error":"bad_request","message":"invalid date"}"#).unwrap();
        assert_eq!(err.status, 400);
        assert_eq!(err.error_code, "bad_request");
        assert_eq!(err.message, "invalid date");
    }

    #[test]
    fn api_error_display_carries_all_fields() {
        let err = ApiError {
            status: 400,
            error_code: "bad_request".to_string(),
            message: "invalid date".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error: status=400, error=bad_request, message=invalid date"
        );
    }

    #[test]
    fn api_error_missing_fields_default() {
        let err: ApiError = serde_json::from_str(r#"{"message":"boom"}"#).unwrap();
        assert_eq!(err.status, 0);
        assert!(err.error_code.is_empty());
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn error_names_the_operation() {
        let err = Error::new(Endpoint::Currencies, TransportError::Cancelled);
        assert_eq!(err.to_string(), "get currencies failed: request failed: request cancelled");

        let err = Error::new(Endpoint::CreateCargo, ValidationError::MissingWaypointTarget);
        assert_eq!(
            err.to_string(),
            "create cargo request failed: invalid request: waypointListTarget is required"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn api_error_is_reachable_through_source_chain() {
        let api = ApiError {
            status: 403,
            error_code: "forbidden".to_string(),
            message: "no access".to_string(),
        };
        let err = Error::new(Endpoint::Contacts, api.clone());
        assert_eq!(err.api_error(), Some(&api));
        assert!(err.transport_error().is_none());

        let source = err.source().expect("kind is the source");
        assert!(source.to_string().contains("status=403"));
    }

    #[test]
    fn cancellation_flavors() {
        assert!(TransportError::Cancelled.is_cancellation());
        assert!(TransportError::DeadlineExceeded.is_cancellation());
        assert!(!TransportError::Other("refused".into()).is_cancellation());
    }
}
