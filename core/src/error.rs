//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` and `Rejected` get dedicated variants because callers show them
//! differently: the item vanished, or the server refused the payload (its
//! field errors are kept verbatim). All other non-2xx responses land in
//! `Status` with the raw status code and body. Local validation failures are
//! not errors at all; the session skips the action before any request.

use thiserror::Error;

/// Errors returned by `TodoClient` parse methods and by transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, ...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned 400 with validation errors.
    #[error("rejected by server: {body}")]
    Rejected { body: String },

    /// The server returned any other non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialize(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_and_body() {
        let err = ApiError::Status {
            status: 503,
            body: "down".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: down");
        assert_eq!(
            ApiError::Transport("connection refused".to_string()).to_string(),
            "transport failure: connection refused"
        );
    }
}
