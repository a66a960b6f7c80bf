//! Error types and the status-code table for the Sentino client.
//!
//! # Design
//! The service documents a fixed set of error statuses. A response whose
//! status is in `ERROR_CODES` becomes `ApiError::Remote`; every other status
//! is handed back to the caller. Transport faults are kept in their own
//! variant so callers can tell "the server said no" from "we never got an
//! answer".

use thiserror::Error;

/// Status codes the Sentino API documents as errors, with their messages.
/// Lookup is an exact match on the code.
pub const ERROR_CODES: &[(u16, &str)] = &[
    (400, "Bad Request -- Your request is invalid."),
    (401, "Unauthorized -- Your Sentino API token is wrong."),
    (404, "Not Found -- The endpoint is not found."),
    (405, "Method Not Allowed -- You tried to access an invalid method."),
    (406, "Not Acceptable -- You requested a format that isn't json."),
    (429, "Too Many Requests -- You're requesting too many things! Slow down!"),
    (500, "Internal Server Error -- We had a problem with our server. Try again later."),
    (
        503,
        "Service Unavailable -- We're temporarily offline for maintenance. Please try again later.",
    ),
];

/// Message for `status` if it is one of the documented error codes.
pub fn error_message(status: u16) -> Option<&'static str> {
    ERROR_CODES
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, message)| *message)
}

/// Errors returned by `SentinoClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status listed in `ERROR_CODES`.
    #[error("Request failed with status code {status}: {message}")]
    Remote { status: u16, message: &'static str },

    /// The request never produced an HTTP response (DNS, refused
    /// connection, TLS, broken body stream).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A non-error response body was not valid JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("API credential must not be empty")]
    EmptyCredential,

    #[error("unsupported HTTP method: {0:?} (only GET and POST are supported)")]
    UnsupportedMethod(String),
}

impl ApiError {
    /// Builds the remote error for `status`, or `None` when the status is
    /// not in the table.
    pub fn from_status(status: u16) -> Option<Self> {
        error_message(status).map(|message| ApiError::Remote { status, message })
    }

    /// The HTTP status behind a `Remote` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}
