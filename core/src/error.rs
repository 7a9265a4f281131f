//! Error types for the Gogs API client.
//!
//! # Design
//! `TransportError` covers everything that can go wrong during a single round
//! trip. It never escapes the request executor: it is stored inside the
//! `Outcome` instead, so it carries messages rather than source errors and
//! stays `Clone`.
//!
//! `ApiError` is what the request builders and `decode` helpers report. The
//! facade methods log it and fold it into `None`, an empty list or `false`.

use thiserror::Error;

/// Failure of one round trip, captured in an `Outcome`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported url scheme in {0}")]
    UnsupportedScheme(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connect, TLS or I/O failure while sending the request.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The status arrived but the body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Errors reported by request builders and response decoders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// A field the operation needs was absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Users may not delete their own account.
    #[error("refusing to delete the authenticating user {0}")]
    SelfDelete(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than the expected one and 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The status matched but no body was captured.
    #[error("response carried no body")]
    MissingBody,

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}
