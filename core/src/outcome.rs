//! The uniform result of one request attempt.

use crate::error::TransportError;

/// Status, body and failure captured from a single round trip.
///
/// An outcome is either *completed* (a status was received, and the body was
/// read if the method is readable) or *failed* (a `TransportError` was
/// captured, possibly after the status arrived). A failed outcome never
/// carries a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    status: Option<u16>,
    body: Option<String>,
    failure: Option<TransportError>,
}

impl Outcome {
    /// Sentinel returned by `code()` when the server was never reached.
    pub const NO_STATUS: i32 = -1;

    pub fn completed(status: u16, body: Option<String>) -> Self {
        Self {
            status: Some(status),
            body,
            failure: None,
        }
    }

    /// `status` is whatever was received before the failure, if anything.
    pub fn failed(status: Option<u16>, failure: TransportError) -> Self {
        Self {
            status,
            body: None,
            failure: Some(failure),
        }
    }

    /// The HTTP status, or `-1` if none was obtained.
    pub fn code(&self) -> i32 {
        self.status.map_or(Self::NO_STATUS, i32::from)
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn failure(&self) -> Option<&TransportError> {
        self.failure.as_ref()
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    /// Tagged view: the body (if one was read) or the captured failure.
    pub fn result(&self) -> Result<Option<&str>, &TransportError> {
        match &self.failure {
            Some(failure) => Err(failure),
            None => Ok(self.body.as_deref()),
        }
    }
}
