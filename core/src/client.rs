//! The client and its request executor.
//!
//! # Design
//! Every API operation funnels through `GogsClient::execute`, which performs
//! exactly one round trip and never fails: URL problems, connection errors,
//! timeouts and body read errors are all captured in the returned `Outcome`.
//! The most recent outcome is also kept on the client for inspection after a
//! facade call has folded its result into `None`, an empty list or `false`.
//!
//! Methods that touch the last response or the timeouts take `&mut self`, so
//! a client cannot be shared between threads without external locking. Give
//! each worker its own client instead.
//!
//! Per-resource operations live in `users`, `repos`, `tokens` and `keys`.

use std::io::Read;

use serde::Serialize;
use tracing::{debug, warn};
use ureq::http::Uri;

use crate::auth::Identity;
use crate::error::{ApiError, TransportError};
use crate::http::{ApiRequest, HttpRequest, Timeouts};
use crate::outcome::Outcome;
use crate::transport::{Transport, UreqTransport};

/// Blocking client for the Gogs v1 HTTP API.
#[derive(Debug)]
pub struct GogsClient<T = UreqTransport> {
    base_url: String,
    timeouts: Timeouts,
    transport: T,
    last_response: Option<Outcome>,
}

impl GogsClient {
    /// Creates a client for `api_url`, e.g. `https://try.gogs.io/api/v1`.
    pub fn new(api_url: &str) -> Self {
        Self::with_transport(api_url, UreqTransport)
    }
}

impl<T: Transport> GogsClient<T> {
    pub fn with_transport(api_url: &str, transport: T) -> Self {
        Self {
            base_url: format!("{}/", api_url.trim_end_matches('/')),
            timeouts: Timeouts::default(),
            transport,
            last_response: None,
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// The API root, always ending in exactly one `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    pub fn set_read_timeout(&mut self, millis: u64) {
        self.timeouts.read_ms = millis;
    }

    pub fn set_connection_timeout(&mut self, millis: u64) {
        self.timeouts.connect_ms = millis;
    }

    /// Outcome of the most recent request, if any was made.
    pub fn last_response(&self) -> Option<&Outcome> {
        self.last_response.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform one round trip for `request`, authenticated as `identity`.
    pub fn execute(&mut self, request: &ApiRequest, identity: Option<&Identity>) -> Outcome {
        let outcome = self.round_trip(request, identity);
        self.last_response = Some(outcome.clone());
        outcome
    }

    fn round_trip(&self, request: &ApiRequest, identity: Option<&Identity>) -> Outcome {
        let url = format!("{}{}", self.base_url, request.path.trim_start_matches('/'));
        if let Err(failure) = check_url(&url) {
            warn!(%url, error = %failure, "refusing to send request");
            return Outcome::failed(None, failure);
        }

        let mut headers = Vec::with_capacity(2);
        if let Some(authorization) = identity.and_then(Identity::authorization) {
            headers.push(("Authorization".to_string(), authorization));
        }
        headers.push(("Content-Type".to_string(), "application/json".to_string()));

        let method = request.effective_method();
        debug!(%method, %url, "sending request");
        let http_request = HttpRequest {
            method: method.clone(),
            url: url.clone(),
            headers,
            body: request.body.clone(),
        };

        let mut response = match self.transport.send(http_request, self.timeouts) {
            Ok(response) => response,
            Err(failure) => {
                warn!(%method, %url, error = %failure, "request failed");
                return Outcome::failed(None, failure);
            }
        };
        let status = response.status;
        debug!(%method, %url, status, "response received");

        if !method.is_readable() {
            return Outcome::completed(status, None);
        }
        let mut bytes = Vec::new();
        match response.body.read_to_end(&mut bytes) {
            Ok(_) => Outcome::completed(status, Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(err) => {
                warn!(%method, %url, status, error = %err, "failed to read response body");
                Outcome::failed(Some(status), TransportError::Body(err.to_string()))
            }
        }
    }

    /// Build, execute and decode one operation, logging why it failed.
    pub(crate) fn perform<R>(
        &mut self,
        operation: &'static str,
        request: Result<ApiRequest, ApiError>,
        identity: Option<&Identity>,
        decode: impl FnOnce(&Outcome) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let result = request.and_then(|request| {
            let outcome = self.execute(&request, identity);
            decode(&outcome)
        });
        if let Err(err) = &result {
            debug!(operation, error = %err, "operation did not succeed");
        }
        result
    }
}

/// Reject URLs that do not parse or are not `http`/`https`.
fn check_url(url: &str) -> Result<(), TransportError> {
    let uri: Uri = url.parse().map_err(|e: ureq::http::uri::InvalidUri| TransportError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match uri.scheme_str() {
        Some("http") | Some("https") => Ok(()),
        _ => Err(TransportError::UnsupportedScheme(url.to_string())),
    }
}

pub(crate) fn to_json<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Fail with `MissingField` unless `value` is present and non-empty.
pub(crate) fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ApiError::MissingField(field))
}
