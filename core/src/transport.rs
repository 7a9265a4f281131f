//! The single I/O seam of the client.
//!
//! # Design
//! `Transport::send` performs one blocking exchange and stops as soon as the
//! status line is known; the body is handed back unread so the executor can
//! decide whether to consume it. `UreqTransport` builds a fresh agent per
//! call, so nothing is pooled and timeout changes apply to the next call.

use ureq::http;
use ureq::Agent;

use crate::error::TransportError;
use crate::http::{HttpRequest, RawResponse, Timeouts};

/// Executes resolved requests.
pub trait Transport {
    fn send(&self, request: HttpRequest, timeouts: Timeouts) -> Result<RawResponse, TransportError>;
}

/// Blocking transport backed by `ureq`. Plain and TLS connections are chosen
/// from the URL scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    fn agent(timeouts: Timeouts) -> Agent {
        Agent::config_builder()
            .http_status_as_error(false)
            .allow_non_standard_methods(true)
            .timeout_connect(timeouts.connect())
            .timeout_recv_response(timeouts.read())
            .timeout_recv_body(timeouts.read())
            .build()
            .new_agent()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest, timeouts: Timeouts) -> Result<RawResponse, TransportError> {
        let agent = Self::agent(timeouts);

        let mut builder = http::Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let invalid = |err: http::Error| TransportError::InvalidUrl {
            url: request.url.clone(),
            reason: err.to_string(),
        };
        let response = match request.body {
            Some(body) => agent.run(builder.body(body).map_err(invalid)?),
            None => agent.run(builder.body(()).map_err(invalid)?),
        }?;

        let status = response.status().as_u16();
        let body = response.into_body().into_reader();
        Ok(RawResponse {
            status,
            body: Box::new(body),
        })
    }
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        match &err {
            ureq::Error::Timeout(_) => TransportError::Timeout(err.to_string()),
            _ => TransportError::Connection(err.to_string()),
        }
    }
}
