//! HTTP request and response types exchanged with the transport.
//!
//! # Design
//! An `ApiRequest` is what the facade hands to the request executor: a path
//! relative to the API root, an optional JSON body and an optional method
//! override. The executor resolves it into an `HttpRequest` (absolute URL,
//! headers, concrete method) and passes that to a `Transport`, which answers
//! with a `RawResponse` whose body has not been read yet. Whether the body is
//! read at all depends on the method (see `HttpMethod::is_readable`).

use std::fmt;
use std::io::Read;
use std::time::Duration;

use serde::Deserialize;

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    /// Any other verb, stored upper-cased.
    Custom(String),
}

impl HttpMethod {
    /// Parse a method name. Case-insensitive; unknown verbs become `Custom`.
    pub fn parse(name: &str) -> Self {
        let upper = name.trim().to_ascii_uppercase();
        match upper.as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            _ => HttpMethod::Custom(upper),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Custom(name) => name,
        }
    }

    /// Whether a response body is fetched for this method. `DELETE` and `PUT`
    /// responses are never read, whatever the server sends back.
    pub fn is_readable(&self) -> bool {
        !matches!(self, HttpMethod::Delete | HttpMethod::Put)
    }
}

impl From<&str> for HttpMethod {
    fn from(name: &str) -> Self {
        HttpMethod::parse(name)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input to the request executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Path relative to the API root. Leading slashes are ignored.
    pub path: String,
    /// JSON body. Its presence makes the default method `POST`.
    pub body: Option<String>,
    /// Explicit method, overriding the body-derived default.
    pub method: Option<HttpMethod>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: None,
            method: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// The method actually sent: the override if any, else `POST` with a
    /// body and `GET` without.
    pub fn effective_method(&self) -> HttpMethod {
        match (&self.method, &self.body) {
            (Some(method), _) => method.clone(),
            (None, Some(_)) => HttpMethod::Post,
            (None, None) => HttpMethod::Get,
        }
    }
}

/// A fully resolved request, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status line of a response plus its body stream, not yet consumed.
pub struct RawResponse {
    pub status: u16,
    pub body: Box<dyn Read>,
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Read and connect timeouts, in milliseconds. `0` disables the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub read_ms: u64,
    pub connect_ms: u64,
}

impl Timeouts {
    pub const DEFAULT_MS: u64 = 5000;

    /// `None` when `read_ms` is 0, so the transport waits indefinitely.
    pub fn read(&self) -> Option<Duration> {
        limit(self.read_ms)
    }

    pub fn connect(&self) -> Option<Duration> {
        limit(self.connect_ms)
    }
}

fn limit(millis: u64) -> Option<Duration> {
    (millis > 0).then(|| Duration::from_millis(millis))
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            read_ms: Self::DEFAULT_MS,
            connect_ms: Self::DEFAULT_MS,
        }
    }
}
