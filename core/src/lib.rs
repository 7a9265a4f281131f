//! Blocking client for the Gogs v1 HTTP API.
//!
//! # Overview
//! `GogsClient` exposes one method per remote operation (users, repositories,
//! access tokens, SSH keys). Each builds a path and JSON body, runs it through
//! a single request executor, and decodes the result.
//!
//! # Design
//! - `GogsClient::execute` is the only place that performs I/O. It makes one
//!   attempt, never retries, and turns every failure into data: the returned
//!   `Outcome` holds the status (or `-1`), the body, or the captured
//!   `TransportError`.
//! - Facade methods never return errors. A failed operation yields `None`,
//!   an empty `Vec` or `false`; `last_response()` keeps the raw outcome, and
//!   the `decode` helpers can be re-run on it to learn why.
//! - Every operation has a `build_*` counterpart returning the `ApiRequest`
//!   it would send, so request shapes are testable without a server.
//! - The `Transport` trait isolates the HTTP stack; `UreqTransport` is the
//!   default.
//!
//! ```no_run
//! use gogs_client::{GogsClient, Identity};
//!
//! let mut client = GogsClient::new("https://try.gogs.io/api/v1");
//! let me = Identity::basic("alice", "secret");
//! for repo in client.list_repos(&me) {
//!     println!("{}", repo.full_name);
//! }
//! ```

pub mod auth;
pub mod client;
pub mod decode;
pub mod error;
pub mod http;
pub mod outcome;
pub mod transport;
pub mod types;

mod keys;
mod repos;
mod tokens;
mod users;

#[cfg(test)]
mod test_support;

pub use auth::{encode_authorization, Identity};
pub use client::GogsClient;
pub use error::{ApiError, TransportError};
pub use http::{ApiRequest, HttpMethod, HttpRequest, RawResponse, Timeouts};
pub use outcome::Outcome;
pub use transport::{Transport, UreqTransport};
pub use types::{PublicKey, Repository, Token, User};
