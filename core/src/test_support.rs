//! In-memory transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Cursor, Read};

use crate::client::GogsClient;
use crate::error::TransportError;
use crate::http::{HttpRequest, RawResponse, Timeouts};
use crate::transport::Transport;

pub const BASE_URL: &str = "http://git.example.com/api/v1";

#[derive(Debug)]
enum Reply {
    Body(u16, String),
    Broken(u16),
    Fail(TransportError),
}

/// Replays queued replies in order and records every request it is given.
#[derive(Debug, Default)]
pub struct FakeTransport {
    replies: RefCell<VecDeque<Reply>>,
    sent: RefCell<Vec<(HttpRequest, Timeouts)>>,
}

impl FakeTransport {
    pub fn reply(self, status: u16, body: &str) -> Self {
        self.replies.borrow_mut().push_back(Reply::Body(status, body.to_string()));
        self
    }

    /// Status arrives, then reading the body errors.
    pub fn broken_body(self, status: u16) -> Self {
        self.replies.borrow_mut().push_back(Reply::Broken(status));
        self
    }

    pub fn fail(self, failure: TransportError) -> Self {
        self.replies.borrow_mut().push_back(Reply::Fail(failure));
        self
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.borrow().iter().map(|(request, _)| request.clone()).collect()
    }

    pub fn timeouts(&self) -> Vec<Timeouts> {
        self.sent.borrow().iter().map(|(_, timeouts)| *timeouts).collect()
    }

    /// Body of the only request sent, parsed as JSON.
    pub fn sent_json(&self) -> serde_json::Value {
        let sent = self.sent();
        assert_eq!(sent.len(), 1, "expected exactly one request");
        serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap()
    }
}

struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer"))
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: HttpRequest, timeouts: Timeouts) -> Result<RawResponse, TransportError> {
        self.sent.borrow_mut().push((request, timeouts));
        match self.replies.borrow_mut().pop_front() {
            Some(Reply::Body(status, body)) => Ok(RawResponse {
                status,
                body: Box::new(Cursor::new(body.into_bytes())),
            }),
            Some(Reply::Broken(status)) => Ok(RawResponse {
                status,
                body: Box::new(BrokenReader),
            }),
            Some(Reply::Fail(failure)) => Err(failure),
            None => Err(TransportError::Connection("no reply queued".to_string())),
        }
    }
}

pub fn client(transport: FakeTransport) -> GogsClient<FakeTransport> {
    GogsClient::with_transport(BASE_URL, transport)
}
