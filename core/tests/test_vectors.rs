//! Verify request building and response handling against the JSON vectors in
//! `test-vectors/`.
//!
//! Each vector describes an input, the request the client should send, a
//! simulated server reply, and what the facade should return. Replies are
//! served by a one-shot `Transport` so the whole facade path is exercised.

use std::cell::RefCell;
use std::io::Cursor;

use gogs_client::{
    encode_authorization, GogsClient, HttpMethod, HttpRequest, Identity, RawResponse, Timeouts, Transport,
    TransportError, User,
};

const BASE_URL: &str = "http://localhost:3000/api/v1";

/// Answers every request with the same status and body, remembering what it
/// was sent.
struct Replay {
    status: u16,
    body: String,
    sent: RefCell<Vec<HttpRequest>>,
}

impl Replay {
    fn from_vector(sim: &serde_json::Value) -> Self {
        Self {
            status: sim["status"].as_u64().unwrap() as u16,
            body: sim["body"].as_str().unwrap().to_string(),
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl Transport for Replay {
    fn send(&self, request: HttpRequest, _timeouts: Timeouts) -> Result<RawResponse, TransportError> {
        self.sent.borrow_mut().push(request);
        Ok(RawResponse {
            status: self.status,
            body: Box::new(Cursor::new(self.body.clone().into_bytes())),
        })
    }
}

fn client(sim: &serde_json::Value) -> GogsClient<Replay> {
    GogsClient::with_transport(BASE_URL, Replay::from_vector(sim))
}

fn load(raw: &str) -> Vec<serde_json::Value> {
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn opt_string(value: &serde_json::Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[test]
fn authorization_test_vectors() {
    for case in load(include_str!("../../test-vectors/authorization.json")) {
        let name = case["name"].as_str().unwrap();
        let identity = Identity {
            username: opt_string(&case["identity"]["username"]),
            password: opt_string(&case["identity"]["password"]),
            token: opt_string(&case["identity"]["token"]),
        };
        let expected = opt_string(&case["expected_header"]);
        assert_eq!(encode_authorization(&identity), expected, "{name}: header");
    }
}

// ---------------------------------------------------------------------------
// Create user
// ---------------------------------------------------------------------------

#[test]
fn create_user_test_vectors() {
    for case in load(include_str!("../../test-vectors/create_user.json")) {
        let name = case["name"].as_str().unwrap();
        let input: User = serde_json::from_value(case["input"].clone()).unwrap();
        let notify = case["notify"].as_bool().unwrap();
        let expected_req = &case["expected_request"];

        let mut c = client(&case["simulated_response"]);
        let result = c.create_user(&input, &Identity::basic("root", "pw"), notify);

        let sent = c.transport().sent.borrow().clone();
        assert_eq!(sent.len(), 1, "{name}: one request");
        assert_eq!(
            sent[0].method,
            HttpMethod::parse(expected_req["method"].as_str().unwrap()),
            "{name}: method"
        );
        assert_eq!(
            sent[0].url,
            format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()),
            "{name}: path"
        );
        assert_eq!(
            sent[0].body.as_deref(),
            expected_req["body"].as_str(),
            "{name}: body"
        );

        let expected: Option<User> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(result, expected, "{name}: result");
    }
}

// ---------------------------------------------------------------------------
// Search users
// ---------------------------------------------------------------------------

#[test]
fn search_users_test_vectors() {
    for case in load(include_str!("../../test-vectors/search_users.json")) {
        let name = case["name"].as_str().unwrap();
        let query = case["query"].as_str().unwrap();
        let limit = case["limit"].as_u64().unwrap() as u32;

        let mut c = client(&case["simulated_response"]);
        let users = c.search_users(query, limit, None);

        let sent = c.transport().sent.borrow().clone();
        assert_eq!(
            sent[0].url,
            format!("{BASE_URL}{}", case["expected_path"].as_str().unwrap()),
            "{name}: path"
        );
        assert_eq!(sent[0].header("authorization"), None, "{name}: anonymous");

        let names: Vec<String> = users.into_iter().map(|u| u.username).collect();
        let expected: Vec<String> = serde_json::from_value(case["expected_usernames"].clone()).unwrap();
        assert_eq!(names, expected, "{name}: usernames");
    }
}

// ---------------------------------------------------------------------------
// List repositories
// ---------------------------------------------------------------------------

#[test]
fn list_repos_test_vectors() {
    for case in load(include_str!("../../test-vectors/list_repos.json")) {
        let name = case["name"].as_str().unwrap();

        let mut c = client(&case["simulated_response"]);
        let repos = c.list_repos(&Identity::token("abc").with_username("alice"));

        let sent = c.transport().sent.borrow().clone();
        assert_eq!(sent[0].method, HttpMethod::Get, "{name}: method");
        assert_eq!(sent[0].url, format!("{BASE_URL}/user/repos"), "{name}: path");
        assert!(sent[0].body.is_none(), "{name}: body should be None");

        let names: Vec<String> = repos.into_iter().map(|r| r.name).collect();
        let expected: Vec<String> = serde_json::from_value(case["expected_names"].clone()).unwrap();
        assert_eq!(names, expected, "{name}: names");
    }
}
