//! Gogs entities and request payloads.
//!
//! # Design
//! Entities decode leniently: every field has a default, so a response that
//! omits fields still yields a value. Request payloads are separate types so
//! that the JSON sent for each operation has exactly the documented fields,
//! in a stable order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A Gogs user account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Only ever sent; the server does not return it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }
}

/// A repository as returned by `/repos/...` and `/user/repos`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub id: i64,
    pub owner: User,
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub private: bool,
    pub fork: bool,
    pub html_url: String,
    pub clone_url: String,
    pub ssh_url: String,
}

impl Repository {
    pub fn new(name: impl Into<String>, description: impl Into<String>, private: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            private,
            ..Self::default()
        }
    }
}

fn default_scopes() -> Vec<String> {
    vec!["all".to_string()]
}

/// An application access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Token {
    pub name: String,
    pub sha1: Option<String>,
    pub scopes: Vec<String>,
}

impl Token {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }
}

impl Default for Token {
    fn default() -> Self {
        Self {
            name: String::new(),
            sha1: None,
            scopes: default_scopes(),
        }
    }
}

/// Displays the token value itself, ready for `Identity::token`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sha1.as_deref().unwrap_or_default())
    }
}

/// An SSH public key registered to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicKey {
    pub id: i64,
    pub key: String,
    pub url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl PublicKey {
    pub fn new(title: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            key: key.into(),
            ..Self::default()
        }
    }
}

/// Body of `POST /admin/users`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub send_notify: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<&'a str>,
}

/// Body of `POST /user/repos`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRepo<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub private: bool,
}

/// Body of `POST /users/{username}/tokens`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateToken<'a> {
    pub name: &'a str,
    pub scopes: &'a [String],
}

/// Body of `POST /user/keys`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateKey<'a> {
    pub title: &'a str,
    pub key: &'a str,
}

/// Wrapper used by the search endpoints. A missing or false `ok` means no
/// results.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub ok: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Envelope<T> {
    pub fn into_results(self) -> Vec<T> {
        if self.ok {
            self.data
        } else {
            Vec::new()
        }
    }
}
