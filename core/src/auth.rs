//! Authenticating identities and the `Authorization` header they produce.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// The principal a request is made as.
///
/// A token, when present, always wins over username and password. The
/// username is also used to build identity-scoped paths such as
/// `/users/{username}/tokens`, so keep it set when authenticating by token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
}

impl Identity {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            token: None,
        }
    }

    pub fn token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Username if set and non-empty.
    pub fn login(&self) -> Option<&str> {
        self.username.as_deref().filter(|name| !name.is_empty())
    }

    /// Value for the `Authorization` header, or `None` to send the request
    /// unauthenticated.
    pub fn authorization(&self) -> Option<String> {
        encode_authorization(self)
    }
}

/// Encode `identity` as `token <T>` or `Basic <base64(user:pass)>`.
pub fn encode_authorization(identity: &Identity) -> Option<String> {
    if let Some(token) = &identity.token {
        return Some(format!("token {token}"));
    }
    match (identity.username.as_deref(), identity.password.as_deref()) {
        (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
            let credentials = STANDARD.encode(format!("{user}:{pass}"));
            Some(format!("Basic {credentials}"))
        }
        _ => None,
    }
}
