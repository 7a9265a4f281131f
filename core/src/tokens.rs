//! Access token operations.

use crate::auth::Identity;
use crate::client::{required, to_json, GogsClient};
use crate::decode;
use crate::error::ApiError;
use crate::http::ApiRequest;
use crate::transport::Transport;
use crate::types::{CreateToken, Token};

impl<T: Transport> GogsClient<T> {
    /// `POST /users/{username}/tokens`, for the authenticating user.
    pub fn build_create_token(&self, token: &Token, auth: &Identity) -> Result<ApiRequest, ApiError> {
        let username = required(auth.login(), "username")?;
        let body = CreateToken {
            name: required(Some(token.name.as_str()), "name")?,
            scopes: &token.scopes,
        };
        Ok(ApiRequest::get(format!("/users/{username}/tokens")).with_body(to_json(&body)?))
    }

    /// Gogs only accepts Basic credentials here.
    pub fn create_token(&mut self, token: &Token, auth: &Identity) -> Option<Token> {
        let request = self.build_create_token(token, auth);
        self.perform("create_token", request, Some(auth), |outcome| decode::entity(outcome, 201))
            .ok()
    }

    /// `GET /users/{username}/tokens`.
    pub fn build_list_tokens(&self, auth: &Identity) -> Result<ApiRequest, ApiError> {
        let username = required(auth.login(), "username")?;
        Ok(ApiRequest::get(format!("/users/{username}/tokens")))
    }

    pub fn list_tokens(&mut self, auth: &Identity) -> Vec<Token> {
        let request = self.build_list_tokens(auth);
        self.perform("list_tokens", request, Some(auth), |outcome| decode::list(outcome, 200))
            .unwrap_or_default()
    }
}
