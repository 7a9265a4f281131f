//! User account operations.

use crate::auth::Identity;
use crate::client::{required, to_json, GogsClient};
use crate::decode;
use crate::error::ApiError;
use crate::http::{ApiRequest, HttpMethod};
use crate::transport::Transport;
use crate::types::{CreateUser, User};

impl<T: Transport> GogsClient<T> {
    /// `POST /admin/users`. Needs username, email and password.
    pub fn build_create_user(&self, user: &User, notify: bool) -> Result<ApiRequest, ApiError> {
        let body = CreateUser {
            username: required(Some(user.username.as_str()), "username")?,
            email: required(user.email.as_deref(), "email")?,
            password: required(user.password.as_deref(), "password")?,
            send_notify: notify,
            full_name: user.full_name.as_deref(),
        };
        Ok(ApiRequest::get("/admin/users").with_body(to_json(&body)?))
    }

    /// Creates a user account. Requires admin rights on `auth`.
    pub fn create_user(&mut self, user: &User, auth: &Identity, notify: bool) -> Option<User> {
        let request = self.build_create_user(user, notify);
        self.perform("create_user", request, Some(auth), |outcome| decode::entity(outcome, 201))
            .ok()
    }

    /// `PATCH /admin/users/{username}`. The username itself cannot change.
    pub fn build_edit_user(&self, user: &User) -> Result<ApiRequest, ApiError> {
        let username = required(Some(user.username.as_str()), "username")?;
        Ok(ApiRequest::get(format!("/admin/users/{username}"))
            .with_body(to_json(user)?)
            .with_method(HttpMethod::Patch))
    }

    pub fn edit_user(&mut self, user: &User, auth: &Identity) -> Option<User> {
        let request = self.build_edit_user(user);
        self.perform("edit_user", request, Some(auth), |outcome| decode::entity(outcome, 200))
            .ok()
    }

    /// `DELETE /admin/users/{username}`. Refuses to build a request that
    /// would delete the authenticating user.
    pub fn build_delete_user(&self, username: &str, auth: &Identity) -> Result<ApiRequest, ApiError> {
        let username = required(Some(username), "username")?;
        if auth.username.as_deref() == Some(username) {
            return Err(ApiError::SelfDelete(username.to_string()));
        }
        Ok(ApiRequest::get(format!("/admin/users/{username}")).with_method(HttpMethod::Delete))
    }

    /// Returns `true` only on 204. No request is made when `username` is the
    /// authenticating user.
    pub fn delete_user(&mut self, username: &str, auth: &Identity) -> bool {
        let request = self.build_delete_user(username, auth);
        self.perform("delete_user", request, Some(auth), |outcome| decode::no_content(outcome, 204))
            .is_ok()
    }

    /// `GET /users/search?q={query}&limit={limit}`. The query is trimmed and
    /// sent as-is, without escaping.
    pub fn build_search_users(&self, query: &str, limit: u32) -> Result<ApiRequest, ApiError> {
        let query = required(Some(query), "query")?.trim();
        Ok(ApiRequest::get(format!("/users/search?q={query}&limit={limit}")))
    }

    /// Without `auth` the server blanks the email of every result.
    pub fn search_users(&mut self, query: &str, limit: u32, auth: Option<&Identity>) -> Vec<User> {
        let request = self.build_search_users(query, limit);
        self.perform("search_users", request, auth, |outcome| decode::envelope(outcome, 200))
            .unwrap_or_default()
    }

    /// `GET /users/{username}`.
    pub fn build_get_user(&self, username: &str) -> Result<ApiRequest, ApiError> {
        let username = required(Some(username), "username")?;
        Ok(ApiRequest::get(format!("/users/{username}")))
    }

    pub fn get_user(&mut self, username: &str, auth: Option<&Identity>) -> Option<User> {
        let request = self.build_get_user(username);
        self.perform("get_user", request, auth, |outcome| decode::entity(outcome, 200))
            .ok()
    }
}
