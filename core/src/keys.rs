//! SSH public key operations.

use crate::auth::Identity;
use crate::client::{required, to_json, GogsClient};
use crate::decode;
use crate::error::ApiError;
use crate::http::{ApiRequest, HttpMethod};
use crate::transport::Transport;
use crate::types::{CreateKey, PublicKey};

fn key_id(id: i64) -> Result<i64, ApiError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(ApiError::MissingField("id"))
    }
}

impl<T: Transport> GogsClient<T> {
    /// `POST /user/keys` with title and key.
    pub fn build_create_public_key(&self, key: &PublicKey) -> Result<ApiRequest, ApiError> {
        let body = CreateKey {
            title: required(Some(key.title.as_str()), "title")?,
            key: required(Some(key.key.as_str()), "key")?,
        };
        Ok(ApiRequest::get("/user/keys").with_body(to_json(&body)?))
    }

    pub fn create_public_key(&mut self, key: &PublicKey, auth: &Identity) -> Option<PublicKey> {
        let request = self.build_create_public_key(key);
        self.perform("create_public_key", request, Some(auth), |outcome| {
            decode::entity(outcome, 201)
        })
        .ok()
    }

    /// `GET /users/{username}/keys`, for the authenticating user.
    pub fn build_list_public_keys(&self, auth: &Identity) -> Result<ApiRequest, ApiError> {
        let username = required(auth.login(), "username")?;
        Ok(ApiRequest::get(format!("/users/{username}/keys")))
    }

    pub fn list_public_keys(&mut self, auth: &Identity) -> Vec<PublicKey> {
        let request = self.build_list_public_keys(auth);
        self.perform("list_public_keys", request, Some(auth), |outcome| decode::list(outcome, 200))
            .unwrap_or_default()
    }

    /// `GET /user/keys/{id}`.
    pub fn build_get_public_key(&self, id: i64) -> Result<ApiRequest, ApiError> {
        let id = key_id(id)?;
        Ok(ApiRequest::get(format!("/user/keys/{id}")))
    }

    pub fn get_public_key(&mut self, id: i64, auth: &Identity) -> Option<PublicKey> {
        let request = self.build_get_public_key(id);
        self.perform("get_public_key", request, Some(auth), |outcome| decode::entity(outcome, 200))
            .ok()
    }

    /// `DELETE /user/keys/{id}`.
    pub fn build_delete_public_key(&self, id: i64) -> Result<ApiRequest, ApiError> {
        let id = key_id(id)?;
        Ok(ApiRequest::get(format!("/user/keys/{id}")).with_method(HttpMethod::Delete))
    }

    pub fn delete_public_key(&mut self, id: i64, auth: &Identity) -> bool {
        let request = self.build_delete_public_key(id);
        self.perform("delete_public_key", request, Some(auth), |outcome| {
            decode::no_content(outcome, 204)
        })
        .is_ok()
    }
}
