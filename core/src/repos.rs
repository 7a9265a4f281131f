//! Repository operations.

use crate::auth::Identity;
use crate::client::{required, to_json, GogsClient};
use crate::decode;
use crate::error::ApiError;
use crate::http::{ApiRequest, HttpMethod};
use crate::transport::Transport;
use crate::types::{CreateRepo, Repository};

impl<T: Transport> GogsClient<T> {
    /// `GET /repos/search?q={query}&uid={uid}&limit={limit}`. A `uid` of 0
    /// searches every user's public repositories.
    pub fn build_search_repos(&self, query: &str, uid: i64, limit: u32) -> Result<ApiRequest, ApiError> {
        let query = required(Some(query), "query")?.trim();
        Ok(ApiRequest::get(format!("/repos/search?q={query}&uid={uid}&limit={limit}")))
    }

    /// Searches public repositories, unauthenticated.
    pub fn search_repos(&mut self, query: &str, uid: i64, limit: u32) -> Vec<Repository> {
        let request = self.build_search_repos(query, uid, limit);
        self.perform("search_repos", request, None, |outcome| decode::envelope(outcome, 200))
            .unwrap_or_default()
    }

    /// `POST /user/repos` with name, description and visibility.
    pub fn build_create_repo(&self, repo: &Repository) -> Result<ApiRequest, ApiError> {
        let body = CreateRepo {
            name: required(Some(repo.name.as_str()), "name")?,
            description: &repo.description,
            private: repo.private,
        };
        Ok(ApiRequest::get("/user/repos").with_body(to_json(&body)?))
    }

    /// Creates a repository owned by `auth`.
    pub fn create_repo(&mut self, repo: &Repository, auth: &Identity) -> Option<Repository> {
        let request = self.build_create_repo(repo);
        self.perform("create_repo", request, Some(auth), |outcome| decode::entity(outcome, 201))
            .ok()
    }

    /// `GET /repos/{owner}/{name}`.
    pub fn build_get_repo(&self, owner: &str, name: &str) -> Result<ApiRequest, ApiError> {
        let owner = required(Some(owner), "owner")?;
        let name = required(Some(name), "name")?;
        Ok(ApiRequest::get(format!("/repos/{owner}/{name}")))
    }

    /// `auth` need not be the owner; private repositories need it to have
    /// access.
    pub fn get_repo(&mut self, owner: &str, name: &str, auth: Option<&Identity>) -> Option<Repository> {
        let request = self.build_get_repo(owner, name);
        self.perform("get_repo", request, auth, |outcome| decode::entity(outcome, 200))
            .ok()
    }

    /// `GET /user/repos`.
    pub fn build_list_repos(&self) -> ApiRequest {
        ApiRequest::get("/user/repos")
    }

    /// Every repository `auth` can access, in server order.
    pub fn list_repos(&mut self, auth: &Identity) -> Vec<Repository> {
        let request = self.build_list_repos();
        self.perform("list_repos", Ok(request), Some(auth), |outcome| decode::list(outcome, 200))
            .unwrap_or_default()
    }

    /// `DELETE /repos/{owner}/{name}`, where the owner is the authenticating
    /// user.
    pub fn build_delete_repo(&self, name: &str, auth: &Identity) -> Result<ApiRequest, ApiError> {
        let owner = required(auth.login(), "username")?;
        let name = required(Some(name), "name")?;
        Ok(ApiRequest::get(format!("/repos/{owner}/{name}")).with_method(HttpMethod::Delete))
    }

    pub fn delete_repo(&mut self, name: &str, auth: &Identity) -> bool {
        let request = self.build_delete_repo(name, auth);
        self.perform("delete_repo", request, Some(auth), |outcome| decode::no_content(outcome, 204))
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client, FakeTransport, BASE_URL};

    fn alice() -> Identity {
        Identity::token("0123abcd").with_username("alice")
    }

    #[test]
    fn list_repos_keeps_server_order() {
        let mut c = client(FakeTransport::default().reply(
            200,
            r#"[{"id":1,"name":"r1","full_name":"alice/r1"},{"id":2,"name":"r2","full_name":"alice/r2"}]"#,
        ));
        let repos = c.list_repos(&alice());
        let names: Vec<_> = repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["r1", "r2"]);
        let sent = c.transport().sent();
        assert_eq!(sent[0].url, format!("{BASE_URL}/user/repos"));
        assert_eq!(sent[0].header("authorization"), Some("token 0123abcd"));
    }

    #[test]
    fn list_repos_stops_at_first_undecodable_repo() {
        let mut c = client(
            FakeTransport::default().reply(200, r#"[{"name":"r1"},{"name":"r2","description":null},{"name":"r3"}]"#),
        );
        let names: Vec<_> = c.list_repos(&alice()).into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["r1"]);
    }

    #[test]
    fn list_repos_with_envelope_body_is_empty() {
        let mut c = client(FakeTransport::default().reply(200, r#"{"ok":true,"data":[]}"#));
        assert!(c.list_repos(&alice()).is_empty());
    }

    #[test]
    fn create_repo_posts_name_description_private() {
        let mut c = client(
            FakeTransport::default().reply(201, r#"{"id":9,"name":"notes","private":true}"#),
        );
        let repo = c
            .create_repo(&Repository::new("notes", "my notes", true), &alice())
            .unwrap();
        assert_eq!(repo.id, 9);
        assert_eq!(
            c.transport().sent()[0].body.as_deref(),
            Some(r#"{"name":"notes","description":"my notes","private":true}"#)
        );
    }

    #[test]
    fn create_repo_needs_a_name() {
        let mut c = client(FakeTransport::default());
        assert!(c.create_repo(&Repository::default(), &alice()).is_none());
        assert!(c.transport().sent().is_empty());
    }

    #[test]
    fn search_repos_trims_query_and_sends_no_auth() {
        let mut c = client(
            FakeTransport::default().reply(200, r#"{"ok":true,"data":[{"name":"gogs"}]}"#),
        );
        let repos = c.search_repos("  gogs ", 0, 5);
        assert_eq!(repos.len(), 1);
        let sent = c.transport().sent();
        assert_eq!(sent[0].url, format!("{BASE_URL}/repos/search?q=gogs&uid=0&limit=5"));
        assert_eq!(sent[0].header("authorization"), None);
    }

    #[test]
    fn get_repo_by_owner_and_name() {
        let mut c = client(FakeTransport::default().reply(404, r#"{"message":"Not Found"}"#));
        assert!(c.get_repo("alice", "missing", None).is_none());
        assert_eq!(c.transport().sent()[0].url, format!("{BASE_URL}/repos/alice/missing"));
    }

    #[test]
    fn delete_repo_uses_identity_as_owner() {
        let mut c = client(FakeTransport::default().reply(204, ""));
        assert!(c.delete_repo("notes", &alice()));
        let sent = c.transport().sent();
        assert_eq!(sent[0].method, HttpMethod::Delete);
        assert_eq!(sent[0].url, format!("{BASE_URL}/repos/alice/notes"));
    }

    #[test]
    fn delete_repo_without_username_sends_nothing() {
        let mut c = client(FakeTransport::default());
        assert!(!c.delete_repo("notes", &Identity::token("t")));
        assert!(c.transport().sent().is_empty());
    }
}
