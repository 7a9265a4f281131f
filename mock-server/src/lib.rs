//! In-memory stand-in for the Gogs v1 API, mounted under `/api/v1`.
//!
//! Covers the user, repository, token and SSH key endpoints used by
//! `gogs-client`. The store starts with a single admin account
//! (`ADMIN_USERNAME` / `ADMIN_PASSWORD`). Requests authenticate with either
//! `Authorization: token <sha1>` or HTTP Basic credentials.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, patch, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const ADMIN_USERNAME: &str = "root";
pub const ADMIN_PASSWORD: &str = "root-password";

const PUBLIC_URL: &str = "http://localhost:3000";
const DEFAULT_SEARCH_LIMIT: usize = 10;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub avatar_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
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

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Token {
    pub name: String,
    pub sha1: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicKey {
    pub id: i64,
    pub key: String,
    pub url: String,
    pub title: String,
}

#[derive(Serialize, Deserialize)]
pub struct SearchResults<T> {
    pub ok: bool,
    pub data: Vec<T>,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub send_notify: bool,
    pub full_name: Option<String>,
}

#[derive(Deserialize)]
pub struct EditUser {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateRepo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub private: bool,
}

#[derive(Deserialize)]
pub struct CreateToken {
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateKey {
    pub title: String,
    pub key: String,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub uid: i64,
    pub limit: Option<usize>,
}

struct Account {
    user: User,
    password: String,
    admin: bool,
}

#[derive(Default)]
pub struct Store {
    last_id: i64,
    accounts: BTreeMap<String, Account>,
    repos: Vec<Repository>,
    tokens: Vec<(String, Token)>,
    keys: BTreeMap<i64, (String, PublicKey)>,
}

impl Store {
    fn seeded() -> Self {
        let mut store = Store::default();
        store.add_account(ADMIN_USERNAME, "admin@localhost", ADMIN_PASSWORD, "", true);
        store
    }

    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn add_account(&mut self, username: &str, email: &str, password: &str, full_name: &str, admin: bool) -> User {
        let user = User {
            id: self.next_id(),
            username: username.to_string(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            avatar_url: format!("{PUBLIC_URL}/avatars/{username}"),
        };
        self.accounts.insert(
            username.to_string(),
            Account {
                user: user.clone(),
                password: password.to_string(),
                admin,
            },
        );
        user
    }

    /// Username behind the request's `Authorization` header, if valid.
    fn authenticate(&self, headers: &HeaderMap) -> Option<String> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        if let Some(sha1) = value.strip_prefix("token ") {
            return self
                .tokens
                .iter()
                .find(|(_, token)| token.sha1 == sha1)
                .map(|(owner, _)| owner.clone());
        }
        let encoded = value.strip_prefix("Basic ")?;
        let decoded = String::from_utf8(STANDARD.decode(encoded).ok()?).ok()?;
        let (username, password) = decoded.split_once(':')?;
        let account = self.accounts.get(username)?;
        (account.password == password).then(|| username.to_string())
    }

    fn require_user(&self, headers: &HeaderMap) -> Result<String, StatusCode> {
        self.authenticate(headers).ok_or(StatusCode::UNAUTHORIZED)
    }

    fn require_admin(&self, headers: &HeaderMap) -> Result<String, StatusCode> {
        let username = self.require_user(headers)?;
        if self.is_admin(&username) {
            Ok(username)
        } else {
            Err(StatusCode::FORBIDDEN)
        }
    }

    fn is_admin(&self, username: &str) -> bool {
        self.accounts.get(username).is_some_and(|account| account.admin)
    }
}

/// Emails are only shown to authenticated callers.
fn visible(user: &User, viewer: Option<&str>) -> User {
    let mut user = user.clone();
    if viewer.is_none() {
        user.email.clear();
    }
    user
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    let api = Router::new()
        .route("/admin/users", post(create_user))
        .route("/admin/users/{username}", patch(edit_user).delete(delete_user))
        .route("/users/search", get(search_users))
        .route("/users/{username}", get(get_user))
        .route("/users/{username}/tokens", get(list_tokens).post(create_token))
        .route("/users/{username}/keys", get(list_keys))
        .route("/repos/search", get(search_repos))
        .route("/repos/{owner}/{name}", get(get_repo).delete(delete_repo))
        .route("/user/repos", get(list_repos).post(create_repo))
        .route("/user/keys", post(create_key))
        .route("/user/keys/{id}", get(get_key).delete(delete_key))
        .with_state(db);
    Router::new().nest("/api/v1", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- users ---

async fn create_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>), StatusCode> {
    let mut store = db.write().await;
    store.require_admin(&headers)?;
    if input.username.is_empty() || store.accounts.contains_key(&input.username) {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let full_name = input.full_name.unwrap_or_default();
    let user = store.add_account(&input.username, &input.email, &input.password, &full_name, false);
    Ok((StatusCode::CREATED, Json(user)))
}

async fn edit_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(username): Path<String>,
    Json(input): Json<EditUser>,
) -> Result<Json<User>, StatusCode> {
    let mut store = db.write().await;
    store.require_admin(&headers)?;
    let account = store.accounts.get_mut(&username).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(full_name) = input.full_name {
        account.user.full_name = full_name;
    }
    if let Some(email) = input.email {
        account.user.email = email;
    }
    if let Some(password) = input.password {
        account.password = password;
    }
    Ok(Json(account.user.clone()))
}

async fn delete_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    let admin = store.require_admin(&headers)?;
    if admin == username {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    store.accounts.remove(&username).ok_or(StatusCode::NOT_FOUND)?;
    store.repos.retain(|repo| repo.owner.username != username);
    store.tokens.retain(|(owner, _)| *owner != username);
    store.keys.retain(|_, (owner, _)| *owner != username);
    Ok(StatusCode::NO_CONTENT)
}

async fn search_users(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Json<SearchResults<User>> {
    let store = db.read().await;
    let viewer = store.authenticate(&headers);
    let needle = params.q.to_lowercase();
    let data = store
        .accounts
        .values()
        .filter(|account| account.user.username.to_lowercase().contains(&needle))
        .take(params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
        .map(|account| visible(&account.user, viewer.as_deref()))
        .collect();
    Json(SearchResults { ok: true, data })
}

async fn get_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Result<Json<User>, StatusCode> {
    let store = db.read().await;
    let viewer = store.authenticate(&headers);
    let account = store.accounts.get(&username).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(visible(&account.user, viewer.as_deref())))
}

// --- repositories ---

async fn search_repos(
    State(db): State<Db>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResults<Repository>> {
    let store = db.read().await;
    let needle = params.q.to_lowercase();
    let data = store
        .repos
        .iter()
        .filter(|repo| !repo.private)
        .filter(|repo| params.uid == 0 || repo.owner.id == params.uid)
        .filter(|repo| repo.name.to_lowercase().contains(&needle))
        .take(params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
        .cloned()
        .collect();
    Json(SearchResults { ok: true, data })
}

async fn create_repo(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateRepo>,
) -> Result<(StatusCode, Json<Repository>), StatusCode> {
    let mut store = db.write().await;
    let username = store.require_user(&headers)?;
    let owner = store.accounts.get(&username).map(|a| a.user.clone()).ok_or(StatusCode::UNAUTHORIZED)?;
    let taken = store
        .repos
        .iter()
        .any(|repo| repo.owner.username == username && repo.name == input.name);
    if input.name.is_empty() || taken {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let full_name = format!("{username}/{}", input.name);
    let repo = Repository {
        id: store.next_id(),
        owner,
        name: input.name,
        description: input.description,
        private: input.private,
        fork: false,
        html_url: format!("{PUBLIC_URL}/{full_name}"),
        clone_url: format!("{PUBLIC_URL}/{full_name}.git"),
        ssh_url: format!("git@localhost:{full_name}.git"),
        full_name,
    };
    store.repos.push(repo.clone());
    Ok((StatusCode::CREATED, Json(repo)))
}

async fn list_repos(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Vec<Repository>>, StatusCode> {
    let store = db.read().await;
    let username = store.require_user(&headers)?;
    let repos = store
        .repos
        .iter()
        .filter(|repo| repo.owner.username == username)
        .cloned()
        .collect();
    Ok(Json(repos))
}

async fn get_repo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((owner, name)): Path<(String, String)>,
) -> Result<Json<Repository>, StatusCode> {
    let store = db.read().await;
    let viewer = store.authenticate(&headers);
    let repo = store
        .repos
        .iter()
        .find(|repo| repo.owner.username == owner && repo.name == name)
        .ok_or(StatusCode::NOT_FOUND)?;
    let allowed = !repo.private
        || viewer
            .as_deref()
            .is_some_and(|viewer| viewer == owner || store.is_admin(viewer));
    if !allowed {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(repo.clone()))
}

async fn delete_repo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((owner, name)): Path<(String, String)>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    let viewer = store.require_user(&headers)?;
    if viewer != owner && !store.is_admin(&viewer) {
        return Err(StatusCode::FORBIDDEN);
    }
    let position = store
        .repos
        .iter()
        .position(|repo| repo.owner.username == owner && repo.name == name)
        .ok_or(StatusCode::NOT_FOUND)?;
    store.repos.remove(position);
    Ok(StatusCode::NO_CONTENT)
}

// --- tokens ---

async fn create_token(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(username): Path<String>,
    Json(input): Json<CreateToken>,
) -> Result<(StatusCode, Json<Token>), StatusCode> {
    let mut store = db.write().await;
    if store.require_user(&headers)? != username {
        return Err(StatusCode::FORBIDDEN);
    }
    if input.name.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let token = Token {
        name: input.name,
        sha1: Uuid::new_v4().simple().to_string(),
    };
    store.tokens.push((username, token.clone()));
    Ok((StatusCode::CREATED, Json(token)))
}

async fn list_tokens(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Result<Json<Vec<Token>>, StatusCode> {
    let store = db.read().await;
    if store.require_user(&headers)? != username {
        return Err(StatusCode::FORBIDDEN);
    }
    let tokens = store
        .tokens
        .iter()
        .filter(|(owner, _)| *owner == username)
        .map(|(_, token)| token.clone())
        .collect();
    Ok(Json(tokens))
}

// --- keys ---

async fn create_key(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateKey>,
) -> Result<(StatusCode, Json<PublicKey>), StatusCode> {
    let mut store = db.write().await;
    let username = store.require_user(&headers)?;
    if input.title.is_empty() || input.key.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let id = store.next_id();
    let key = PublicKey {
        id,
        key: input.key,
        url: format!("{PUBLIC_URL}/api/v1/user/keys/{id}"),
        title: input.title,
    };
    store.keys.insert(id, (username, key.clone()));
    Ok((StatusCode::CREATED, Json(key)))
}

async fn list_keys(State(db): State<Db>, Path(username): Path<String>) -> Result<Json<Vec<PublicKey>>, StatusCode> {
    let store = db.read().await;
    if !store.accounts.contains_key(&username) {
        return Err(StatusCode::NOT_FOUND);
    }
    let keys = store
        .keys
        .values()
        .filter(|(owner, _)| *owner == username)
        .map(|(_, key)| key.clone())
        .collect();
    Ok(Json(keys))
}

async fn get_key(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<PublicKey>, StatusCode> {
    let store = db.read().await;
    let username = store.require_user(&headers)?;
    match store.keys.get(&id) {
        Some((owner, key)) if *owner == username => Ok(Json(key.clone())),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn delete_key(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    let username = store.require_user(&headers)?;
    let owned = store.keys.get(&id).is_some_and(|(owner, _)| *owner == username);
    if !owned {
        return Err(StatusCode::NOT_FOUND);
    }
    store.keys.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn basic(username: &str, password: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = format!("Basic {}", STANDARD.encode(format!("{username}:{password}")));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
        headers
    }

    #[test]
    fn seeded_admin_authenticates_with_basic() {
        let store = Store::seeded();
        assert_eq!(
            store.authenticate(&basic(ADMIN_USERNAME, ADMIN_PASSWORD)).as_deref(),
            Some(ADMIN_USERNAME)
        );
        assert!(store.authenticate(&basic(ADMIN_USERNAME, "wrong")).is_none());
        assert!(store.authenticate(&HeaderMap::new()).is_none());
    }

    #[test]
    fn token_authenticates_its_owner() {
        let mut store = Store::seeded();
        store.tokens.push((
            ADMIN_USERNAME.to_string(),
            Token {
                name: "ci".to_string(),
                sha1: "abc".to_string(),
            },
        ));
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("token abc"));
        assert_eq!(store.authenticate(&headers).as_deref(), Some(ADMIN_USERNAME));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("token nope"));
        assert!(store.authenticate(&headers).is_none());
    }

    #[test]
    fn non_admin_cannot_administer() {
        let mut store = Store::seeded();
        store.add_account("alice", "a@x.com", "secret", "", false);
        assert_eq!(store.require_admin(&basic("alice", "secret")), Err(StatusCode::FORBIDDEN));
        assert_eq!(store.require_admin(&HeaderMap::new()), Err(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn anonymous_viewers_do_not_see_email() {
        let user = User {
            email: "a@x.com".to_string(),
            ..User::default()
        };
        assert!(visible(&user, None).email.is_empty());
        assert_eq!(visible(&user, Some("bob")).email, "a@x.com");
    }

    #[test]
    fn create_user_payload_defaults() {
        let input: CreateUser =
            serde_json::from_str(r#"{"username":"alice","email":"a@x.com","password":"secret"}"#).unwrap();
        assert!(!input.send_notify);
        assert!(input.full_name.is_none());
    }
}
