// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process fake ClubRank backend for integration tests.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use clubrank_client::config::Config;
use clubrank_client::services::RecordingNotifier;
use clubrank_client::storage::MemoryStore;
use clubrank_client::AppStore;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// Fault switches understood by the fake backend.
pub mod faults {
    pub const LOGIN: &str = "login";
    pub const CREATE_CLUB: &str = "create_club";
    pub const JOIN: &str = "join";
    /// Leave fails with an empty 500 body
    pub const LEAVE: &str = "leave";
    pub const SCORE: &str = "score";
    pub const SEND: &str = "send";
    pub const AVATAR: &str = "avatar";
    pub const MESSAGES: &str = "messages";
    /// GET /clubs answers with a JSON object instead of an array
    pub const CLUBS_NOT_ARRAY: &str = "clubs_not_array";
    /// POST /signup answers 200 with an empty body
    pub const SIGNUP_EMPTY_BODY: &str = "signup_empty_body";
}

#[derive(Debug, Clone)]
pub struct FakeUser {
    pub id: u64,
    pub username: String,
    pub password: String,
    pub avatar_id: String,
}

#[derive(Debug, Clone)]
pub struct FakeClub {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub action: String,
    pub members: Vec<u64>,
}

#[derive(Debug, Clone)]
pub struct FakeMessage {
    pub id: u64,
    pub user_id: u64,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub system: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreRow {
    pub score: i64,
    pub streak: u32,
    pub last_checkedin: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub uri: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Default)]
pub struct Backend {
    pub users: Vec<FakeUser>,
    pub clubs: Vec<FakeClub>,
    pub scores: HashMap<(u64, u64), ScoreRow>,
    /// Per club, oldest first
    pub messages: HashMap<u64, Vec<FakeMessage>>,
    /// Tokens no longer accepted
    pub revoked: HashSet<String>,
    pub faults: HashSet<&'static str>,
    pub requests: Vec<RecordedRequest>,
    next_id: u64,
}

impl Backend {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_user(&mut self, username: &str, password: &str) -> u64 {
        let id = self.next_id();
        self.users.push(FakeUser {
            id,
            username: username.to_string(),
            password: password.to_string(),
            avatar_id: "default".to_string(),
        });
        id
    }

    pub fn add_club(&mut self, name: &str, action: &str, members: &[u64]) -> u64 {
        let id = self.next_id();
        self.clubs.push(FakeClub {
            id,
            name: name.to_string(),
            description: None,
            action: action.to_string(),
            members: members.to_vec(),
        });
        for user_id in members {
            self.scores.insert((id, *user_id), ScoreRow::default());
        }
        id
    }

    pub fn add_message(&mut self, club_id: u64, user_id: u64, text: &str, system: bool) {
        let id = self.next_id();
        let timestamp = Utc::now() + chrono::Duration::milliseconds(id as i64);
        self.messages.entry(club_id).or_default().push(FakeMessage {
            id,
            user_id,
            text: text.to_string(),
            timestamp,
            system,
        });
    }

    pub fn set_score(&mut self, club_id: u64, user_id: u64, score: i64, streak: u32) {
        let row = self.scores.entry((club_id, user_id)).or_default();
        row.score = score;
        row.streak = streak;
    }

    pub fn club(&self, club_id: u64) -> Option<&FakeClub> {
        self.clubs.iter().find(|c| c.id == club_id)
    }

    fn user(&self, user_id: u64) -> Option<&FakeUser> {
        self.users.iter().find(|u| u.id == user_id)
    }

    fn user_json(&self, user_id: u64) -> Value {
        match self.user(user_id) {
            Some(u) => json!({"id": u.id, "username": u.username, "avatar_id": u.avatar_id}),
            None => json!({"id": 0, "username": "system", "avatar_id": ""}),
        }
    }

    fn club_json(&self, club: &FakeClub) -> Value {
        json!({
            "id": club.id,
            "name": club.name,
            "description": club.description,
            "action": club.action,
            "is_private": false,
            "number_of_members": club.members.len(),
            "created_by": club.members.first().copied().unwrap_or(0),
            "created_at": "2024-01-01T00:00:00Z",
        })
    }

    /// Requests that reached the backend, as "METHOD uri".
    pub fn request_lines(&self) -> Vec<String> {
        self.requests
            .iter()
            .map(|r| format!("{} {}", r.method, r.uri))
            .collect()
    }
}

pub type Shared = Arc<Mutex<Backend>>;

pub struct TestServer {
    pub base_url: String,
    state: Shared,
}

impl TestServer {
    pub fn backend(&self) -> MutexGuard<'_, Backend> {
        self.state.lock().unwrap()
    }

    pub fn fail(&self, fault: &'static str) {
        self.backend().faults.insert(fault);
    }

    pub fn heal(&self, fault: &'static str) {
        self.backend().faults.remove(fault);
    }
}

/// Start the fake backend on an ephemeral port.
pub async fn spawn_backend() -> TestServer {
    let state: Shared = Arc::new(Mutex::new(Backend::default()));
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{}", addr),
        state,
    }
}

/// Store wired to `server` with in-memory storage and a recording notifier.
pub fn test_store(server: &TestServer) -> (AppStore, MemoryStore, RecordingNotifier) {
    let storage = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let store = open_store(server, &storage, &notifier);
    (store, storage, notifier)
}

/// Open a store over existing storage (simulates an app restart).
pub fn open_store(
    server: &TestServer,
    storage: &MemoryStore,
    notifier: &RecordingNotifier,
) -> AppStore {
    let config = Config::with_base_url(&server.base_url).unwrap();
    AppStore::open(config, Arc::new(storage.clone()), Arc::new(notifier.clone())).unwrap()
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/users/avatar", put(update_avatar))
        .route("/clubs", get(my_clubs).post(create_club))
        .route("/clubs/{id}/members", post(join_club).delete(leave_club))
        .route("/clubs/{id}/leaderboard", get(leaderboard))
        .route("/clubs/{id}/leaderboard/score", post(increment_score))
        .route("/clubs/{id}/stats/me", get(stats_me))
        .route("/clubs/{id}/messages", get(messages).post(send_message))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    // Scoped so no borrow of the request lives across the await
    let recorded = {
        let header_str = |name: header::HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        RecordedRequest {
            method: request.method().to_string(),
            uri: request.uri().to_string(),
            authorization: header_str(header::AUTHORIZATION),
            content_type: header_str(header::CONTENT_TYPE),
        }
    };
    state.lock().unwrap().requests.push(recorded);
    next.run(request).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Resolve the bearer token to a user id.
fn authenticate(backend: &Backend, headers: &HeaderMap) -> Result<u64, Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "missing token"))?;
    if backend.revoked.contains(token) {
        return Err(error(StatusCode::UNAUTHORIZED, "token revoked"));
    }
    token
        .strip_prefix("token-")
        .and_then(|id| id.parse().ok())
        .filter(|id| backend.user(*id).is_some())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "invalid token"))
}

macro_rules! auth {
    ($backend:expr, $headers:expr) => {
        match authenticate(&$backend, &$headers) {
            Ok(id) => id,
            Err(resp) => return resp,
        }
    };
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let backend = state.lock().unwrap();
    if backend.faults.contains(faults::LOGIN) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "login unavailable");
    }
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match backend
        .users
        .iter()
        .find(|u| u.username == username && u.password == password)
    {
        Some(user) => Json(json!({
            "message": "login successful",
            "token": format!("token-{}", user.id),
            "user": {"id": user.id, "username": user.username, "avatar_id": user.avatar_id},
        }))
        .into_response(),
        None => error(StatusCode::UNAUTHORIZED, "invalid credentials"),
    }
}

async fn signup(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut backend = state.lock().unwrap();
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    if username.is_empty() || password.is_empty() {
        return error(StatusCode::BAD_REQUEST, "could not parse data");
    }
    if backend.users.iter().any(|u| u.username == username) {
        return error(StatusCode::CONFLICT, "username already taken");
    }
    backend.add_user(&username, &password);
    if backend.faults.contains(faults::SIGNUP_EMPTY_BODY) {
        return StatusCode::OK.into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({"message": "user created successfully"})),
    )
        .into_response()
}

async fn update_avatar(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    let user_id = auth!(backend, headers);
    if backend.faults.contains(faults::AVATAR) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "avatar update failed");
    }
    let avatar_id = body["avatar_id"].as_str().unwrap_or_default().to_string();
    if let Some(user) = backend.users.iter_mut().find(|u| u.id == user_id) {
        user.avatar_id = avatar_id;
    }
    Json(json!({"message": "avatar updated"})).into_response()
}

async fn my_clubs(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let backend = state.lock().unwrap();
    let user_id = auth!(backend, headers);
    if backend.faults.contains(faults::CLUBS_NOT_ARRAY) {
        return Json(json!({"clubs": "not an array"})).into_response();
    }
    let clubs: Vec<Value> = backend
        .clubs
        .iter()
        .filter(|c| c.members.contains(&user_id))
        .map(|c| backend.club_json(c))
        .collect();
    Json(Value::Array(clubs)).into_response()
}

async fn create_club(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    let user_id = auth!(backend, headers);
    if backend.faults.contains(faults::CREATE_CLUB) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "could not create club");
    }
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let action = body["action"].as_str().unwrap_or_default().to_string();
    if name.is_empty() || action.is_empty() {
        return error(StatusCode::BAD_REQUEST, "could not parse data");
    }
    let club_id = backend.add_club(&name, &action, &[user_id]);
    let description = body["description"].as_str().map(str::to_string);
    let club = backend
        .clubs
        .iter_mut()
        .find(|c| c.id == club_id)
        .unwrap();
    club.description = description;
    let club = club.clone();
    (StatusCode::CREATED, Json(backend.club_json(&club))).into_response()
}

async fn join_club(
    State(state): State<Shared>,
    Path(club_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let mut backend = state.lock().unwrap();
    let user_id = auth!(backend, headers);
    if backend.faults.contains(faults::JOIN) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "join failed");
    }
    let Some(club) = backend.clubs.iter_mut().find(|c| c.id == club_id) else {
        return error(StatusCode::NOT_FOUND, "club not found");
    };
    if club.members.contains(&user_id) {
        return error(StatusCode::CONFLICT, "already a member");
    }
    club.members.push(user_id);
    backend.scores.insert((club_id, user_id), ScoreRow::default());
    let username = backend.user(user_id).map(|u| u.username.clone()).unwrap_or_default();
    backend.add_message(club_id, 0, &format!("{} joined the club", username), true);
    Json(json!({"message": "joined club"})).into_response()
}

async fn leave_club(
    State(state): State<Shared>,
    Path(club_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let mut backend = state.lock().unwrap();
    let user_id = auth!(backend, headers);
    if backend.faults.contains(faults::LEAVE) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let Some(club) = backend.clubs.iter_mut().find(|c| c.id == club_id) else {
        return error(StatusCode::NOT_FOUND, "club not found");
    };
    club.members.retain(|m| *m != user_id);
    backend.scores.remove(&(club_id, user_id));
    Json(json!({"message": "left club"})).into_response()
}

async fn leaderboard(
    State(state): State<Shared>,
    Path(club_id): Path<u64>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let backend = state.lock().unwrap();
    auth!(backend, headers);
    let limit: usize = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(50);

    let mut rows: Vec<(&u64, &ScoreRow)> = backend
        .scores
        .iter()
        .filter(|((c, _), _)| *c == club_id)
        .map(|((_, u), row)| (u, row))
        .collect();
    rows.sort_by(|a, b| b.1.score.cmp(&a.1.score).then(a.0.cmp(b.0)));

    let entries: Vec<Value> = rows
        .into_iter()
        .take(limit)
        .map(|(user_id, row)| {
            json!({
                "user": backend.user_json(*user_id),
                "score": row.score,
                "current_streak": row.streak,
                "longest_streak": row.streak,
                "last_checkedin": row.last_checkedin,
            })
        })
        .collect();
    Json(Value::Array(entries)).into_response()
}

async fn increment_score(
    State(state): State<Shared>,
    Path(club_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let mut backend = state.lock().unwrap();
    let user_id = auth!(backend, headers);
    if backend.faults.contains(faults::SCORE) {
        return error(StatusCode::TOO_MANY_REQUESTS, "cooldown active");
    }
    let Some(row) = backend.scores.get_mut(&(club_id, user_id)) else {
        return error(StatusCode::NOT_FOUND, "leaderboard entry not found");
    };
    row.score += 1;
    row.streak = row.streak.max(1);
    row.last_checkedin = Some(Utc::now());
    Json(json!({"message": "score updated"})).into_response()
}

async fn stats_me(
    State(state): State<Shared>,
    Path(club_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let backend = state.lock().unwrap();
    let user_id = auth!(backend, headers);
    let Some(row) = backend.scores.get(&(club_id, user_id)) else {
        return error(StatusCode::NOT_FOUND, "leaderboard entry not found");
    };
    let rank = 1 + backend
        .scores
        .iter()
        .filter(|((c, _), other)| *c == club_id && other.score > row.score)
        .count();
    let user = backend.user(user_id).cloned().unwrap();
    Json(json!({
        "user_id": user.id,
        "username": user.username,
        "avatar_id": user.avatar_id,
        "score": row.score,
        "current_streak": row.streak,
        "longest_streak": row.streak,
        "rank": rank,
        "graph_data": [
            {"day": "Mon", "scores": {"You": 1, "leader": 4}},
            {"day": "Tue", "scores": {"You": row.score}},
        ],
    }))
    .into_response()
}

async fn messages(
    State(state): State<Shared>,
    Path(club_id): Path<u64>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let backend = state.lock().unwrap();
    auth!(backend, headers);
    if backend.faults.contains(faults::MESSAGES) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "messages unavailable");
    }
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(50);
    let offset: usize = params.get("offset").and_then(|o| o.parse().ok()).unwrap_or(0);

    let page: Vec<Value> = backend
        .messages
        .get(&club_id)
        .map(|msgs| {
            msgs.iter()
                .rev()
                .skip(offset)
                .take(limit)
                .map(|m| {
                    json!({
                        "id": m.id,
                        "user": backend.user_json(m.user_id),
                        "message": m.text,
                        "timestamp": m.timestamp,
                        "type": if m.system { "system" } else { "user" },
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    Json(Value::Array(page)).into_response()
}

async fn send_message(
    State(state): State<Shared>,
    Path(club_id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    let user_id = auth!(backend, headers);
    if backend.faults.contains(faults::SEND) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "send failed");
    }
    let text = body["message"].as_str().unwrap_or_default().to_string();
    if text.is_empty() {
        return error(StatusCode::BAD_REQUEST, "could not parse data");
    }
    backend.add_message(club_id, user_id, &text, false);
    (StatusCode::CREATED, Json(json!({"message": "message sent"}))).into_response()
}
