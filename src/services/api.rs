// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ClubRank REST API client.
//!
//! A direct request/response mapping onto the backend:
//! - JSON content type on every request, bearer token when supplied
//! - Non-2xx responses become errors carrying the body text
//! - Empty or unparseable success bodies decode as an empty result
//! - One attempt per call (no retry, no backoff)

use crate::error::{ClientError, Result};
use crate::models::stats::UserStats;
use chrono::{DateTime, Utc};
use reqwest::{header, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Avatar selector sent with credentials before the user picks one.
pub const DEFAULT_AVATAR_ID: &str = "default";

/// ClubRank API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against a backend origin (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    // ─── Auth ────────────────────────────────────────────────────

    /// Exchange credentials for a token and user.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = serde_json::json!({
            "username": username,
            "password": password,
            "avatar_id": DEFAULT_AVATAR_ID,
        });
        let value = self.send(Method::POST, "/login", Some(body), None).await?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::MalformedResponse(format!("login response: {}", e)))
    }

    /// Create an account. Does not establish a session.
    pub async fn signup(&self, username: &str, password: &str, avatar_id: &str) -> Result<()> {
        let body = serde_json::json!({
            "username": username,
            "password": password,
            "avatar_id": avatar_id,
        });
        self.send(Method::POST, "/signup", Some(body), None).await?;
        Ok(())
    }

    pub async fn update_avatar(&self, token: &str, avatar_id: &str) -> Result<()> {
        let body = serde_json::json!({ "avatar_id": avatar_id });
        self.send(Method::PUT, "/users/avatar", Some(body), Some(token))
            .await?;
        Ok(())
    }

    // ─── Clubs ───────────────────────────────────────────────────

    /// List the caller's clubs. A non-array body yields no clubs.
    pub async fn my_clubs(&self, token: &str) -> Result<Vec<BackendClub>> {
        let value = self.send(Method::GET, "/clubs", None, Some(token)).await?;
        Ok(decode_list(value, "clubs"))
    }

    pub async fn create_club(&self, token: &str, club: &NewClub) -> Result<Option<BackendClub>> {
        let body = serde_json::to_value(club).map_err(|e| ClientError::Internal(e.into()))?;
        let value = self
            .send(Method::POST, "/clubs", Some(body), Some(token))
            .await?;
        Ok(serde_json::from_value(value).ok())
    }

    pub async fn add_member(&self, token: &str, club_id: &str) -> Result<()> {
        let path = format!("/clubs/{}/members", urlencoding::encode(club_id));
        self.send(Method::POST, &path, None, Some(token)).await?;
        Ok(())
    }

    pub async fn leave_club(&self, token: &str, club_id: &str) -> Result<()> {
        let path = format!("/clubs/{}/members", urlencoding::encode(club_id));
        self.send(Method::DELETE, &path, None, Some(token)).await?;
        Ok(())
    }

    // ─── Leaderboard / Stats ─────────────────────────────────────

    pub async fn leaderboard(
        &self,
        token: &str,
        club_id: &str,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>> {
        let path = format!(
            "/clubs/{}/leaderboard?limit={}",
            urlencoding::encode(club_id),
            limit
        );
        let value = self.send(Method::GET, &path, None, Some(token)).await?;
        Ok(decode_list(value, "leaderboard"))
    }

    pub async fn increment_score(&self, token: &str, club_id: &str) -> Result<()> {
        let path = format!("/clubs/{}/leaderboard/score", urlencoding::encode(club_id));
        self.send(Method::POST, &path, None, Some(token)).await?;
        Ok(())
    }

    /// Caller's stats in a club. An empty body yields default stats.
    pub async fn user_stats(&self, token: &str, club_id: &str) -> Result<UserStats> {
        let path = format!("/clubs/{}/stats/me", urlencoding::encode(club_id));
        let value = self.send(Method::GET, &path, None, Some(token)).await?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    // ─── Messages ────────────────────────────────────────────────

    /// Paged message history, newest first.
    pub async fn club_messages(
        &self,
        token: &str,
        club_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<BackendMessage>> {
        let path = format!(
            "/clubs/{}/messages?limit={}&offset={}",
            urlencoding::encode(club_id),
            limit,
            offset
        );
        let value = self.send(Method::GET, &path, None, Some(token)).await?;
        Ok(decode_list(value, "messages"))
    }

    pub async fn send_message(&self, token: &str, club_id: &str, text: &str) -> Result<()> {
        let path = format!("/clubs/{}/messages", urlencoding::encode(club_id));
        let body = serde_json::json!({ "message": text });
        self.send(Method::POST, &path, Some(body), Some(token))
            .await?;
        Ok(())
    }

    // ─── Transport ───────────────────────────────────────────────

    /// Perform a single request and return the parsed body.
    ///
    /// Returns `Value::Null` for an empty or non-JSON success body.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, path, "API request");

        let mut request = self
            .http
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        self.check_response(response).await
    }

    /// Check response status and parse the body.
    async fn check_response(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = if text.is_empty() {
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| status.as_u16().to_string())
            } else {
                text
            };

            if status.as_u16() == 401 {
                tracing::warn!("API rejected bearer token (401)");
                return Err(ClientError::Unauthorized(message));
            }

            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring non-JSON response body");
                Ok(Value::Null)
            }
        }
    }
}

/// Decode a list body; anything but an array decodes as empty.
fn decode_list<T: DeserializeOwned>(value: Value, what: &str) -> Vec<T> {
    if !value.is_array() {
        return Vec::new();
    }
    match serde_json::from_value(value) {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(error = %e, what, "Malformed list response, treating as empty");
            Vec::new()
        }
    }
}

/// Login response from the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub token: String,
    pub user: BackendUser,
}

/// User summary embedded in several responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendUser {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar_id: Option<String>,
}

/// Create-club request body.
#[derive(Debug, Clone, Serialize)]
pub struct NewClub {
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    /// Unit-of-progress label
    pub action: String,
}

/// Club as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendClub {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub number_of_members: u32,
    #[serde(default)]
    pub created_by: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Leaderboard row as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user: BackendUser,
    pub score: i64,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub last_checkedin: Option<DateTime<Utc>>,
}

/// Chat message as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendMessage {
    #[serde(default)]
    pub id: Option<u64>,
    pub user: BackendUser,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// "user" or "system"
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}
