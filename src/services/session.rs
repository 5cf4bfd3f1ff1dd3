// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session store.
//!
//! Two states: anonymous (no token, no user) and authenticated (token and
//! user present and durably persisted). Token and user are always written
//! and cleared together.

use crate::error::{ClientError, Result};
use crate::models::SessionUser;
use crate::services::api::{ApiClient, DEFAULT_AVATAR_ID};
use crate::storage::{keys, KeyValueStore};
use std::sync::Arc;

/// Authenticated session: the bearer token and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Session {
    token: String,
    user: SessionUser,
}

pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    session: Option<Session>,
}

impl SessionStore {
    /// Restore the session persisted in `storage`.
    ///
    /// A half-written pair (token without user, or the reverse) or an
    /// unparseable user is cleared and the store starts anonymous.
    pub fn restore(storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let token = storage.get(keys::TOKEN)?;
        let user = storage.get(keys::USER)?;

        let session = match (token, user) {
            (Some(token), Some(user_json)) => match serde_json::from_str::<SessionUser>(&user_json)
            {
                Ok(user) => Some(Session { token, user }),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to parse persisted user");
                    None
                }
            },
            (None, None) => return Ok(Self { storage, session: None }),
            _ => {
                tracing::warn!("Persisted session incomplete");
                None
            }
        };

        if session.is_none() {
            storage.remove_all(&[keys::TOKEN, keys::USER])?;
        } else {
            tracing::debug!("Restored persisted session");
        }

        Ok(Self { storage, session })
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Token for an authenticated-only call.
    pub fn require_token(&self) -> Result<String> {
        self.token()
            .map(str::to_string)
            .ok_or(ClientError::NotAuthenticated)
    }

    /// Log in and persist the session. On failure the state is unchanged.
    pub async fn login(
        &mut self,
        api: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<&SessionUser> {
        let res = api.login(username, password).await?;

        let mut user = SessionUser::new(res.user.id.to_string(), res.user.username);
        user.avatar_id = res.user.avatar_id;

        let session = Session {
            token: res.token,
            user,
        };
        self.persist(&session)?;

        tracing::info!(user_id = %session.user.id, "Logged in");
        Ok(&self.session.insert(session).user)
    }

    /// Create an account, then log in with the same credentials.
    pub async fn signup(
        &mut self,
        api: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<&SessionUser> {
        api.signup(username, password, DEFAULT_AVATAR_ID).await?;
        tracing::info!(username, "Account created");
        self.login(api, username, password).await
    }

    /// Set the avatar selector. On failure the cached avatar is unchanged.
    pub async fn update_avatar(&mut self, api: &ApiClient, avatar_id: &str) -> Result<()> {
        let current = self.session.as_ref().ok_or(ClientError::NotAuthenticated)?;
        api.update_avatar(&current.token, avatar_id).await?;

        let mut updated = current.clone();
        updated.user.avatar_id = Some(avatar_id.to_string());
        self.persist(&updated)?;
        self.session = Some(updated);

        tracing::info!(avatar_id, "Avatar updated");
        Ok(())
    }

    /// Clear the persisted and in-memory session. Never fails.
    pub fn logout(&mut self) {
        if let Err(e) = self.storage.remove_all(&[keys::TOKEN, keys::USER]) {
            tracing::error!(error = %e, "Failed to clear persisted session");
        }
        if self.session.take().is_some() {
            tracing::info!("Logged out");
        }
    }

    fn persist(&self, session: &Session) -> Result<()> {
        let user_json =
            serde_json::to_string(&session.user).map_err(|e| ClientError::Internal(e.into()))?;
        self.storage
            .set_all(&[(keys::TOKEN, &session.token), (keys::USER, &user_json)])
    }
}
