// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application store: the session context shared by every screen.
//!
//! Each mutation calls the backend, then reads back the affected lists:
//! 1. Call the mutating endpoint
//! 2. On success, refresh the club list or the club's data
//! 3. On failure, log, notify the user and leave the cache as it was
//!
//! Any call rejected with 401 ends the session.

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{Club, Member, Message, SessionUser, Theme, UserStats};
use crate::models::message::oldest_first;
use crate::services::api::NewClub;
use crate::services::{ApiClient, ClubCache, Notifier, SessionStore};
use crate::storage::{keys, KeyValueStore};
use std::sync::Arc;

pub struct AppStore {
    config: Config,
    api: ApiClient,
    session: SessionStore,
    cache: ClubCache,
    theme: Theme,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
}

impl AppStore {
    /// Open the store, restoring the persisted session and theme.
    ///
    /// The club cache starts empty; call `refresh_clubs` for the initial
    /// load when a session was restored.
    pub fn open(
        config: Config,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let session = SessionStore::restore(storage.clone())?;
        let theme = storage
            .get(keys::THEME)?
            .and_then(|v| Theme::parse(&v))
            .unwrap_or(config.default_theme);

        Ok(Self {
            api: ApiClient::new(config.api_base_url.clone()),
            config,
            session,
            cache: ClubCache::new(),
            theme,
            storage,
            notifier,
        })
    }

    // ─── Accessors ───────────────────────────────────────────────

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.session.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn cache(&self) -> &ClubCache {
        &self.cache
    }

    pub fn clubs(&self) -> &[Club] {
        self.cache.clubs()
    }

    pub fn members(&self, club_id: &str) -> &[Member] {
        self.cache.members(club_id)
    }

    pub fn messages(&self, club_id: &str) -> &[Message] {
        self.cache.messages(club_id)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    // ─── Session ─────────────────────────────────────────────────

    /// Log in. Failures propagate to the caller for inline display.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        if let Err(e) = self.session.login(&self.api, username, password).await {
            tracing::warn!(username, error = %e, "Login failed");
            return Err(e);
        }
        Ok(())
    }

    /// Create an account and log straight into it.
    pub async fn signup(&mut self, username: &str, password: &str) -> Result<()> {
        if let Err(e) = self.session.signup(&self.api, username, password).await {
            tracing::warn!(username, error = %e, "Signup failed");
            return Err(e);
        }
        Ok(())
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.cache.clear();
    }

    /// Set the avatar selector. Anonymous calls return without a notice.
    pub async fn update_avatar(&mut self, avatar_id: &str) -> Result<()> {
        self.session.require_token()?;
        if let Err(e) = self.session.update_avatar(&self.api, avatar_id).await {
            self.handle_failure(&e, "Failed to update avatar");
            return Err(e);
        }
        Ok(())
    }

    /// Flip and persist the theme preference.
    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(e) = self.storage.set(keys::THEME, theme.as_str()) {
            tracing::error!(error = %e, "Failed to persist theme");
        }
    }

    // ─── Clubs ───────────────────────────────────────────────────

    /// Replace the club list with the backend's current list.
    pub async fn refresh_clubs(&mut self) -> Result<()> {
        let token = self.session.require_token()?;
        match self.api.my_clubs(&token).await {
            Ok(clubs) => {
                let clubs: Vec<Club> = clubs.into_iter().map(Club::from_backend).collect();
                tracing::debug!(count = clubs.len(), "Clubs refreshed");
                self.cache.replace_clubs(clubs);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load clubs");
                self.end_session_if_unauthorized(&e);
                Err(e)
            }
        }
    }

    /// Create a club, then refresh the club list.
    pub async fn create_club(&mut self, name: &str, description: &str, unit_label: &str) {
        let token = match self.session.require_token() {
            Ok(token) => token,
            Err(_) => return,
        };
        let club = NewClub {
            name: name.to_string(),
            description: Some(description.to_string()).filter(|d| !d.is_empty()),
            is_private: false,
            action: unit_label.to_string(),
        };

        match self.api.create_club(&token, &club).await {
            Ok(created) => {
                tracing::info!(club_id = ?created.map(|c| c.id), name, "Club created");
                let _ = self.refresh_clubs().await;
            }
            Err(e) => self.handle_failure(&e, "Failed to create club"),
        }
    }

    /// Join a club, then refresh the club list. Failures are only notified.
    pub async fn join_club(&mut self, club_id: &str) {
        let token = match self.session.require_token() {
            Ok(token) => token,
            Err(_) => return,
        };
        match self.api.add_member(&token, club_id).await {
            Ok(()) => {
                tracing::info!(club_id, "Joined club");
                let _ = self.refresh_clubs().await;
            }
            Err(e) => self.handle_failure(&e, "Failed to join club"),
        }
    }

    /// Leave a club, then refresh the club list. Failures are notified and
    /// returned so the caller can stay on the club screen.
    pub async fn leave_club(&mut self, club_id: &str) -> Result<()> {
        let token = self.session.require_token()?;
        match self.api.leave_club(&token, club_id).await {
            Ok(()) => {
                tracing::info!(club_id, "Left club");
                let _ = self.refresh_clubs().await;
                Ok(())
            }
            Err(e) => {
                self.handle_failure(&e, "Failed to leave club");
                Err(e)
            }
        }
    }

    // ─── Club Data ───────────────────────────────────────────────

    /// Reload a club's leaderboard and messages, replacing both together.
    ///
    /// If either read fails the previous data is kept.
    pub async fn load_club_data(&mut self, club_id: &str) -> Result<()> {
        let token = self.session.require_token()?;

        let reads = tokio::try_join!(
            self.api
                .leaderboard(&token, club_id, self.config.leaderboard_limit),
            self.api
                .club_messages(&token, club_id, self.config.message_page_size, 0),
        );

        match reads {
            Ok((leaderboard, page)) => {
                let now = chrono::Utc::now();
                let members: Vec<Member> = leaderboard
                    .into_iter()
                    .map(|entry| Member::from_entry(club_id, entry, now))
                    .collect();
                let messages = oldest_first(page);
                tracing::debug!(
                    club_id,
                    members = members.len(),
                    messages = messages.len(),
                    "Club data loaded"
                );
                self.cache.replace_club_data(club_id, members, messages);
                Ok(())
            }
            Err(e) => {
                tracing::error!(club_id, error = %e, "Error loading club data");
                self.end_session_if_unauthorized(&e);
                Err(e)
            }
        }
    }

    /// Increment the caller's score, then reload the club's data.
    ///
    /// Returns whether the increment itself succeeded.
    pub async fn increment_score(&mut self, club_id: &str) -> bool {
        let token = match self.session.require_token() {
            Ok(token) => token,
            Err(_) => return false,
        };
        match self.api.increment_score(&token, club_id).await {
            Ok(()) => {
                tracing::info!(club_id, "Score incremented");
                let _ = self.load_club_data(club_id).await;
                true
            }
            Err(e) => {
                self.handle_failure(&e, "Failed to update score");
                false
            }
        }
    }

    /// Post a message, then reload the club's data. Blank text is ignored.
    pub async fn send_message(&mut self, club_id: &str, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let token = match self.session.require_token() {
            Ok(token) => token,
            Err(_) => return,
        };
        match self.api.send_message(&token, club_id, text).await {
            Ok(()) => {
                tracing::debug!(club_id, "Message sent");
                let _ = self.load_club_data(club_id).await;
            }
            Err(e) => self.handle_failure(&e, "Failed to send message"),
        }
    }

    /// Caller's stats for a club. Not cached.
    pub async fn fetch_stats(&mut self, club_id: &str) -> Result<UserStats> {
        let token = self.session.require_token()?;
        match self.api.user_stats(&token, club_id).await {
            Ok(stats) => Ok(stats),
            Err(e) => {
                tracing::error!(club_id, error = %e, "Failed to fetch stats");
                self.end_session_if_unauthorized(&e);
                Err(e)
            }
        }
    }

    // ─── Failure Handling ────────────────────────────────────────

    /// Log a failed mutation and notify the user.
    fn handle_failure(&mut self, err: &ClientError, notice: &str) {
        tracing::error!(error = %err, "{}", notice);
        self.end_session_if_unauthorized(err);
        self.notifier.notify(notice);
    }

    fn end_session_if_unauthorized(&mut self, err: &ClientError) {
        if err.is_unauthorized() && self.session.is_authenticated() {
            tracing::warn!("Session rejected by backend, logging out");
            self.logout();
        }
    }
}
