// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard row model.

use crate::models::user::initials;
use crate::services::api::LeaderboardEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const UNKNOWN_USERNAME: &str = "Unknown";

/// One (club, user) leaderboard row. Score and streak are backend-owned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: String,
    pub username: String,
    pub avatar_initials: String,
    pub avatar_id: Option<String>,
    pub club_id: String,
    pub score: i64,
    pub last_update: DateTime<Utc>,
    /// Consecutive-day streak
    pub streak: u32,
}

impl Member {
    /// Map a backend row. A missing check-in time reads as `now`.
    pub fn from_entry(club_id: &str, entry: LeaderboardEntry, now: DateTime<Utc>) -> Self {
        let username = if entry.user.username.is_empty() {
            UNKNOWN_USERNAME.to_string()
        } else {
            entry.user.username
        };
        Self {
            user_id: entry.user.id.to_string(),
            avatar_initials: initials(&username),
            username,
            avatar_id: entry.user.avatar_id,
            club_id: club_id.to_string(),
            score: entry.score,
            last_update: entry.last_checkedin.unwrap_or(now),
            streak: entry.current_streak,
        }
    }
}
