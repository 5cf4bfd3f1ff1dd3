// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-club personal statistics.
//!
//! Computed entirely by the backend; the client only reshapes the daily
//! series for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key the backend uses for the caller's own score in each graph point.
pub const SELF_SERIES_KEY: &str = "You";

/// Caller's stats in one club (`GET /clubs/{id}/stats/me`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    // ─── Identity ────────────────────────────────────────────────
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar_id: Option<String>,

    // ─── Score ───────────────────────────────────────────────────
    #[serde(default)]
    pub score: i64,
    /// 1-based position on the club leaderboard
    #[serde(default)]
    pub rank: u32,
    /// Preformatted percentile, when the backend provides one
    #[serde(default)]
    pub percentile: Option<String>,

    // ─── Streaks ─────────────────────────────────────────────────
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default, rename = "last_checkedin")]
    pub last_checked_in: Option<DateTime<Utc>>,
    #[serde(default, rename = "next_checkin")]
    pub next_check_in: Option<DateTime<Utc>>,

    // ─── Time Series ─────────────────────────────────────────────
    /// Last seven days, oldest first
    #[serde(default)]
    pub graph_data: Vec<GraphDataPoint>,
}

/// Scores for one day, keyed by username (the caller under `"You"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDataPoint {
    /// Short day label ("Mon")
    pub day: String,
    #[serde(default)]
    pub scores: HashMap<String, i64>,
}

impl GraphDataPoint {
    pub fn own_score(&self) -> i64 {
        self.scores.get(SELF_SERIES_KEY).copied().unwrap_or(0)
    }

    /// Best score of the day across everyone in the point.
    pub fn leader_score(&self) -> i64 {
        self.scores.values().copied().max().unwrap_or(0)
    }
}

impl UserStats {

    /// Percentile label for display, "N/A" when unknown.
    pub fn percentile_label(&self) -> &str {
        self.percentile.as_deref().unwrap_or("N/A")
    }
}
