// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Club model for the dashboard cache.

use crate::services::api::BackendClub;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Unit label shown when the backend reports none.
pub const DEFAULT_UNIT_LABEL: &str = "Points";
/// Cooldown shown when the backend reports none.
pub const DEFAULT_COOLDOWN_MINUTES: u32 = 10;

/// A club the session user belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id: String,
    pub name: String,
    pub description: String,
    pub member_count: u32,
    /// Unit of progress (e.g. "Pages", "Pushups")
    pub unit_label: String,
    /// Display-only; increments are rate-limited by the backend
    pub cooldown_minutes: u32,
    pub is_private: bool,
}

impl Club {
    pub fn from_backend(club: BackendClub) -> Self {
        Self {
            id: club.id.to_string(),
            name: club.name,
            description: club.description.unwrap_or_default(),
            member_count: club.number_of_members,
            unit_label: club
                .action
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_UNIT_LABEL.to_string()),
            cooldown_minutes: DEFAULT_COOLDOWN_MINUTES,
            is_private: club.is_private,
        }
    }

    pub fn cooldown(&self) -> Duration {
        Duration::minutes(self.cooldown_minutes as i64)
    }
}
