// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session user model and derived display style.

use serde::{Deserialize, Serialize};

/// Placeholder initials for an empty username.
pub const PLACEHOLDER_INITIALS: &str = "??";

/// The authenticated user, as persisted alongside the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Backend user ID (stringified)
    pub id: String,
    pub username: String,
    /// Two-letter display initials derived from the username
    pub avatar_initials: String,
    /// Palette entry derived from the username
    pub color: AccentColor,
    /// Avatar selector; `None` until the user picks one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_id: Option<String>,
}

impl SessionUser {
    /// Build a session user, deriving initials and colour from the username.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        let username = username.into();
        let style = UserStyle::for_username(&username);
        Self {
            id: id.into(),
            username,
            avatar_initials: style.initials,
            color: style.color,
            avatar_id: None,
        }
    }
}

/// Fixed display palette used for initials avatars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    Purple,
    Blue,
    Green,
    Yellow,
    Pink,
    Orange,
}

impl AccentColor {
    /// Palette in lookup order.
    pub const PALETTE: [AccentColor; 6] = [
        AccentColor::Purple,
        AccentColor::Blue,
        AccentColor::Green,
        AccentColor::Yellow,
        AccentColor::Pink,
        AccentColor::Orange,
    ];

    /// ANSI 256-colour code used by the terminal front end.
    pub fn ansi_code(self) -> u8 {
        match self {
            AccentColor::Purple => 135,
            AccentColor::Blue => 33,
            AccentColor::Green => 35,
            AccentColor::Yellow => 178,
            AccentColor::Pink => 205,
            AccentColor::Orange => 208,
        }
    }
}

/// Display colour and initials derived from a username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStyle {
    pub color: AccentColor,
    pub initials: String,
}

impl UserStyle {
    /// Derive the style for a username. Depends on the username alone.
    pub fn for_username(username: &str) -> Self {
        let index = username_hash(username).unsigned_abs() as usize % AccentColor::PALETTE.len();
        Self {
            color: AccentColor::PALETTE[index],
            initials: initials(username),
        }
    }
}

/// First two characters, uppercased; `??` for an empty name.
pub fn initials(username: &str) -> String {
    if username.is_empty() {
        return PLACEHOLDER_INITIALS.to_string();
    }
    username.chars().take(2).collect::<String>().to_uppercase()
}

/// String hash over UTF-16 code units: `h = c + (h << 5) - h`.
///
/// Only the shift truncates to 32 bits; the accumulator itself does not
/// wrap, so long names keep the same palette entry as the web client.
fn username_hash(username: &str) -> i64 {
    username.encode_utf16().fold(0i64, |hash, unit| {
        let shifted = (hash as i32).wrapping_shl(5) as i64;
        unit as i64 + shifted - hash
    })
}
