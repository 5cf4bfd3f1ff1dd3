// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Built-in avatar presets and display resolution.

use crate::models::user::{AccentColor, UserStyle};

/// A selectable avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarPreset {
    pub id: &'static str,
    pub emoji: &'static str,
    pub label: &'static str,
}

/// All presets, in picker order.
pub static AVATAR_PRESETS: [AvatarPreset; 11] = [
    AvatarPreset { id: "1", emoji: "🦊", label: "Fox" },
    AvatarPreset { id: "2", emoji: "🐼", label: "Panda" },
    AvatarPreset { id: "3", emoji: "🦁", label: "Lion" },
    AvatarPreset { id: "4", emoji: "🐯", label: "Tiger" },
    AvatarPreset { id: "5", emoji: "🐸", label: "Frog" },
    AvatarPreset { id: "6", emoji: "🐙", label: "Octopus" },
    AvatarPreset { id: "7", emoji: "🦄", label: "Unicorn" },
    AvatarPreset { id: "8", emoji: "🐵", label: "Monkey" },
    AvatarPreset { id: "9", emoji: "🐧", label: "Penguin" },
    AvatarPreset { id: "10", emoji: "🐢", label: "Turtle" },
    AvatarPreset { id: "11", emoji: "🦇", label: "Bat" },
];

impl AvatarPreset {
    pub fn find(id: &str) -> Option<&'static AvatarPreset> {
        AVATAR_PRESETS.iter().find(|p| p.id == id)
    }
}

/// What to show for a user: their preset, or coloured initials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarDisplay {
    Preset(&'static AvatarPreset),
    Initials { initials: String, color: AccentColor },
}

impl AvatarDisplay {
    /// Resolve an avatar selector. Unknown selectors (including the
    /// backend's `"default"`) fall back to initials.
    pub fn resolve(avatar_id: Option<&str>, username: &str) -> Self {
        match avatar_id.and_then(AvatarPreset::find) {
            Some(preset) => AvatarDisplay::Preset(preset),
            None => {
                let style = UserStyle::for_username(username);
                AvatarDisplay::Initials {
                    initials: style.initials,
                    color: style.color,
                }
            }
        }
    }

    /// Short terminal rendering.
    pub fn render(&self) -> String {
        match self {
            AvatarDisplay::Preset(p) => p.emoji.to_string(),
            AvatarDisplay::Initials { initials, color } => {
                format!("\x1b[38;5;{}m{}\x1b[0m", color.ansi_code(), initials)
            }
        }
    }
}
