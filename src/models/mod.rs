// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the client caches.

pub mod avatar;
pub mod club;
pub mod member;
pub mod message;
pub mod stats;
pub mod theme;
pub mod user;

pub use avatar::{AvatarDisplay, AvatarPreset};
pub use club::Club;
pub use member::Member;
pub use message::{Author, Message};
pub use stats::{GraphDataPoint, UserStats};
pub use theme::Theme;
pub use user::{AccentColor, SessionUser, UserStyle};
