// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client services.

pub mod api;
pub mod clubs;
pub mod notify;
pub mod session;

pub use api::ApiClient;
pub use clubs::ClubCache;
pub use notify::{Notifier, RecordingNotifier};
pub use session::SessionStore;
