// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Club chat message model.

use crate::services::api::BackendMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SYSTEM_KIND: &str = "system";

/// Who wrote a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User(String),
    /// Backend-generated notice (join, leave, score update)
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub author: Author,
    pub username: Option<String>,
    pub avatar_id: Option<String>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Map a backend message. `index` is its position in the response and
    /// only matters when the backend sent no id.
    pub fn from_backend(index: usize, msg: BackendMessage) -> Self {
        let id = match msg.id {
            Some(id) => id.to_string(),
            None => format!("msg-{}-{}", index, msg.timestamp.to_rfc3339()),
        };
        let author = if msg.kind.as_deref() == Some(SYSTEM_KIND) {
            Author::System
        } else {
            Author::User(msg.user.id.to_string())
        };
        Self {
            id,
            author,
            username: Some(msg.user.username).filter(|u| !u.is_empty()),
            avatar_id: msg.user.avatar_id,
            text: msg.message,
            timestamp: msg.timestamp,
        }
    }

    pub fn is_system(&self) -> bool {
        self.author == Author::System
    }
}

/// Map a newest-first backend page into oldest-first display order.
pub fn oldest_first(page: Vec<BackendMessage>) -> Vec<Message> {
    let mut messages: Vec<Message> = page
        .into_iter()
        .enumerate()
        .map(|(i, m)| Message::from_backend(i, m))
        .collect();
    messages.reverse();
    messages
}
