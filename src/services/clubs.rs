// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Club, leaderboard and message cache.
//!
//! Every refresh replaces whole lists: the club list as a unit, and each
//! club's leaderboard rows and messages as a unit keyed by club id.
//! Nothing is merged or appended incrementally, and nothing is evicted
//! except by `clear`.

use crate::models::{Club, Member, Message};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ClubCache {
    clubs: Vec<Club>,
    members: HashMap<String, Vec<Member>>,
    messages: HashMap<String, Vec<Message>>,
}

impl ClubCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }

    pub fn club(&self, club_id: &str) -> Option<&Club> {
        self.clubs.iter().find(|c| c.id == club_id)
    }

    pub fn is_member_of(&self, club_id: &str) -> bool {
        self.club(club_id).is_some()
    }

    /// Leaderboard rows for a club, in backend rank order.
    pub fn members(&self, club_id: &str) -> &[Member] {
        self.members.get(club_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Messages for a club, oldest first.
    pub fn messages(&self, club_id: &str) -> &[Message] {
        self.messages.get(club_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn replace_clubs(&mut self, clubs: Vec<Club>) {
        self.clubs = clubs;
    }

    pub fn replace_club_data(&mut self, club_id: &str, members: Vec<Member>, messages: Vec<Message>) {
        self.members.insert(club_id.to_string(), members);
        self.messages.insert(club_id.to_string(), messages);
    }

    pub fn clear(&mut self) {
        self.clubs.clear();
        self.members.clear();
        self.messages.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.clubs.is_empty() && self.members.is_empty() && self.messages.is_empty()
    }
}
