// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! ClubRank client: session, club cache and REST API plumbing
//!
//! Users form clubs, bump a per-club score, chat, and view leaderboards.
//! This crate keeps the client-side state in sync with the ClubRank
//! backend; the backend owns scoring, streaks and persistence.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod store;
pub mod time_utils;

pub use store::AppStore;
