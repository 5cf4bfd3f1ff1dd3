// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.

use crate::models::Theme;
use std::env;
use std::path::PathBuf;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_STATE_PATH: &str = ".clubrank/state.json";

/// Default leaderboard row limit.
pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 50;
/// Default message page size.
pub const DEFAULT_MESSAGE_PAGE_SIZE: u32 = 50;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend origin, without a trailing slash
    pub api_base_url: String,
    /// File backing the durable key-value storage
    pub state_path: PathBuf,
    /// Max leaderboard rows requested per refresh
    pub leaderboard_limit: u32,
    /// Max messages requested per refresh
    pub message_page_size: u32,
    /// Theme used when none has been persisted
    pub default_theme: Theme,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
            message_page_size: DEFAULT_MESSAGE_PAGE_SIZE,
            default_theme: Theme::Light,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = env::var("CLUBRANK_API_BASE_URL")
            .or_else(|_| env::var("VITE_API_BASE_URL"))
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let default_theme = match env::var("CLUBRANK_DEFAULT_THEME") {
            Ok(v) => Theme::parse(v.trim())
                .ok_or_else(|| ConfigError::Invalid("CLUBRANK_DEFAULT_THEME", v))?,
            Err(_) => Theme::Light,
        };

        Ok(Self {
            api_base_url: normalize_base_url(&api_base_url)?,
            state_path: env::var("CLUBRANK_STATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_PATH)),
            leaderboard_limit: parse_u32("CLUBRANK_LEADERBOARD_LIMIT", DEFAULT_LEADERBOARD_LIMIT)?,
            message_page_size: parse_u32("CLUBRANK_MESSAGE_PAGE_SIZE", DEFAULT_MESSAGE_PAGE_SIZE)?,
            default_theme,
        })
    }

    /// Config pointing at a specific backend, otherwise default.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: normalize_base_url(base_url)?,
            ..Self::default()
        })
    }
}

fn parse_u32(name: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(name) {
        Ok(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, v)),
        Err(_) => Ok(default),
    }
}

/// Validate the backend origin and strip any trailing slash.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed)
        .map_err(|_| ConfigError::Invalid("CLUBRANK_API_BASE_URL", raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(
            "CLUBRANK_API_BASE_URL",
            raw.to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
