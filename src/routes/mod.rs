// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Screen routing and session guards.
//!
//! Three screens: landing (`/`), dashboard (`/dashboard`) and club detail
//! (`/club/{id}`). The dashboard and club screens need a session; the
//! landing screen is only shown to anonymous users.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Dashboard,
    Club(String),
}

impl Route {
    /// Parse a path. Accepts hash-router forms (`#/dashboard`) and ignores
    /// query strings and trailing slashes. Unknown paths are `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim().trim_start_matches('#');
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Landing),
            ["dashboard"] => Some(Route::Dashboard),
            ["club", id] => urlencoding::decode(id)
                .ok()
                .map(|id| Route::Club(id.into_owned())),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Club(id) => format!("/club/{}", urlencoding::encode(id)),
        }
    }

    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Landing)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of routing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

impl Navigation {
    /// The screen that ends up displayed.
    pub fn target(&self) -> &Route {
        match self {
            Navigation::Render(r) | Navigation::Redirect(r) => r,
        }
    }
}

/// Apply the session guards to a parsed route.
pub fn resolve(route: Route, authenticated: bool) -> Navigation {
    match (route, authenticated) {
        (Route::Landing, true) => Navigation::Redirect(Route::Dashboard),
        (route, false) if route.requires_session() => Navigation::Redirect(Route::Landing),
        (route, _) => Navigation::Render(route),
    }
}

/// Parse and resolve a path. Unknown paths go to the session's home screen.
pub fn navigate(path: &str, authenticated: bool) -> Navigation {
    match Route::parse(path) {
        Some(route) => resolve(route, authenticated),
        None if authenticated => Navigation::Redirect(Route::Dashboard),
        None => Navigation::Redirect(Route::Landing),
    }
}
