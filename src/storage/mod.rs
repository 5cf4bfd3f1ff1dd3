// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable key-value storage for client state.
//!
//! Values are plain strings. Writes that must land together (the session
//! token and user) go through `set_all`/`remove_all` so a backend can
//! persist them in one step.

pub mod file;

pub use file::FileStore;

use crate::error::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Storage key names as constants.
pub mod keys {
    pub const TOKEN: &str = "token";
    /// JSON-serialized `SessionUser`
    pub const USER: &str = "user";
    pub const THEME: &str = "theme";
}

/// Durable string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write several entries in one step.
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove several keys in one step. Missing keys are ignored.
    fn remove_all(&self, keys: &[&str]) -> Result<()>;

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_all(&[(key, value)])
    }
}

/// In-memory storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut map = self.lock();
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<()> {
        let mut map = self.lock();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}
