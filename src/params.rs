//! Loosely-typed construction parameters for components.
//!
//! Component builders receive a [`Parameters`] map of string keys to string
//! values and interpret it per component type; the runtime itself never
//! assigns meaning to the entries. Typed accessors distinguish a missing key
//! (caller gets a default) from a malformed value (construction should fail).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// String-keyed, string-valued configuration handed to component builders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    values: FxHashMap<String, String>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, consuming and returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace an entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Parse an entry as `f32`. `None` if the key is absent or malformed.
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key)?.trim().parse().ok()
    }

    /// Parse an entry as `i32`. `None` if the key is absent or malformed.
    pub fn get_i32(&self, key: &str) -> Option<i32> {
        self.get(key)?.trim().parse().ok()
    }

    /// Parse an entry as `bool`. `None` if the key is absent or malformed.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.trim().parse().ok()
    }

    /// Parse an optional `f32` entry: an absent key yields `default`, a
    /// malformed value yields `None` so builders can reject it.
    pub fn f32_or(&self, key: &str, default: f32) -> Option<f32> {
        match self.get(key) {
            Some(raw) => raw.trim().parse().ok(),
            None => Some(default),
        }
    }

    /// Parse an optional `i32` entry with the same contract as [`Self::f32_or`].
    pub fn i32_or(&self, key: &str, default: i32) -> Option<i32> {
        match self.get(key) {
            Some(raw) => raw.trim().parse().ok(),
            None => Some(default),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
