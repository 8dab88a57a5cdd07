//! Per-caller session storage seen by strategies
//!
//! The host owns the real session backend (signed cookie, server-side store,
//! ...). Strategies only need keyed JSON values, which is what [`Session`]
//! exposes. [`MemorySession`] is a plain in-process implementation.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Mutable key/value session for the current caller.
pub trait Session: Send {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, replacing any previous value.
    fn insert(&mut self, key: &str, value: Value);

    /// Delete `key`, returning the previous value.
    fn remove(&mut self, key: &str) -> Option<Value>;
}

/// Typed helpers on top of [`Session`].
pub trait SessionExt: Session {
    /// Decode the value under `key`.
    ///
    /// Returns `None` when the key is absent, `Some(Err(_))` when the stored
    /// value does not decode as `T`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<serde_json::Result<T>> {
        self.get(key).map(serde_json::from_value)
    }

    /// Encode and store `value` under `key`.
    fn insert_json<T: Serialize>(&mut self, key: &str, value: &T) -> serde_json::Result<()> {
        let value = serde_json::to_value(value)?;
        self.insert(key, value);
        Ok(())
    }
}

impl<S: Session + ?Sized> SessionExt for S {}

/// In-memory session backed by a `HashMap`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySession {
    values: HashMap<String, Value>,
}

impl MemorySession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the session holds nothing.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Session for MemorySession {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn insert(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }
}
