//! Key-value persistence for settings and the synced event cache.
//!
//! MIT License
//!
//! Copyright (c) 2026 66f94eae
//!
//! Permission is hereby granted, free of charge, to any person obtaining a copy
//! of this software and associated documentation files (the "Software"), to deal
//! in the Software without restriction, including without limitation the rights
//! to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
//! copies of the Software, and to permit persons to whom the Software is
//! furnished to do so, subject to the following conditions:
//!
//! The above copyright notice and this permission notice shall be included in all
//! copies or substantial portions of the Software.
//!
//! THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
//! IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//! FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//! AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//! LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
//! OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
//! SOFTWARE.

use std::{collections::BTreeMap, path::PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Storage key for the synced holiday event set
pub const KEY_HOLIDAY_EVENTS: &str = "holidayEvents";
/// Storage key for the last feed sync timestamp
pub const KEY_HOLIDAY_SYNC_TIME: &str = "holidaySyncTime";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization: {0}")]
    Serde(#[from] serde_json::Error),
}

/// String-keyed value persistence
///
/// Values are loaded once at process start and pushed back on every
/// mutating operation. No schema versioning.
pub trait Storage {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Reads a typed value with a fallback
///
/// A missing key or an undeserializable stored value both yield the
/// fallback; corruption never propagates.
pub fn get_or<T: DeserializeOwned>(storage: &dyn Storage, key: &str, fallback: T) -> T {
    storage
        .get(key)
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or(fallback)
}

/// Single-file JSON storage backend
///
/// The whole key-value map is rewritten on every mutation; fine for the
/// handful of keys the widget persists.
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Opens the store, starting empty when the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                tracing::warn!(path = %path.display(), %error, "cache unreadable, starting empty");
                BTreeMap::new()
            }),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(error.into()),
        };
        Ok(Self { path, values })
    }

    fn persist(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.values)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl Storage for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.values.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("moyuday-store-{}-{}", std::process::id(), name))
    }

    #[test]
    fn missing_file_starts_empty() {
        let path = temp_path("missing");
        let _ = std::fs::remove_file(&path);
        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.get("anything").is_none());
    }

    #[test]
    fn set_get_remove_round_trip() {
        let path = temp_path("roundtrip");
        let _ = std::fs::remove_file(&path);
        let mut store = JsonFileStore::open(&path).unwrap();
        store
            .set("answer", serde_json::json!({"value": 42}))
            .unwrap();

        // Reopen to prove the value was pushed to disk.
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("answer"),
            Some(serde_json::json!({"value": 42}))
        );

        store.remove("answer").unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert!(reopened.get("answer").is_none());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn get_or_falls_back_on_missing_or_mismatched() {
        let path = temp_path("fallback");
        let _ = std::fs::remove_file(&path);
        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(get_or(&store, "missing", 7_u32), 7);

        store.set("count", serde_json::json!("not a number")).unwrap();
        assert_eq!(get_or(&store, "count", 7_u32), 7);

        store.set("count", serde_json::json!(3)).unwrap();
        assert_eq!(get_or(&store, "count", 7_u32), 3);
        let _ = std::fs::remove_file(&path);
    }
}
