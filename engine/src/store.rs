//! Key-value persistence boundary.
//!
//! Engines never touch a concrete storage API: they receive a [`KvStore`]
//! and go through the helpers here, which swallow storage failures into
//! safe defaults so a broken store can never corrupt a battle in progress.

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage read failed: {0}")]
    Read(String),
    #[error("storage write failed: {0}")]
    Write(String),
}

/// String keys to opaque JSON blobs. Any conforming store (in-memory map,
/// JSON file, browser storage behind a bridge) satisfies the contract.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// In-memory store for tests and simulations. IndexMap keeps iteration
/// order deterministic when dumping contents.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: IndexMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

pub const BALANCES_KEY: &str = "balances";
pub const STATS_HISTORY_KEY: &str = "stats_history";

pub fn progress_key(character_id: u64) -> String {
    format!("progress:{character_id}")
}

pub fn weapons_key(character_id: u64) -> String {
    format!("weapons:{character_id}")
}

/// Read and decode a record. Storage failures and corrupt payloads degrade
/// to `None` with a warning; the caller substitutes defaults.
pub fn read_or_default<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    match store.get(key) {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(key, %err, "corrupt record, using defaults");
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            warn!(key, %err, "storage read failed, using defaults");
            None
        }
    }
}

/// Encode and write a record. Returns false (change dropped, warning
/// logged) instead of propagating storage failures.
pub fn write_record<T: Serialize>(store: &mut dyn KvStore, key: &str, record: &T) -> bool {
    let value = match serde_json::to_value(record) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, %err, "record failed to serialize, change dropped");
            return false;
        }
    };
    match store.set(key, value) {
        Ok(()) => true,
        Err(err) => {
            warn!(key, %err, "storage write failed, change dropped");
            false
        }
    }
}
