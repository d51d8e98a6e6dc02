use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use engine::{KvStore, StoreError};
use serde_json::{Map, Value};

/// JSON-file implementation of the engine's persistence contract: the
/// whole store is one JSON object, loaded at startup and written back
/// once per command.
pub struct FileStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl FileStore {
    pub fn open(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read store file: {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse store file: {}", path.display()))?
        } else {
            Map::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn persist(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&Value::Object(self.entries.clone()))?;
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write store file: {}", self.path.display()))?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}
