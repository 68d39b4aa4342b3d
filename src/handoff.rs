//! Persisted hand-off store.
//!
//! A small file-backed key-value slot bridging the setup screen and the
//! reveal screen: `start` writes the finalized session snapshot here once,
//! the reveal screen reads it back via the HTTP API. The file is a plain
//! JSON object keyed by slot name so the shape stays inspectable by hand.

use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// Slot the finalized session snapshot is written under.
pub const HANDOFF_KEY: &str = "imposterGameData";

#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct HandoffStore {
    path: PathBuf,
}

impl HandoffStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write `value` under `key`, creating the store file (and its parent
    /// directory) if needed. Other slots in the file are preserved.
    pub async fn put(&self, key: &str, value: &impl Serialize) -> Result<(), HandoffError> {
        let mut slots = self.read_slots().await;
        slots.insert(key.to_string(), serde_json::to_value(value)?);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(&slots)?;
        tokio::fs::write(&self.path, json).await?;

        tracing::debug!("wrote hand-off slot \"{}\" to {}", key, self.path.display());
        Ok(())
    }

    /// Read the value stored under `key`, if any.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let mut slots = self.read_slots().await;
        slots.remove(key)
    }

    async fn read_slots(&self) -> serde_json::Map<String, Value> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => map,
                _ => {
                    tracing::warn!(
                        "hand-off store {} is not a JSON object, starting fresh",
                        self.path.display()
                    );
                    serde_json::Map::new()
                }
            },
            Err(_) => serde_json::Map::new(),
        }
    }
}
