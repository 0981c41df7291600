//! File-backed settings store.
//!
//! The record is a pretty-printed JSON object. Writes go to `*.json.tmp`
//! first and are renamed over the live file, so a crash leaves either the old
//! or the new record, never a torn one.

use crate::{normalize, SettingKey, SettingsStore};
use async_trait::async_trait;
use evm_errors::{Error, StateError};
use evm_platform::filesystem_helpers as fs;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs as tokio_fs;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl SettingsRecord {
    fn get(&self, key: SettingKey) -> Option<String> {
        match key {
            SettingKey::Current => self.current.clone(),
            SettingKey::Path => self.path.clone(),
        }
    }

    fn set(&mut self, key: SettingKey, value: Option<String>) {
        match key {
            SettingKey::Current => self.current = value,
            SettingKey::Path => self.path = value,
        }
    }
}

/// Settings persisted to a JSON file
#[derive(Debug, Clone)]
pub struct JsonSettings {
    path: PathBuf,
}

impl JsonSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<SettingsRecord, Error> {
        let bytes = match tokio_fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(SettingsRecord::default())
            }
            Err(err) => {
                return Err(StateError::ReadFailed {
                    path: self.path.display().to_string(),
                    message: err.to_string(),
                }
                .into())
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(SettingsRecord::default());
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            StateError::Corrupted {
                path: self.path.display().to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    async fn persist(&self, record: &SettingsRecord) -> Result<(), Error> {
        let write_failed = |message: String| -> Error {
            StateError::WriteFailed {
                path: self.path.display().to_string(),
                message,
            }
            .into()
        };

        let payload = serde_json::to_vec_pretty(record).map_err(|e| write_failed(e.to_string()))?;
        let tmp_path = self.path.with_extension("json.tmp");

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        tokio_fs::write(&tmp_path, payload)
            .await
            .map_err(|e| write_failed(e.to_string()))?;
        tokio_fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| write_failed(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonSettings {
    async fn get(&self, key: SettingKey) -> Result<Option<String>, Error> {
        Ok(normalize(self.load().await?.get(key)))
    }

    async fn set(&self, key: SettingKey, value: Option<&str>) -> Result<(), Error> {
        let mut record = self.load().await?;
        let value = normalize(value.map(str::to_string));
        debug!(key = %key, value = ?value, path = %self.path.display(), "persisting setting");
        record.set(key, value);
        self.persist(&record).await
    }
}
