//! In-memory settings store for tests and dry runs

use crate::{normalize, SettingKey, SettingsStore};
use async_trait::async_trait;
use evm_errors::Error;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Settings held in process memory
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<SettingKey, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing normalisation (lets tests store `""`)
    pub fn with_raw(key: SettingKey, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key, value.to_string());
        Self {
            values: Mutex::new(values),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn get(&self, key: SettingKey) -> Result<Option<String>, Error> {
        Ok(normalize(self.values.lock().await.get(&key).cloned()))
    }

    async fn set(&self, key: SettingKey, value: Option<&str>) -> Result<(), Error> {
        let mut values = self.values.lock().await;
        match value {
            Some(v) => {
                values.insert(key, v.to_string());
            }
            None => {
                values.remove(&key);
            }
        }
        Ok(())
    }
}
