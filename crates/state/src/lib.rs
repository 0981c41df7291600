#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions, clippy::unused_async)]

//! Persisted settings for evm
//!
//! A single durable key/value record surviving process restarts. It holds the
//! name of the active package (`current`) and an optional override of the
//! installation base directory (`path`). Every query re-reads the backing
//! store; nothing is cached between calls.

mod json;
mod memory;

pub use json::JsonSettings;
pub use memory::MemorySettings;

use async_trait::async_trait;
use evm_errors::{Error, StateError};
use std::fmt;
use std::str::FromStr;

/// Keys recognised by the settings store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// Name of the active package
    Current,
    /// Override of the installation base directory
    Path,
}

impl SettingKey {
    pub const ALL: [SettingKey; 2] = [SettingKey::Current, SettingKey::Path];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Path => "path",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(Self::Current),
            "path" => Ok(Self::Path),
            other => Err(StateError::UnknownKey {
                key: other.to_string(),
            }
            .into()),
        }
    }
}

/// Durable key/value store.
///
/// An empty string is never returned: implementations normalise it to `None`.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a key
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read or parsed.
    async fn get(&self, key: SettingKey) -> Result<Option<String>, Error>;

    /// Write a key; `None` clears it
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    async fn set(&self, key: SettingKey, value: Option<&str>) -> Result<(), Error>;
}

/// Treat an empty stored value as absent
pub(crate) fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
