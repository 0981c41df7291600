//! `evm config` get/set

use crate::OpsCtx;
use evm_errors::{ConfigError, Error};
use evm_state::SettingKey;
use std::path::Path;

/// Read a persisted setting
///
/// # Errors
///
/// Returns an error if the settings store cannot be read.
pub async fn config_get(ctx: &OpsCtx, key: SettingKey) -> Result<Option<String>, Error> {
    ctx.package.settings.get(key).await
}

/// Write (or with `None`, clear) a persisted setting.
///
/// `path` must be absolute. Setting `current` directly bypasses the shims;
/// prefer `use`/`disuse`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for a relative `path`, or a settings
/// store error.
pub async fn config_set(ctx: &OpsCtx, key: SettingKey, value: Option<&str>) -> Result<(), Error> {
    if let (SettingKey::Path, Some(path)) = (key, value) {
        if !Path::new(path).is_absolute() {
            return Err(ConfigError::InvalidValue {
                field: key.to_string(),
                value: path.to_string(),
            }
            .into());
        }
    }
    ctx.package.settings.set(key, value).await
}
