//! Application service — configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::ValctlConfig;

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<ValctlConfig> {
    store.load()
}

/// Validate and apply one setting, then persist the whole config.
///
/// # Errors
///
/// Returns a [`crate::domain::ConfigError`] for an unknown key or a value of
/// the wrong shape, and nothing is saved in that case.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<ValctlConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)?;
    tracing::info!(key, value, "config updated");
    Ok(config)
}
