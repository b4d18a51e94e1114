use std::sync::{Arc, OnceLock};

use super::StaticConfig;
use crate::errors::{Result, ShortenerError};

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks.
///
/// # Panics
/// If `init_config_from` has not run.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config_from() first.")
        .clone()
}

/// Initialize the global configuration
///
/// Reads `path` (or the optional `config.toml` when `None`) and environment
/// variables. Calling this a second time is an error; the first configuration
/// stays installed.
///
/// # Examples
/// ```no_run
/// use snaplink::config::init_config_from;
/// init_config_from(None).expect("invalid configuration");
/// ```
pub fn init_config_from(path: Option<&str>) -> Result<Arc<StaticConfig>> {
    let loaded = StaticConfig::load(path)?;
    CONFIG
        .set(Arc::new(loaded))
        .map_err(|_| ShortenerError::config("Config already initialized"))?;
    Ok(get_config())
}
