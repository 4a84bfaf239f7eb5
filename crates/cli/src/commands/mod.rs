pub mod agent;
pub mod config_cmd;
pub mod gateway;
pub mod tools;

use calagent_config::AppConfig;
use std::path::Path;

/// Load config from `path` when given, otherwise from the default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    tracing::debug!(path = ?path, "Loading configuration");
    let config = match path {
        Some(path) => AppConfig::load_with_env(path),
        None => AppConfig::load(),
    };
    config.map_err(|e| format!("Failed to load config: {e}").into())
}
