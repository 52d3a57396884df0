//! TOML configuration loading

use super::EngineConfig;
use crate::core::types::{HookError, HookResult};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Load and validate a configuration file
pub fn load(path: &Path) -> HookResult<EngineConfig> {
    let contents = fs::read_to_string(path)?;
    let config: EngineConfig = toml::from_str(&contents)
        .map_err(|e| HookError::Config(format!("{}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

/// Load `path` when given, falling back to defaults (with a warning) on
/// any failure. No path means defaults without ceremony.
pub fn load_or_default(path: Option<&Path>) -> EngineConfig {
    match path {
        Some(path) => match load(path) {
            Ok(config) => {
                info!(path = %path.display(), "loaded configuration");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "using default configuration");
                EngineConfig::default()
            }
        },
        None => EngineConfig::default(),
    }
}
