//! Engine configuration.
//!
//! All knobs have working defaults; a TOML file can override any subset
//! of them. A missing file is not an error, a malformed one is.

mod loader;

pub use loader::{load, load_or_default};

use crate::core::types::{HookError, HookResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable engine parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Monitor poll cadence in milliseconds
    pub poll_interval_ms: u64,
    /// Chunk size for scan reads, in bytes
    pub scan_chunk_size: usize,
    /// Default cap on scan results
    pub max_scan_results: usize,
    /// How long to wait for a monitor loop to wind down
    pub stop_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            poll_interval_ms: 1000,
            scan_chunk_size: 4096,
            max_scan_results: 100,
            stop_timeout_ms: 1000,
        }
    }
}

impl EngineConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }

    /// Reject configurations that would stall the engine
    pub fn validate(&self) -> HookResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(HookError::Config(
                "poll_interval_ms must be non-zero".to_string(),
            ));
        }
        if self.scan_chunk_size == 0 {
            return Err(HookError::Config(
                "scan_chunk_size must be non-zero".to_string(),
            ));
        }
        if self.max_scan_results == 0 {
            return Err(HookError::Config(
                "max_scan_results must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(1000));
        assert_eq!(config.scan_chunk_size, 4096);
        assert_eq!(config.max_scan_results, 100);
        assert_eq!(config.stop_timeout(), Duration::from_millis(1000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zeroes() {
        let mut config = EngineConfig::default();
        config.poll_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.scan_chunk_size = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.max_scan_results = 0;
        assert!(config.validate().is_err());
    }
}
