//! Daemon settings, validated once at startup.

use autoipcfg_common::{AutoIpCfgError, AutoIpCfgResult};
use std::path::PathBuf;
use std::time::Duration;

/// Default values for daemon settings.
pub mod defaults {
    /// Connection target.
    pub const NODE: &str = "localhost";

    /// Separator between label and address in a port description.
    pub const DELIMITER: &str = ":";

    /// Seconds between poll cycles.
    pub const INTERVAL_SECS: f64 = 30.0;
}

/// When to poll, and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Sleep between cycles.
    pub interval: Duration,
    /// Stop after this many cycles; `None` runs until cancelled.
    pub max_cycles: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Connection target name.
    pub node: String,
    pub delimiter: String,
    pub interval: Duration,
    /// Operator log on/off.
    pub log_enabled: bool,
    /// Connection profile file; the built-in profile is used when absent.
    pub config_path: Option<PathBuf>,
    pub max_cycles: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            node: defaults::NODE.to_string(),
            delimiter: defaults::DELIMITER.to_string(),
            interval: Duration::from_secs_f64(defaults::INTERVAL_SECS),
            log_enabled: true,
            config_path: None,
            max_cycles: None,
        }
    }
}

impl Settings {
    /// Converts an interval in (fractional) seconds.
    pub fn interval_from_secs(secs: f64) -> AutoIpCfgResult<Duration> {
        Duration::try_from_secs_f64(secs).map_err(|e| {
            AutoIpCfgError::invalid_config("interval", format!("{} ({})", e, secs))
        })
    }

    pub fn validate(&self) -> AutoIpCfgResult<()> {
        if self.node.trim().is_empty() {
            return Err(AutoIpCfgError::invalid_config(
                "node",
                "target name must not be empty",
            ));
        }
        if self.delimiter.is_empty() {
            return Err(AutoIpCfgError::invalid_config(
                "delim",
                "delimiter must not be empty",
            ));
        }
        if self.max_cycles == Some(0) {
            return Err(AutoIpCfgError::invalid_config(
                "max_cycles",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    pub fn schedule(&self) -> Schedule {
        Schedule {
            interval: self.interval,
            max_cycles: self.max_cycles,
        }
    }
}
