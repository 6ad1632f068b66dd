//! Error types for autoipcfgd
//!
//! Only failures that end the process surface as [`DaemonError`]. Everything
//! the reconciler can recover from is logged where it happens.

use autoipcfg_common::AutoIpCfgError;
use thiserror::Error;

/// Errors that terminate the daemon
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Settings, connection config or target resolution failed
    #[error("{0}")]
    Setup(#[source] AutoIpCfgError),

    /// The management channel dropped while fetching neighbors
    #[error("{0}")]
    Fetch(#[source] AutoIpCfgError),

    /// Logging could not be initialized
    #[error("Logging error: {0}")]
    Logging(String),
}

impl DaemonError {
    /// True if startup failed because the target has no profile
    pub fn is_target_not_found(&self) -> bool {
        matches!(
            self,
            DaemonError::Setup(AutoIpCfgError::TargetNotFound { .. })
        )
    }
}

/// Result type alias for autoipcfgd operations
pub type Result<T> = std::result::Result<T, DaemonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_not_found() {
        let err = DaemonError::Setup(AutoIpCfgError::target_not_found("leaf9"));
        assert!(err.is_target_not_found());
        assert_eq!(err.to_string(), "leaf9 not found in config file(s)");
    }

    #[test]
    fn test_fetch_display() {
        let err = DaemonError::Fetch(AutoIpCfgError::connection("10.0.0.1", "timed out"));
        assert!(!err.is_target_not_found());
        assert_eq!(err.to_string(), "Connection to 10.0.0.1 failed: timed out");
    }
}
