//! Error types shared by the autoipcfg crates.
//!
//! All errors implement `std::error::Error` via `thiserror`. The eAPI
//! variants keep transport failures apart from command rejections: a dead
//! management channel ends the daemon, a rejected command only ends the
//! attempt.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for autoipcfg operations.
pub type AutoIpCfgResult<T> = Result<T, AutoIpCfgError>;

/// Errors that can occur while talking to a device or loading configuration.
#[derive(Debug, Error)]
pub enum AutoIpCfgError {
    /// The eAPI endpoint could not be reached or answered with a non-success
    /// HTTP status.
    #[error("Connection to {target} failed: {message}")]
    Connection {
        /// Host (or URL) that was contacted.
        target: String,
        /// Description of the transport failure.
        message: String,
    },

    /// The device rejected one of the submitted commands.
    #[error("eAPI command error {code}: {message}")]
    Command {
        /// JSON-RPC error code returned by the device.
        code: i64,
        /// Error message returned by the device.
        message: String,
        /// Per-command error output, when the device supplied it.
        output: Vec<String>,
    },

    /// The device answered, but not in the shape we expected.
    #[error("Invalid eAPI response: {message}")]
    InvalidResponse {
        /// What was wrong with the response.
        message: String,
    },

    /// Failed to read a connection configuration file.
    #[error("Failed to read connection config '{}': {source}", path.display())]
    ConfigIo {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// A connection configuration file is not valid YAML for our schema.
    #[error("Failed to parse connection config: {source}")]
    ConfigParse {
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Configuration validation error.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// The requested connection target has no profile.
    #[error("{name} not found in config file(s)")]
    TargetNotFound {
        /// The target name that was looked up.
        name: String,
    },
}

impl AutoIpCfgError {
    /// Creates a connection error.
    pub fn connection(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Creates a command error without per-command output.
    pub fn command(code: i64, message: impl Into<String>) -> Self {
        Self::Command {
            code,
            message: message.into(),
            output: Vec::new(),
        }
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a target not found error.
    pub fn target_not_found(name: impl Into<String>) -> Self {
        Self::TargetNotFound { name: name.into() }
    }

    /// Returns true if the management channel itself failed.
    pub fn is_connection(&self) -> bool {
        matches!(self, AutoIpCfgError::Connection { .. })
    }

    /// Returns true if the device reached us and refused a command.
    pub fn is_command(&self) -> bool {
        matches!(self, AutoIpCfgError::Command { .. })
    }

    /// Full error detail, including any per-command output lines.
    pub fn detail(&self) -> String {
        match self {
            AutoIpCfgError::Command { output, .. } if !output.is_empty() => {
                format!("{} [{}]", self, output.join("; "))
            }
            _ => self.to_string(),
        }
    }
}
