//! Common infrastructure for the autoipcfg daemon.
//!
//! - [`eapi`]: the [`EapiNode`] port and its HTTP JSON-RPC implementation
//! - [`connection`]: named connection profiles loaded from YAML
//! - [`logging`]: the operator log port ([`Logger`], [`LogSink`])
//! - [`error`]: error types shared across crates
//!
//! # Example
//!
//! ```ignore
//! use autoipcfg_common::{AutoIpCfgResult, ConnectionConfig, EapiNode, HttpNode};
//!
//! async fn set_address(intf: &str, prefix: &str) -> AutoIpCfgResult<()> {
//!     let config = ConnectionConfig::load_optional(None)?;
//!     let node = HttpNode::connect(config.resolve("localhost")?)?;
//!     node.config(&[
//!         format!("interface {}", intf),
//!         "no switchport".to_string(),
//!         format!("ip address {}", prefix),
//!     ])
//!     .await
//! }
//! ```

pub mod connection;
pub mod eapi;
pub mod error;
pub mod logging;

// Re-export commonly used items at crate root
pub use connection::{ConnectionConfig, ConnectionProfile, Transport};
pub use eapi::{text_output, EapiNode, Encoding, HttpNode, SHOW_LLDP_DETAIL};
pub use error::{AutoIpCfgError, AutoIpCfgResult};
pub use logging::{LogSink, Logger, Severity, TracingSink, LOG_TARGET};
