//! Test infrastructure for the autoipcfg reconciler
//!
//! Provides:
//! - A scripted in-memory eAPI device ([`MockNode`])
//! - A log sink that records every line ([`RecordingSink`])
//! - LLDP neighbor-detail text fixtures
//! - Verification helpers for configuration sessions and log output

pub mod fixtures;
mod mock_node;
mod recording_sink;
mod verification;

pub use fixtures::*;
pub use autoipcfg_common::SHOW_LLDP_DETAIL;
pub use mock_node::{MockNode, RecordedCall};
pub use recording_sink::RecordingSink;
pub use verification::*;
