//! Automatic interface addressing from LLDP neighbor information
//!
//! autoipcfgd polls a device's LLDP neighbor report over eAPI, looks for an
//! address in each neighbor's port description after a configurable
//! delimiter, and assigns that address to the local interface when it is
//! not already configured. With delimiter `:` the description
//!
//! ```text
//! - Port Description: "my neighbor's address: 10.0.0.1/31"
//! ```
//!
//! puts `10.0.0.1/31` on the interface the neighbor was seen on.
//!
//! # Architecture
//!
//! ```text
//! show lldp neighbors detail ──▶ lldp_parser ──▶ NeighborMap
//!                                                     │
//!            show ip <intf> ◀──── Reconciler ◀────────┘
//!                                     │
//!          <intf> / no switchport / ip address <candidate>
//! ```
//!
//! Only two failures stop the daemon: an unknown connection target at
//! startup, and a lost connection while fetching neighbors. Everything else
//! is logged and retried on the next cycle.

pub mod daemon;
pub mod error;
pub mod lldp_parser;
pub mod reconciler;
pub mod settings;
pub mod types;

pub use error::{DaemonError, Result};
pub use lldp_parser::{parse_neighbors, ParseError};
pub use reconciler::{CycleReport, Reconciler};
pub use settings::{Schedule, Settings};
pub use types::{InterfaceAddressState, NeighborMap, NeighborRecord};
