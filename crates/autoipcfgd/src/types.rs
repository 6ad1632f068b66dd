//! Core types for neighbor-driven address reconciliation

use serde_json::Value;
use std::collections::HashMap;

/// Local interface -> candidate address, rebuilt every poll cycle.
pub type NeighborMap = HashMap<String, String>;

/// One discovered neighbor, as handed to the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborRecord {
    /// Local interface as it appears in the report, e.g. `Interface Ethernet3`.
    pub local_interface: String,
    /// Raw token taken from the neighbor's port description.
    pub candidate_address: Option<String>,
}

impl NeighborRecord {
    pub fn new(local_interface: impl Into<String>, candidate_address: Option<String>) -> Self {
        Self {
            local_interface: local_interface.into(),
            candidate_address,
        }
    }

    /// Key the device uses for this interface in structured output:
    /// `Interface Ethernet3` -> `Ethernet3`.
    pub fn interface_key(&self) -> &str {
        self.local_interface
            .split_whitespace()
            .nth(1)
            .unwrap_or(&self.local_interface)
    }

    /// Candidate worth acting on; empty tokens count as none.
    pub fn candidate(&self) -> Option<&str> {
        self.candidate_address
            .as_deref()
            .filter(|candidate| !candidate.is_empty())
    }
}

/// Records for every entry of a parsed map.
pub fn neighbor_records(neighbors: NeighborMap) -> Vec<NeighborRecord> {
    neighbors
        .into_iter()
        .map(|(intf, candidate)| NeighborRecord::new(intf, Some(candidate)))
        .collect()
}

/// Address portion of `<address>[/<mask>]`.
pub fn address_only(prefix: &str) -> &str {
    prefix.split('/').next().unwrap_or(prefix)
}

/// Primary address currently configured on an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceAddressState {
    /// No routed address (switchport, or nothing reported).
    Absent,
    /// Address as reported, with or without a mask suffix.
    Configured(String),
}

impl InterfaceAddressState {
    /// Reads `interfaces.<key>.interfaceAddress.primaryIp.address` from a
    /// structured `show ip` result.
    pub fn from_show_ip(result: &Value, key: &str) -> Self {
        result
            .get("interfaces")
            .and_then(|intfs| intfs.get(key))
            .and_then(|intf| intf.get("interfaceAddress"))
            .and_then(|addr| addr.get("primaryIp"))
            .and_then(|primary| primary.get("address"))
            .and_then(Value::as_str)
            .map(|address| InterfaceAddressState::Configured(address.to_string()))
            .unwrap_or(InterfaceAddressState::Absent)
    }

    /// True when the configured address equals the candidate's, masks ignored.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            InterfaceAddressState::Absent => false,
            InterfaceAddressState::Configured(current) => {
                address_only(current) == address_only(candidate)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interface_key() {
        let record = NeighborRecord::new("Interface Ethernet49/1", None);
        assert_eq!(record.interface_key(), "Ethernet49/1");

        let bare = NeighborRecord::new("Ethernet1", None);
        assert_eq!(bare.interface_key(), "Ethernet1");
    }

    #[test]
    fn test_candidate_filters_empty() {
        assert_eq!(
            NeighborRecord::new("Interface Ethernet1", Some(String::new())).candidate(),
            None
        );
        assert_eq!(
            NeighborRecord::new("Interface Ethernet1", Some("1.1.1.1/24".into())).candidate(),
            Some("1.1.1.1/24")
        );
    }

    #[test]
    fn test_address_only() {
        assert_eq!(address_only("10.0.0.1/31"), "10.0.0.1");
        assert_eq!(address_only("10.0.0.1"), "10.0.0.1");
        assert_eq!(address_only("not-an-ip"), "not-an-ip");
    }

    #[test]
    fn test_from_show_ip() {
        let result = json!({
            "interfaces": {
                "Ethernet3": {
                    "interfaceAddress": {
                        "primaryIp": { "address": "10.1.1.1", "maskLen": 24 }
                    }
                }
            }
        });
        assert_eq!(
            InterfaceAddressState::from_show_ip(&result, "Ethernet3"),
            InterfaceAddressState::Configured("10.1.1.1".to_string())
        );
        assert_eq!(
            InterfaceAddressState::from_show_ip(&result, "Ethernet4"),
            InterfaceAddressState::Absent
        );
        assert_eq!(
            InterfaceAddressState::from_show_ip(&json!({}), "Ethernet3"),
            InterfaceAddressState::Absent
        );
    }

    #[test]
    fn test_matches_ignores_mask() {
        let current = InterfaceAddressState::Configured("10.1.1.1/24".to_string());
        assert!(current.matches("10.1.1.1/24"));
        assert!(current.matches("10.1.1.1/30"));
        assert!(!current.matches("10.1.1.2/24"));
        assert!(!InterfaceAddressState::Absent.matches("10.1.1.1/24"));
    }
}
