//! Scripted in-memory eAPI device.
//!
//! [`MockNode`] answers the commands the reconciler issues and records every
//! call. Successful `ip address` configuration updates the node's address
//! table, so a second poll against the same node sees the converged state.

use async_trait::async_trait;
use autoipcfg_common::{AutoIpCfgError, AutoIpCfgResult, EapiNode, Encoding, SHOW_LLDP_DETAIL};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// A call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Enable {
        commands: Vec<String>,
        encoding: Encoding,
    },
    Config {
        lines: Vec<String>,
    },
}

#[derive(Debug, Default)]
struct MockState {
    lldp_text: String,
    /// Number of successful fetches before the connection drops.
    fetch_budget: Option<usize>,
    fetch_failure: String,
    fetches: usize,
    /// Interface key (e.g. `Ethernet1`) -> primary address.
    addresses: HashMap<String, String>,
    l2_ports: HashSet<String>,
    /// Local interface line -> (code, message).
    config_failures: HashMap<String, (i64, String)>,
    calls: Vec<RecordedCall>,
}

/// In-memory eAPI device.
#[derive(Debug, Default)]
pub struct MockNode {
    state: Mutex<MockState>,
}

/// Last whitespace token: `Interface Ethernet1` and `show ip Interface
/// Ethernet1` both key to `Ethernet1`.
fn interface_key(s: &str) -> String {
    s.split_whitespace().last().unwrap_or_default().to_string()
}

impl MockNode {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Text returned for `show lldp neighbors detail`.
    pub fn with_lldp_text(self, text: impl Into<String>) -> Self {
        self.state().lldp_text = text.into();
        self
    }

    /// Primary address currently configured on `key` (e.g. `Ethernet1`).
    pub fn with_address(self, key: &str, address: &str) -> Self {
        self.state()
            .addresses
            .insert(key.to_string(), address.to_string());
        self
    }

    /// Makes `show ip` on `key` fail the way a switchport does.
    pub fn with_l2_port(self, key: &str) -> Self {
        self.state().l2_ports.insert(key.to_string());
        self
    }

    /// Makes configuration of `local_interface` fail with a command error.
    pub fn with_config_failure(self, local_interface: &str, code: i64, message: &str) -> Self {
        self.state()
            .config_failures
            .insert(local_interface.to_string(), (code, message.to_string()));
        self
    }

    /// Lets `successes` fetches through, then fails every later fetch with a
    /// connection error.
    pub fn with_fetch_failure_after(self, successes: usize, message: &str) -> Self {
        {
            let mut state = self.state();
            state.fetch_budget = Some(successes);
            state.fetch_failure = message.to_string();
        }
        self
    }

    /// Replaces the neighbor text between cycles.
    pub fn set_lldp_text(&self, text: impl Into<String>) {
        self.state().lldp_text = text.into();
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    /// Number of neighbor-detail fetches attempted.
    pub fn fetch_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| {
                matches!(call, RecordedCall::Enable { commands, .. }
                    if commands.iter().any(|c| c == SHOW_LLDP_DETAIL))
            })
            .count()
    }

    /// Number of `show ip` queries received.
    pub fn query_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| {
                matches!(call, RecordedCall::Enable { commands, .. }
                    if commands.iter().any(|c| c.starts_with("show ip ")))
            })
            .count()
    }

    /// Configuration sessions received, in order.
    pub fn config_calls(&self) -> Vec<Vec<String>> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Config { lines } => Some(lines.clone()),
                RecordedCall::Enable { .. } => None,
            })
            .collect()
    }

    /// Address now configured on `key`, if any.
    pub fn address(&self, key: &str) -> Option<String> {
        self.state().addresses.get(key).cloned()
    }

    fn fetch(state: &mut MockState) -> AutoIpCfgResult<Value> {
        if let Some(budget) = state.fetch_budget {
            if state.fetches >= budget {
                return Err(AutoIpCfgError::connection(
                    "mock",
                    state.fetch_failure.clone(),
                ));
            }
        }
        state.fetches += 1;
        Ok(json!({ "output": state.lldp_text }))
    }

    fn show_ip(state: &MockState, command: &str) -> AutoIpCfgResult<Value> {
        let key = interface_key(command);
        if state.l2_ports.contains(&key) {
            return Err(AutoIpCfgError::Command {
                code: 1002,
                message: format!("CLI command 2 of 2 '{}' failed: invalid command", command),
                output: vec![format!("! IP configuration is not supported on {}", key)],
            });
        }
        // A routed port without an address reports 0.0.0.0/0.
        let address = state
            .addresses
            .get(&key)
            .cloned()
            .unwrap_or_else(|| "0.0.0.0".to_string());
        let mut interfaces = serde_json::Map::new();
        interfaces.insert(
            key,
            json!({
                "interfaceAddress": {
                    "primaryIp": { "address": address, "maskLen": 0 }
                }
            }),
        );
        Ok(json!({ "interfaces": interfaces }))
    }
}

#[async_trait]
impl EapiNode for MockNode {
    async fn enable(&self, commands: &[String], encoding: Encoding) -> AutoIpCfgResult<Vec<Value>> {
        let mut state = self.state();
        state.calls.push(RecordedCall::Enable {
            commands: commands.to_vec(),
            encoding,
        });

        commands
            .iter()
            .map(|cmd| {
                if cmd == SHOW_LLDP_DETAIL {
                    Self::fetch(&mut state)
                } else if cmd.starts_with("show ip ") {
                    Self::show_ip(&state, cmd)
                } else {
                    Ok(json!({}))
                }
            })
            .collect()
    }

    async fn config(&self, lines: &[String]) -> AutoIpCfgResult<()> {
        let mut state = self.state();
        state.calls.push(RecordedCall::Config {
            lines: lines.to_vec(),
        });

        let Some(intf) = lines.first() else {
            return Ok(());
        };
        if let Some((code, message)) = state.config_failures.get(intf) {
            return Err(AutoIpCfgError::Command {
                code: *code,
                message: message.clone(),
                output: Vec::new(),
            });
        }

        let key = interface_key(intf);
        for line in &lines[1..] {
            if line == "no switchport" {
                state.l2_ports.remove(&key);
            } else if let Some(prefix) = line.strip_prefix("ip address ") {
                let address = prefix.trim().split('/').next().unwrap_or_default();
                state.addresses.insert(key.clone(), address.to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_show_ip_l2_port_fails() {
        let node = MockNode::new().with_l2_port("Ethernet2");
        let err = node
            .enable(&["show ip Interface Ethernet2".to_string()], Encoding::Json)
            .await
            .unwrap_err();
        assert!(err.is_command());
    }

    #[tokio::test]
    async fn test_config_updates_address() {
        let node = MockNode::new().with_l2_port("Ethernet1");
        node.config(&[
            "Interface Ethernet1".to_string(),
            "no switchport".to_string(),
            "ip address 10.0.0.1/31".to_string(),
        ])
        .await
        .unwrap();

        assert_eq!(node.address("Ethernet1").as_deref(), Some("10.0.0.1"));
        let results = node
            .enable(&["show ip Interface Ethernet1".to_string()], Encoding::Json)
            .await
            .unwrap();
        assert_eq!(
            results[0]["interfaces"]["Ethernet1"]["interfaceAddress"]["primaryIp"]["address"],
            "10.0.0.1"
        );
    }

    #[tokio::test]
    async fn test_fetch_budget() {
        let node = MockNode::new()
            .with_lldp_text("x")
            .with_fetch_failure_after(1, "connection reset");
        let cmd = vec![SHOW_LLDP_DETAIL.to_string()];

        assert!(node.enable(&cmd, Encoding::Text).await.is_ok());
        let err = node.enable(&cmd, Encoding::Text).await.unwrap_err();
        assert!(err.is_connection());
        assert_eq!(node.fetch_count(), 2);
    }
}
