//! LLDP neighbor-detail text fixtures.
//!
//! Renders text shaped like the device's `show lldp neighbors detail`
//! output so parser and reconciler tests read like real captures.

/// One interface block in the neighbor report.
#[derive(Debug, Clone)]
pub struct NeighborBlock {
    /// Local interface, e.g. `Ethernet1` or `Ethernet49/1`.
    pub interface: String,
    /// Raw text after `- Port Description: `, or `None` for a block
    /// without neighbors.
    pub port_description: Option<String>,
    /// Remote system name.
    pub system_name: String,
}

impl NeighborBlock {
    /// Block with one neighbor advertising `port_description`.
    pub fn neighbor(interface: impl Into<String>, port_description: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            port_description: Some(port_description.into()),
            system_name: "spine1".to_string(),
        }
    }

    /// Block reporting zero neighbors.
    pub fn empty(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            port_description: None,
            system_name: String::new(),
        }
    }

    pub fn with_system_name(mut self, name: impl Into<String>) -> Self {
        self.system_name = name.into();
        self
    }

    fn render(&self, out: &mut String) {
        match &self.port_description {
            None => {
                out.push_str(&format!(
                    "Interface {} detected 0 LLDP neighbors:\n\n",
                    self.interface
                ));
            }
            Some(description) => {
                out.push_str(&format!(
                    "Interface {} detected 1 LLDP neighbors:\n\n",
                    self.interface
                ));
                out.push_str("  Neighbor 001c.7300.0001/Ethernet1, age 4 seconds\n");
                out.push_str("  Discovered 2 days, 1:02:03 ago; Last changed 2 days, 1:02:03 ago\n");
                out.push_str("  - Source MAC: 001c.7300.0001\n");
                out.push_str("  - Chassis ID type: MAC address (4)\n");
                out.push_str("    Chassis ID     : 001c.7300.0001\n");
                out.push_str("  - Port ID type: Interface name (5)\n");
                out.push_str("    Port ID     : \"Ethernet1\"\n");
                out.push_str("  - Time To Live: 120 seconds\n");
                out.push_str(&format!("  - Port Description: {}\n", description));
                out.push_str(&format!("  - System Name: \"{}\"\n\n", self.system_name));
            }
        }
    }
}

/// Builder for a full neighbor-detail report.
#[derive(Debug, Clone, Default)]
pub struct LldpDetailBuilder {
    blocks: Vec<NeighborBlock>,
}

impl LldpDetailBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(mut self, block: NeighborBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// Adds a neighbor whose port description is `"<label><delim><address>"`.
    pub fn neighbor(self, interface: &str, port_description: &str) -> Self {
        self.block(NeighborBlock::neighbor(interface, port_description))
    }

    pub fn empty(self, interface: &str) -> Self {
        self.block(NeighborBlock::empty(interface))
    }

    pub fn build(&self) -> String {
        let mut out = String::from(
            "Last table change time   : 0:10:11 ago\n\
             Number of table inserts  : 3\n\
             Number of table deletes  : 0\n\
             Number of table drops    : 0\n\
             Number of table age-outs : 0\n\n",
        );
        for block in &self.blocks {
            block.render(&mut out);
        }
        out
    }
}

/// Quoted port description carrying `address` after `label` and `delim`.
pub fn described(label: &str, delim: &str, address: &str) -> String {
    format!("\"{}{}{}\"", label, delim, address)
}
