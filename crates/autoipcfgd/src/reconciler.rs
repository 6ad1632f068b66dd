//! Reconciliation loop.
//!
//! Each cycle fetches the neighbor report, parses it, and for every
//! candidate compares the interface's current primary address before
//! configuring it. Cycles run back to back with a sleep in between; the
//! only error that escapes a cycle is a lost connection during the fetch.

use autoipcfg_common::{text_output, AutoIpCfgError, AutoIpCfgResult, EapiNode, Encoding, Logger};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::error::{DaemonError, Result};
use crate::lldp_parser::parse_neighbors;
use crate::settings::Schedule;
use crate::types::{neighbor_records, InterfaceAddressState, NeighborRecord};

pub use autoipcfg_common::SHOW_LLDP_DETAIL;

/// What one cycle did, per local interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Entries found in the neighbor report.
    pub neighbors: usize,
    /// Interfaces that were configured.
    pub applied: Vec<String>,
    /// Interfaces already carrying the candidate address.
    pub unchanged: Vec<String>,
    /// Interfaces whose query or configuration failed.
    pub failed: Vec<String>,
    /// The cycle stopped before reconciling (unusable report).
    pub aborted: bool,
}

/// Drives one device toward the addresses its neighbors advertise.
pub struct Reconciler<N> {
    node: N,
    delimiter: String,
    logger: Logger,
}

impl<N: EapiNode> Reconciler<N> {
    pub fn new(node: N, delimiter: impl Into<String>, logger: Logger) -> Self {
        Self {
            node,
            delimiter: delimiter.into(),
            logger,
        }
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    /// Fetches the neighbor report as text.
    pub async fn fetch_neighbor_text(&self) -> AutoIpCfgResult<String> {
        let results = self
            .node
            .enable(&[SHOW_LLDP_DETAIL.to_string()], Encoding::Text)
            .await?;
        let first = results
            .first()
            .ok_or_else(|| AutoIpCfgError::invalid_response("no result for neighbor query"))?;
        Ok(text_output(first)?.to_string())
    }

    /// Current primary address of `record`'s interface.
    ///
    /// A command error means the interface has no routed context (a
    /// switchport) and reads as [`InterfaceAddressState::Absent`].
    pub async fn current_address(&self, record: &NeighborRecord) -> AutoIpCfgResult<InterfaceAddressState> {
        let cmd = format!("show ip {}", record.local_interface);
        match self.node.enable(&[cmd], Encoding::Json).await {
            Ok(results) => Ok(results
                .first()
                .map(|result| InterfaceAddressState::from_show_ip(result, record.interface_key()))
                .unwrap_or(InterfaceAddressState::Absent)),
            Err(e) if e.is_command() => {
                debug!(interface = %record.local_interface, error = %e, "No routed address context");
                Ok(InterfaceAddressState::Absent)
            }
            Err(e) => Err(e),
        }
    }

    /// Routes the interface and assigns `candidate` to it.
    pub async fn apply(&self, record: &NeighborRecord, candidate: &str) -> AutoIpCfgResult<()> {
        self.node
            .config(&[
                record.local_interface.clone(),
                "no switchport".to_string(),
                format!("ip address {}", candidate),
            ])
            .await
    }

    /// Runs one poll cycle.
    ///
    /// Returns `Err` only when the connection fails during the fetch.
    #[instrument(skip(self))]
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let mut report = CycleReport::default();

        let text = match self.fetch_neighbor_text().await {
            Ok(text) => text,
            Err(e) if e.is_connection() => {
                self.logger.error(&e.to_string());
                return Err(DaemonError::Fetch(e));
            }
            Err(e) => {
                self.logger
                    .error(&format!("Error: {}\nUnable to read LLDP neighbors", e.detail()));
                report.aborted = true;
                return Ok(report);
            }
        };

        let neighbors = match parse_neighbors(&text, &self.delimiter) {
            Ok(neighbors) => neighbors,
            Err(e) => {
                self.logger
                    .error(&format!("Error: {}\nSkipping LLDP neighbors this cycle", e));
                report.aborted = true;
                return Ok(report);
            }
        };
        report.neighbors = neighbors.len();

        for record in neighbor_records(neighbors) {
            let Some(candidate) = record.candidate() else {
                continue;
            };
            let intf = record.local_interface.clone();

            let current = match self.current_address(&record).await {
                Ok(current) => current,
                Err(e) => {
                    self.logger.error(&format!(
                        "Error: {}\nUnable to read ip address of {}",
                        e.detail(),
                        intf
                    ));
                    report.failed.push(intf);
                    continue;
                }
            };

            if current.matches(candidate) {
                debug!(interface = %intf, address = candidate, "Address already configured");
                report.unchanged.push(intf);
                continue;
            }

            match self.apply(&record, candidate).await {
                Ok(()) => {
                    self.logger.notice(&format!(
                        "adding ip address {} to interface {}",
                        candidate, intf
                    ));
                    report.applied.push(intf);
                }
                Err(e) => {
                    self.logger.error(&format!(
                        "Error: {}\nTrying to configure ip address {} on {}",
                        e.detail(),
                        candidate,
                        intf
                    ));
                    report.failed.push(intf);
                }
            }
        }

        Ok(report)
    }

    /// Polls until `schedule` is exhausted or `shutdown` fires. Returns the
    /// number of completed cycles.
    ///
    /// Cancellation is observed between cycles only.
    pub async fn run(&self, schedule: Schedule, shutdown: &CancellationToken) -> Result<u64> {
        let mut cycles = 0u64;
        loop {
            let report = self.run_cycle().await?;
            cycles += 1;
            debug!(
                cycle = cycles,
                neighbors = report.neighbors,
                applied = report.applied.len(),
                unchanged = report.unchanged.len(),
                failed = report.failed.len(),
                "Cycle complete"
            );

            if schedule.max_cycles.is_some_and(|max| cycles >= max) {
                break;
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!(cycles, "Shutdown requested");
                    break;
                }
                _ = tokio::time::sleep(schedule.interval) => {}
            }
        }
        Ok(cycles)
    }
}
