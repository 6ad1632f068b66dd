//! Log sink that keeps every line for later assertions.

use autoipcfg_common::{LogSink, Severity};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<(Severity, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Lines logged at `severity`.
    pub fn lines_at(&self, severity: Severity) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, line)| line)
            .collect()
    }

    /// True if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|(_, line)| line.contains(needle))
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl LogSink for RecordingSink {
    fn emit(&self, severity: Severity, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((severity, line.to_string()));
    }
}
