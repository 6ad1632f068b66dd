//! Operator-facing log port.
//!
//! The reconciler reports outcomes through a [`Logger`], which owns a
//! [`LogSink`] and the enabled flag captured at startup. Messages are
//! line-oriented: a multi-line message reaches the sink as one call per
//! line. A disabled logger drops messages without buffering them.

use std::fmt;
use std::sync::Arc;

/// Log target used by [`TracingSink`]. Process log filters must leave it
/// enabled; only the [`Logger`] flag turns the operator log off.
pub const LOG_TARGET: &str = "autoipcfg::operator";

/// Message severity, in syslog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for operator log lines.
pub trait LogSink: Send + Sync {
    /// Emits a single line.
    fn emit(&self, severity: Severity, line: &str);
}

/// Forwards log lines to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, severity: Severity, line: &str) {
        match severity {
            Severity::Error => tracing::error!(target: LOG_TARGET, "{}", line),
            Severity::Warning => tracing::warn!(target: LOG_TARGET, "{}", line),
            Severity::Notice | Severity::Info => tracing::info!(target: LOG_TARGET, "{}", line),
            Severity::Debug => tracing::debug!(target: LOG_TARGET, "{}", line),
        }
    }
}

/// Logger handed to the daemon and reconciler.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    enabled: bool,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl Logger {
    pub fn new(sink: Arc<dyn LogSink>, enabled: bool) -> Self {
        Self { sink, enabled }
    }

    /// A logger that discards everything.
    pub fn disabled() -> Self {
        Self::new(Arc::new(TracingSink), false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs `message`, one sink call per line.
    pub fn log(&self, message: &str, severity: Severity) {
        if !self.enabled {
            return;
        }
        for line in message.split('\n') {
            self.sink.emit(severity, line);
        }
    }

    pub fn notice(&self, message: &str) {
        self.log(message, Severity::Notice);
    }

    pub fn error(&self, message: &str) {
        self.log(message, Severity::Error);
    }
}
