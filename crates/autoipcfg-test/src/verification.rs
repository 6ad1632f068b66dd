//! Verification helpers for reconciler tests
//!
//! Checks the configuration sessions a [`MockNode`] received and the lines a
//! [`RecordingSink`] captured.

use crate::{MockNode, RecordingSink};
use autoipcfg_common::Severity;
use thiserror::Error;

/// Verification error types
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Expected {expected} configuration sessions for '{interface}', found {actual}")]
    SessionCountMismatch {
        interface: String,
        expected: usize,
        actual: usize,
    },

    #[error("Configuration for '{interface}' was {actual:?}, expected {expected:?}")]
    SessionMismatch {
        interface: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("No {severity} line containing '{needle}' was logged")]
    LineNotLogged { severity: Severity, needle: String },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// The configuration session the reconciler sends for one interface.
pub fn expected_session(interface: &str, candidate: &str) -> Vec<String> {
    vec![
        interface.to_string(),
        "no switchport".to_string(),
        format!("ip address {}", candidate),
    ]
}

/// Configuration-session verification helper
pub struct NodeVerifier<'a> {
    node: &'a MockNode,
}

impl<'a> NodeVerifier<'a> {
    pub fn new(node: &'a MockNode) -> Self {
        Self { node }
    }

    fn sessions_for(&self, interface: &str) -> Vec<Vec<String>> {
        self.node
            .config_calls()
            .into_iter()
            .filter(|lines| lines.first().map(String::as_str) == Some(interface))
            .collect()
    }

    /// Verify exactly one session configured `candidate` on `interface`.
    pub fn assert_applied_once(&self, interface: &str, candidate: &str) -> VerifyResult<()> {
        let sessions = self.sessions_for(interface);
        if sessions.len() != 1 {
            return Err(VerificationError::SessionCountMismatch {
                interface: interface.to_string(),
                expected: 1,
                actual: sessions.len(),
            });
        }
        let expected = expected_session(interface, candidate);
        if sessions[0] != expected {
            return Err(VerificationError::SessionMismatch {
                interface: interface.to_string(),
                expected,
                actual: sessions[0].clone(),
            });
        }
        Ok(())
    }

    /// Verify no session touched `interface`.
    pub fn assert_not_applied(&self, interface: &str) -> VerifyResult<()> {
        let actual = self.sessions_for(interface).len();
        if actual != 0 {
            return Err(VerificationError::SessionCountMismatch {
                interface: interface.to_string(),
                expected: 0,
                actual,
            });
        }
        Ok(())
    }
}

/// Verify a line at `severity` containing `needle` was logged.
pub fn assert_logged(sink: &RecordingSink, severity: Severity, needle: &str) -> VerifyResult<()> {
    if sink
        .lines_at(severity)
        .iter()
        .any(|line| line.contains(needle))
    {
        Ok(())
    } else {
        Err(VerificationError::LineNotLogged {
            severity,
            needle: needle.to_string(),
        })
    }
}
