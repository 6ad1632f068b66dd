//! Neighbor-detail text parser.
//!
//! Walks the rendered `show lldp neighbors detail` report line by line with
//! two cursors: the current local interface, set by each
//! `Interface Ethernet<n>[/<n>...]` header, and the current candidate
//! address, set by a `- Port Description` line that contains the delimiter.
//! A header clears the candidate, so one interface's address never carries
//! over to the next. Candidates are not validated here.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::types::NeighborMap;

/// Attribute line carrying the neighbor's port description.
pub const PORT_DESCRIPTION_PREFIX: &str = "- Port Description";

/// Separator between an attribute label and its value.
const LABEL_SEPARATOR: &str = ": ";

/// Interface block header, anchored at the start of the line.
static INTERFACE_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Interface Ethernet\d+(?:/\d+)*").expect("Invalid regex pattern"));

/// Errors raised while parsing a neighbor report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A port description line without a `": "` separator.
    #[error("Malformed port description on line {line_number}: '{line}'")]
    MalformedDescription {
        /// 1-based line number in the report.
        line_number: usize,
        /// The offending line.
        line: String,
    },

    #[error("Port description delimiter must not be empty")]
    EmptyDelimiter,
}

/// Parses a neighbor report into local interface -> candidate address.
///
/// A later candidate for the same interface overwrites an earlier one.
pub fn parse_neighbors(text: &str, delimiter: &str) -> Result<NeighborMap, ParseError> {
    if delimiter.is_empty() {
        return Err(ParseError::EmptyDelimiter);
    }

    let mut neighbors = NeighborMap::new();
    let mut interface: Option<&str> = None;
    let mut candidate: Option<String> = None;

    for (idx, line) in text.lines().enumerate() {
        if let Some(header) = INTERFACE_HEADER_RE.find(line) {
            interface = Some(header.as_str());
            candidate = None;
        } else if line.trim().starts_with(PORT_DESCRIPTION_PREFIX) {
            let (_, payload) = line.split_once(LABEL_SEPARATOR).ok_or_else(|| {
                ParseError::MalformedDescription {
                    line_number: idx + 1,
                    line: line.to_string(),
                }
            })?;
            if let Some(extracted) = extract_candidate(payload, delimiter) {
                candidate = Some(extracted);
            }
        }

        if let (Some(intf), Some(addr)) = (interface, candidate.as_ref()) {
            neighbors.insert(intf.to_string(), addr.clone());
        }
    }

    Ok(neighbors)
}

/// Token after the first `delimiter` in a description payload, up to the
/// next occurrence. Double quotes are removed and surrounding whitespace
/// trimmed. Returns `None` when the delimiter does not occur.
pub fn extract_candidate(payload: &str, delimiter: &str) -> Option<String> {
    let segment = payload.split(delimiter).nth(1)?;
    Some(segment.replace('"', "").trim().to_string())
}
