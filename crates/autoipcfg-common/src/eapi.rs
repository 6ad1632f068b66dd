//! eAPI client.
//!
//! [`EapiNode`] is the seam the reconciler talks through: run privileged
//! show commands and apply configuration lines. [`HttpNode`] implements it
//! with JSON-RPC `runCmds` requests over HTTP(S).
//!
//! # Example
//!
//! ```ignore
//! use autoipcfg_common::{ConnectionConfig, EapiNode, Encoding, HttpNode};
//!
//! let config = ConnectionConfig::default();
//! let node = HttpNode::connect(config.resolve("localhost")?)?;
//! let results = node
//!     .enable(&["show lldp neighbors detail".to_string()], Encoding::Text)
//!     .await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::connection::{ConnectionProfile, Transport};
use crate::error::{AutoIpCfgError, AutoIpCfgResult};

/// JSON-RPC method used for every request.
pub const RUN_CMDS: &str = "runCmds";

/// Command returning the LLDP neighbor report.
pub const SHOW_LLDP_DETAIL: &str = "show lldp neighbors detail";

/// Result encoding requested from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Structured results.
    Json,
    /// CLI text, returned under an `output` key.
    Text,
}

/// Remote command execution against one device.
#[async_trait]
pub trait EapiNode: Send + Sync {
    /// Runs `commands` in privileged mode and returns one result per command.
    async fn enable(&self, commands: &[String], encoding: Encoding) -> AutoIpCfgResult<Vec<Value>>;

    /// Applies configuration `lines` in a configuration session.
    async fn config(&self, lines: &[String]) -> AutoIpCfgResult<()>;
}

#[async_trait]
impl<T: EapiNode + ?Sized> EapiNode for Arc<T> {
    async fn enable(&self, commands: &[String], encoding: Encoding) -> AutoIpCfgResult<Vec<Value>> {
        (**self).enable(commands, encoding).await
    }

    async fn config(&self, lines: &[String]) -> AutoIpCfgResult<()> {
        (**self).config(lines).await
    }
}

/// Extracts the CLI text from a text-encoded command result.
pub fn text_output(result: &Value) -> AutoIpCfgResult<&str> {
    result
        .get("output")
        .and_then(Value::as_str)
        .ok_or_else(|| AutoIpCfgError::invalid_response("text result has no 'output' string"))
}

#[derive(Debug, Serialize)]
struct RunCmdsParams<'a> {
    version: u32,
    cmds: &'a [String],
    format: Encoding,
}

/// A `runCmds` JSON-RPC request body.
#[derive(Debug, Serialize)]
pub struct RunCmdsRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: RunCmdsParams<'a>,
    id: String,
}

impl<'a> RunCmdsRequest<'a> {
    pub fn new(cmds: &'a [String], format: Encoding, id: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            method: RUN_CMDS,
            params: RunCmdsParams {
                version: 1,
                cmds,
                format,
            },
            id: id.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Vec<Value>,
}

/// A `runCmds` JSON-RPC response body.
#[derive(Debug, Deserialize)]
pub struct RunCmdsResponse {
    #[serde(default)]
    result: Option<Vec<Value>>,
    #[serde(default)]
    error: Option<RpcError>,
}

impl RunCmdsResponse {
    /// Converts the response into per-command results.
    ///
    /// A JSON-RPC error becomes [`AutoIpCfgError::Command`], carrying the
    /// `errors` lines of whichever command failed.
    pub fn into_results(self) -> AutoIpCfgResult<Vec<Value>> {
        if let Some(err) = self.error {
            let output = err
                .data
                .iter()
                .filter_map(|item| item.get("errors").and_then(Value::as_array))
                .flatten()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            return Err(AutoIpCfgError::Command {
                code: err.code,
                message: err.message,
                output,
            });
        }
        self.result
            .ok_or_else(|| AutoIpCfgError::invalid_response("response has neither result nor error"))
    }
}

/// eAPI over HTTP(S).
#[derive(Debug)]
pub struct HttpNode {
    client: reqwest::Client,
    url: String,
    credentials: Option<(String, String)>,
    next_id: AtomicU64,
}

impl HttpNode {
    /// Builds a client for `profile`. No request is sent until the first
    /// command runs.
    pub fn connect(profile: &ConnectionProfile) -> AutoIpCfgResult<Self> {
        let url = profile.url();
        let client = reqwest::Client::builder()
            .timeout(profile.timeout())
            .danger_accept_invalid_certs(!profile.verify_tls)
            .build()
            .map_err(|e| AutoIpCfgError::connection(&url, e.to_string()))?;

        // The on-box listener does not authenticate.
        let credentials = match profile.transport {
            Transport::HttpLocal => None,
            Transport::Http | Transport::Https => {
                Some((profile.username.clone(), profile.password.clone()))
            }
        };

        tracing::debug!(url = %url, "Created eAPI client");

        Ok(Self {
            client,
            url,
            credentials,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one `runCmds` request and returns the per-command results.
    pub async fn run_commands(
        &self,
        cmds: &[String],
        encoding: Encoding,
    ) -> AutoIpCfgResult<Vec<Value>> {
        let id = format!("autoipcfg-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let body = RunCmdsRequest::new(cmds, encoding, id);
        tracing::debug!(url = %self.url, cmds = ?cmds, "Sending eAPI request");

        let mut request = self.client.post(&self.url).json(&body);
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }

        let resp = request
            .send()
            .await
            .map_err(|e| AutoIpCfgError::connection(&self.url, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AutoIpCfgError::connection(
                &self.url,
                format!("HTTP {}: {}", status, text.trim()),
            ));
        }

        let decoded: RunCmdsResponse = resp
            .json()
            .await
            .map_err(|e| AutoIpCfgError::invalid_response(e.to_string()))?;
        let results = decoded.into_results()?;

        if results.len() != cmds.len() {
            return Err(AutoIpCfgError::invalid_response(format!(
                "expected {} results, got {}",
                cmds.len(),
                results.len()
            )));
        }
        tracing::trace!(url = %self.url, results = results.len(), "eAPI request succeeded");
        Ok(results)
    }
}

#[async_trait]
impl EapiNode for HttpNode {
    async fn enable(&self, commands: &[String], encoding: Encoding) -> AutoIpCfgResult<Vec<Value>> {
        let mut cmds = Vec::with_capacity(commands.len() + 1);
        cmds.push("enable".to_string());
        cmds.extend_from_slice(commands);

        let mut results = self.run_commands(&cmds, encoding).await?;
        results.remove(0);
        Ok(results)
    }

    async fn config(&self, lines: &[String]) -> AutoIpCfgResult<()> {
        let mut cmds = Vec::with_capacity(lines.len() + 3);
        cmds.push("enable".to_string());
        cmds.push("configure".to_string());
        cmds.extend_from_slice(lines);
        cmds.push("end".to_string());

        self.run_commands(&cmds, Encoding::Json).await?;
        Ok(())
    }
}
