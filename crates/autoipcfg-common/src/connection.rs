//! Connection profiles for eAPI targets.
//!
//! Profiles are loaded once at startup from an optional YAML file and are
//! read-only afterwards. A `localhost` profile pointing at the on-box
//! HTTP endpoint is always available unless the file redefines it.
//!
//! ```yaml
//! connections:
//!   leaf1:
//!     host: 192.0.2.10
//!     transport: https
//!     username: eapi
//!     password: changeme
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::net::Ipv6Addr;
use std::path::Path;
use std::time::Duration;

use crate::error::{AutoIpCfgError, AutoIpCfgResult};

/// Name of the built-in on-box profile.
pub const LOCALHOST: &str = "localhost";

/// eAPI endpoint path.
pub const COMMAND_API_PATH: &str = "/command-api";

/// Default values for connection profiles.
pub mod defaults {
    /// Default eAPI user.
    pub const USERNAME: &str = "admin";

    /// Default request timeout in seconds.
    pub const TIMEOUT_SECS: u64 = 60;
}

/// How the eAPI endpoint is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    #[default]
    Https,
    /// The unauthenticated on-box HTTP listener.
    HttpLocal,
}

impl Transport {
    /// URL scheme for this transport.
    pub fn scheme(&self) -> &'static str {
        match self {
            Transport::Https => "https",
            Transport::Http | Transport::HttpLocal => "http",
        }
    }

    /// Port used when the profile does not name one.
    pub fn default_port(&self) -> u16 {
        match self {
            Transport::Http => 80,
            Transport::Https => 443,
            Transport::HttpLocal => 8080,
        }
    }
}

/// A resolved connection target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionProfile {
    /// Hostname or address of the device.
    pub host: String,
    #[serde(default)]
    pub transport: Transport,
    /// Explicit port; falls back to [`Transport::default_port`].
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Verify the device certificate. Devices ship self-signed
    /// certificates, so this is off unless requested.
    #[serde(default)]
    pub verify_tls: bool,
}

fn default_username() -> String {
    defaults::USERNAME.to_string()
}

fn default_timeout_secs() -> u64 {
    defaults::TIMEOUT_SECS
}

impl ConnectionProfile {
    /// The built-in on-box profile.
    pub fn localhost() -> Self {
        Self {
            host: LOCALHOST.to_string(),
            transport: Transport::HttpLocal,
            port: None,
            username: default_username(),
            password: String::new(),
            timeout_secs: defaults::TIMEOUT_SECS,
            verify_tls: false,
        }
    }

    /// Port after applying the transport default.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.transport.default_port())
    }

    /// Host as it appears in a URL authority; IPv6 literals are bracketed.
    pub fn url_host(&self) -> String {
        match self.host.parse::<Ipv6Addr>() {
            Ok(addr) => format!("[{}]", addr),
            Err(_) => self.host.clone(),
        }
    }

    /// Full URL of the eAPI endpoint.
    pub fn url(&self) -> String {
        format!(
            "{}://{}:{}{}",
            self.transport.scheme(),
            self.url_host(),
            self.effective_port(),
            COMMAND_API_PATH
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self, name: &str) -> AutoIpCfgResult<()> {
        if self.host.trim().is_empty() {
            return Err(AutoIpCfgError::invalid_config(
                format!("connections.{}.host", name),
                "host must not be empty",
            ));
        }
        if self.port == Some(0) {
            return Err(AutoIpCfgError::invalid_config(
                format!("connections.{}.port", name),
                "port must be non-zero",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(AutoIpCfgError::invalid_config(
                format!("connections.{}.timeout_secs", name),
                "timeout must be non-zero",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConnectionFile {
    #[serde(default)]
    connections: HashMap<String, ConnectionProfile>,
}

/// The set of known connection targets.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    profiles: HashMap<String, ConnectionProfile>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(LOCALHOST.to_string(), ConnectionProfile::localhost());
        Self { profiles }
    }
}

impl ConnectionConfig {
    /// Parses profiles from YAML text, on top of the built-in `localhost`.
    pub fn from_yaml(text: &str) -> AutoIpCfgResult<Self> {
        let file: ConnectionFile = if text.trim().is_empty() {
            ConnectionFile::default()
        } else {
            serde_yaml::from_str(text).map_err(|source| AutoIpCfgError::ConfigParse { source })?
        };

        let mut config = Self::default();
        for (name, profile) in file.connections {
            profile.validate(&name)?;
            config.profiles.insert(name, profile);
        }
        Ok(config)
    }

    /// Reads profiles from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> AutoIpCfgResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AutoIpCfgError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!(path = %path.display(), targets = config.profiles.len(), "Loaded connection config");
        Ok(config)
    }

    /// Loads from `path` when given, otherwise just the built-in profile.
    pub fn load_optional(path: Option<&Path>) -> AutoIpCfgResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Looks up a target by name.
    pub fn resolve(&self, name: &str) -> AutoIpCfgResult<&ConnectionProfile> {
        self.profiles
            .get(name)
            .ok_or_else(|| AutoIpCfgError::target_not_found(name))
    }

    /// Known target names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost_builtin() {
        let config = ConnectionConfig::default();
        let profile = config.resolve("localhost").unwrap();
        assert_eq!(profile.transport, Transport::HttpLocal);
        assert_eq!(profile.url(), "http://localhost:8080/command-api");
        assert_eq!(profile.username, "admin");
    }

    #[test]
    fn test_unknown_target() {
        let config = ConnectionConfig::default();
        let err = config.resolve("spine9").unwrap_err();
        assert!(matches!(err, AutoIpCfgError::TargetNotFound { ref name } if name == "spine9"));
    }

    #[test]
    fn test_from_yaml_defaults() {
        let config = ConnectionConfig::from_yaml(
            r#"
connections:
  leaf1:
    host: 192.0.2.10
    password: changeme
"#,
        )
        .unwrap();

        let profile = config.resolve("leaf1").unwrap();
        assert_eq!(profile.transport, Transport::Https);
        assert_eq!(profile.effective_port(), 443);
        assert_eq!(profile.username, "admin");
        assert_eq!(profile.password, "changeme");
        assert_eq!(profile.timeout(), Duration::from_secs(60));
        assert!(!profile.verify_tls);
        assert_eq!(profile.url(), "https://192.0.2.10:443/command-api");

        // Built-in profile survives alongside file entries
        assert_eq!(config.names(), vec!["leaf1", "localhost"]);
    }

    #[test]
    fn test_from_yaml_explicit_fields() {
        let config = ConnectionConfig::from_yaml(
            r#"
connections:
  spine1:
    host: spine1.example.net
    transport: http
    port: 8081
    username: eapi
    timeout_secs: 5
"#,
        )
        .unwrap();

        let profile = config.resolve("spine1").unwrap();
        assert_eq!(profile.url(), "http://spine1.example.net:8081/command-api");
        assert_eq!(profile.username, "eapi");
        assert_eq!(profile.timeout_secs, 5);
    }

    #[test]
    fn test_from_yaml_overrides_localhost() {
        let config = ConnectionConfig::from_yaml(
            r#"
connections:
  localhost:
    host: 127.0.0.1
    transport: https
"#,
        )
        .unwrap();
        let profile = config.resolve("localhost").unwrap();
        assert_eq!(profile.url(), "https://127.0.0.1:443/command-api");
    }

    #[test]
    fn test_from_yaml_empty() {
        let config = ConnectionConfig::from_yaml("").unwrap();
        assert_eq!(config.names(), vec!["localhost"]);
    }

    #[test]
    fn test_from_yaml_rejects_bad_transport() {
        let err = ConnectionConfig::from_yaml(
            r#"
connections:
  leaf1:
    host: 192.0.2.10
    transport: socket
"#,
        )
        .unwrap_err();
        assert!(matches!(err, AutoIpCfgError::ConfigParse { .. }));
    }

    #[test]
    fn test_from_yaml_rejects_zero_port() {
        let err = ConnectionConfig::from_yaml(
            r#"
connections:
  leaf1:
    host: 192.0.2.10
    port: 0
"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration for connections.leaf1.port: port must be non-zero"
        );
    }

    #[test]
    fn test_ipv6_host_url() {
        let config =
            ConnectionConfig::from_yaml("connections:\n  leaf6:\n    host: \"2001:db8::1\"\n")
                .unwrap();
        let profile = config.resolve("leaf6").unwrap();

        assert_eq!(profile.url(), "https://[2001:db8::1]:443/command-api");
        let url = reqwest::Url::parse(&profile.url()).unwrap();
        assert_eq!(url.host_str(), Some("[2001:db8::1]"));
        assert_eq!(url.port_or_known_default(), Some(443));
    }

    #[test]
    fn test_bracketed_and_named_hosts_unchanged() {
        let mut profile = ConnectionProfile::localhost();
        assert_eq!(profile.url_host(), "localhost");

        profile.host = "[2001:db8::2]".to_string();
        profile.port = Some(8443);
        assert_eq!(profile.url(), "http://[2001:db8::2]:8443/command-api");
        assert!(reqwest::Url::parse(&profile.url()).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eapi.yaml");
        std::fs::write(&path, "connections:\n  leaf2:\n    host: 192.0.2.20\n").unwrap();

        let config = ConnectionConfig::load_optional(Some(path.as_path())).unwrap();
        assert_eq!(config.resolve("leaf2").unwrap().host, "192.0.2.20");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        let err = ConnectionConfig::load(&path).unwrap_err();
        assert!(matches!(err, AutoIpCfgError::ConfigIo { .. }));
    }
}
