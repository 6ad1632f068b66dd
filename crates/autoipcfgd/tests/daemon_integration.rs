//! Startup and shutdown behavior of the daemon runner.

use autoipcfg_common::{AutoIpCfgError, ConnectionProfile, Logger, Severity, Transport};
use autoipcfg_test::{assert_logged, described, LldpDetailBuilder, MockNode, RecordingSink};
use autoipcfgd::{daemon, DaemonError, Settings};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn settings(node: &str) -> Settings {
    Settings {
        node: node.to_string(),
        interval: Duration::ZERO,
        ..Settings::default()
    }
}

fn mock_with_neighbor() -> Arc<MockNode> {
    Arc::new(
        MockNode::new().with_lldp_text(
            LldpDetailBuilder::new()
                .neighbor("Ethernet1", &described("uplink", ":", "10.0.0.1/31"))
                .build(),
        ),
    )
}

#[tokio::test]
async fn test_unknown_target_fails_before_connecting() {
    let sink = Arc::new(RecordingSink::new());
    let node = mock_with_neighbor();
    let connected = Cell::new(false);

    let err = daemon::run(
        &settings("leaf9"),
        Logger::new(sink.clone(), true),
        |_profile: &ConnectionProfile| {
            connected.set(true);
            Ok(node.clone())
        },
        CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(err.is_target_not_found());
    assert_eq!(err.to_string(), "leaf9 not found in config file(s)");
    assert!(!connected.get());
    assert_eq!(node.fetch_count(), 0);
    assert_eq!(
        sink.entries(),
        vec![(Severity::Error, "leaf9 not found in config file(s)".to_string())]
    );
}

#[tokio::test]
async fn test_localhost_runs_scheduled_cycles() {
    let sink = Arc::new(RecordingSink::new());
    let node = mock_with_neighbor();
    let settings = Settings {
        max_cycles: Some(3),
        ..settings("localhost")
    };

    let cycles = daemon::run(
        &settings,
        Logger::new(sink.clone(), true),
        |profile: &ConnectionProfile| {
            assert_eq!(profile.host, "localhost");
            Ok(node.clone())
        },
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(cycles, 3);
    assert_eq!(node.fetch_count(), 3);
    assert_eq!(node.config_calls().len(), 1);
    assert_logged(
        &sink,
        Severity::Notice,
        "adding ip address 10.0.0.1/31 to interface Interface Ethernet1",
    )
    .unwrap();
}

#[tokio::test]
async fn test_profile_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "connections:\n  leaf1:\n    host: 192.0.2.10\n    transport: http\n    username: eapi\n    password: secret\n"
    )
    .unwrap();

    let node = mock_with_neighbor();
    let settings = Settings {
        config_path: Some(file.path().to_path_buf()),
        max_cycles: Some(1),
        ..settings("leaf1")
    };

    let cycles = daemon::run(
        &settings,
        Logger::disabled(),
        |profile: &ConnectionProfile| {
            assert_eq!(profile.host, "192.0.2.10");
            assert_eq!(profile.transport, Transport::Http);
            assert_eq!(profile.url(), "http://192.0.2.10:80/command-api");
            Ok(node.clone())
        },
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(cycles, 1);
    assert_eq!(node.config_calls().len(), 1);
}

#[tokio::test]
async fn test_connect_failure_is_setup_error() {
    let sink = Arc::new(RecordingSink::new());

    let err = daemon::run(
        &settings("localhost"),
        Logger::new(sink.clone(), true),
        |_profile: &ConnectionProfile| -> Result<Arc<MockNode>, AutoIpCfgError> {
            Err(AutoIpCfgError::connection("localhost", "tls setup failed"))
        },
        CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DaemonError::Setup(_)));
    assert_logged(&sink, Severity::Error, "tls setup failed").unwrap();
}

#[tokio::test]
async fn test_lost_connection_stops_daemon() {
    let sink = Arc::new(RecordingSink::new());
    let node = Arc::new(
        MockNode::new()
            .with_lldp_text(LldpDetailBuilder::new().build())
            .with_fetch_failure_after(1, "connection refused"),
    );

    let err = daemon::run(
        &settings("localhost"),
        Logger::new(sink.clone(), true),
        |_profile: &ConnectionProfile| Ok(node.clone()),
        CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DaemonError::Fetch(_)));
    assert_eq!(node.fetch_count(), 2);
    assert_logged(&sink, Severity::Error, "connection refused").unwrap();
}

#[tokio::test]
async fn test_shutdown_after_first_cycle() {
    let node = mock_with_neighbor();
    let shutdown = CancellationToken::new();
    shutdown.cancel();

    let cycles = daemon::run(
        &settings("localhost"),
        Logger::disabled(),
        |_profile: &ConnectionProfile| Ok(node.clone()),
        shutdown,
    )
    .await
    .unwrap();

    assert_eq!(cycles, 1);
    assert_eq!(node.fetch_count(), 1);
}

#[tokio::test]
async fn test_invalid_settings_rejected() {
    let settings = Settings {
        delimiter: String::new(),
        ..settings("localhost")
    };

    let err = daemon::run(
        &settings,
        Logger::disabled(),
        |_profile: &ConnectionProfile| Ok(mock_with_neighbor()),
        CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DaemonError::Setup(_)));
}
