//! autoipcfg entry point.
//!
//! Parses the command line, sets up logging, and hands over to
//! [`autoipcfgd::daemon::run`] with the HTTP eAPI client.

use autoipcfg_common::{AutoIpCfgResult, HttpNode, Logger, TracingSink, LOG_TARGET};
use autoipcfgd::{daemon, DaemonError, Settings};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Automatically configure IP address via LLDP neighbor information
#[derive(Parser, Debug)]
#[command(name = "autoipcfg")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Node to connect to
    #[arg(long, default_value = "localhost")]
    node: String,

    /// Delimiter in port description
    #[arg(long, default_value = ":", allow_hyphen_values = true)]
    delim: String,

    /// Waiting period between runs, in seconds
    #[arg(long, default_value_t = 30.0)]
    interval: f64,

    /// Turn off syslog messages
    #[arg(long = "no-syslog", alias = "no_syslog")]
    no_syslog: bool,

    /// Connection profile file (YAML)
    #[arg(long = "config", value_name = "CONFIGFILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,

    /// Stop after this many poll cycles
    #[arg(long)]
    max_cycles: Option<u64>,
}

impl Args {
    fn into_settings(self) -> AutoIpCfgResult<Settings> {
        let settings = Settings {
            interval: Settings::interval_from_secs(self.interval)?,
            node: self.node,
            delimiter: self.delim,
            log_enabled: !self.no_syslog,
            config_path: self.config,
            max_cycles: self.max_cycles,
        };
        settings.validate()?;
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("autoipcfg: {}", e);
        return ExitCode::FAILURE;
    }

    let settings = match args.into_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("autoipcfg: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(node = %settings.node, "autoipcfg: Starting");

    let logger = Logger::new(Arc::new(TracingSink), settings.log_enabled);
    let shutdown = setup_signal_handlers();

    match daemon::run(&settings, logger, HttpNode::connect, shutdown).await {
        Ok(cycles) => {
            info!(cycles, "autoipcfg: Exiting normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Process log filter for `level`. The operator log target stays enabled
/// at every level.
fn log_filter(level: &str) -> Result<EnvFilter, DaemonError> {
    let operator: Directive = format!("{}=trace", LOG_TARGET)
        .parse()
        .map_err(|e| DaemonError::Logging(format!("Invalid operator log directive: {}", e)))?;
    let filter = EnvFilter::try_new(level)
        .map_err(|e| DaemonError::Logging(format!("Invalid log level '{}': {}", level, e)))?;
    Ok(filter.add_directive(operator))
}

/// Initialize structured logging
fn init_logging(level: &str) -> Result<(), DaemonError> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(level)?)
        .with_target(true)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| DaemonError::Logging(format!("Failed to set logger: {}", e)))
}

/// Cancels the returned token on SIGINT.
fn setup_signal_handlers() -> CancellationToken {
    let shutdown = CancellationToken::new();
    let token = shutdown.clone();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("autoipcfg: Received SIGINT");
            token.cancel();
        }
    });

    shutdown
}
