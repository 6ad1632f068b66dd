//! Daemon startup and main loop.

use autoipcfg_common::{
    AutoIpCfgError, AutoIpCfgResult, ConnectionConfig, ConnectionProfile, EapiNode, Logger,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{DaemonError, Result};
use crate::reconciler::Reconciler;
use crate::settings::Settings;

/// Resolves the target, connects, and reconciles until the schedule ends,
/// `shutdown` fires, or the connection is lost.
///
/// Setup failures are logged once and returned before any command is sent.
/// Returns the number of completed cycles.
pub async fn run<N, F>(
    settings: &Settings,
    logger: Logger,
    connect: F,
    shutdown: CancellationToken,
) -> Result<u64>
where
    N: EapiNode,
    F: FnOnce(&ConnectionProfile) -> AutoIpCfgResult<N>,
{
    let setup_failed = |e: AutoIpCfgError| {
        logger.error(&e.to_string());
        DaemonError::Setup(e)
    };

    settings.validate().map_err(setup_failed)?;
    let connections =
        ConnectionConfig::load_optional(settings.config_path.as_deref()).map_err(setup_failed)?;
    let profile = connections.resolve(&settings.node).map_err(setup_failed)?;
    let node = connect(profile).map_err(setup_failed)?;

    info!(
        node = %settings.node,
        url = %profile.url(),
        delimiter = %settings.delimiter,
        interval_secs = settings.interval.as_secs_f64(),
        "Connected; starting reconciliation"
    );

    let reconciler = Reconciler::new(node, settings.delimiter.clone(), logger);
    reconciler.run(settings.schedule(), &shutdown).await
}
