//! svcpanel Library
//!
//! Terminal control panel for one supervised system service: a live,
//! time-filtered view of its log plus start/stop controls gated on the
//! privilege level of the process.

use std::sync::Arc;

use svcpanel_app::{Collaborators, Relaunch, Settings};
use svcpanel_core::prelude::*;
use svcpanel_platform::{JournalChannel, SudoLauncher, SystemdManager, UidPrivilegeOracle};

pub use svcpanel_app::{load_settings, ExitReason};
pub use svcpanel_tui::RunOutcome;

/// The Linux backends: journald for logs, systemd for the service and sudo
/// for elevation
pub fn system_collaborators(settings: &Settings) -> Result<Collaborators> {
    Ok(Collaborators {
        channel: Arc::new(JournalChannel::new(settings.log_channel())),
        services: Arc::new(SystemdManager::new()),
        oracle: Arc::new(UidPrivilegeOracle::new()),
        launcher: Arc::new(SudoLauncher::new()),
        relaunch: Relaunch::current()?,
    })
}

/// Install error reporting and file logging.
///
/// Call before loading settings so config warnings reach the log.
pub fn init() -> Result<()> {
    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;
    svcpanel_core::logging::init()
}

/// Main application entry point
pub async fn run(settings: Settings) -> Result<RunOutcome> {
    info!(
        "Supervising '{}' (log channel '{}', config {:?})",
        settings.service.name,
        settings.log_channel(),
        settings.source
    );

    let collaborators = system_collaborators(&settings)?;
    let result = svcpanel_tui::run(settings, collaborators).await;

    match &result {
        Ok(outcome) => info!("svcpanel exiting: {:?}", outcome),
        Err(e) => error!("Application error: {:?}", e),
    }
    result
}
