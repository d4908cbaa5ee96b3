//! Service manager contract

use svcpanel_core::{CommandOutcome, ServiceState};

/// Controls OS-managed services by name.
///
/// Commands are bounded and never raise: failures come back as
/// [`CommandOutcome::Rejected`] or [`CommandOutcome::Unknown`].
pub trait ServiceManager: Send + Sync {
    /// Whether a service with this name is installed
    fn lookup(&self, name: &str) -> bool {
        self.status(name) != ServiceState::NotInstalled
    }

    /// Current lifecycle state. Unknown services report `NotInstalled`.
    fn status(&self, name: &str) -> ServiceState;

    /// Ask the service manager to start the service
    fn start(&self, name: &str) -> CommandOutcome;

    /// Ask the service manager to stop the service
    fn stop(&self, name: &str) -> CommandOutcome;
}
