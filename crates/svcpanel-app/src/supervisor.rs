//! Service supervisor - polls and commands one named service
//!
//! The supervisor keeps the last observed [`ServiceState`]. Queries and
//! commands go through a cloneable [`ServiceHandle`] so the event loop can
//! run them on blocking tasks; results come back as messages and are applied
//! with [`ServiceSupervisor::apply_status`].

use std::fmt;
use std::sync::Arc;

use svcpanel_core::prelude::*;
use svcpanel_core::{CommandOutcome, ServiceState};
use svcpanel_platform::ServiceManager;

/// Start or stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceCommand {
    Start,
    Stop,
}

impl ServiceCommand {
    pub fn verb(&self) -> &'static str {
        match self {
            ServiceCommand::Start => "start",
            ServiceCommand::Stop => "stop",
        }
    }
}

/// Cloneable access to one service through a service manager
#[derive(Clone)]
pub struct ServiceHandle {
    manager: Arc<dyn ServiceManager>,
    name: Arc<str>,
}

impl fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ServiceHandle {
    pub fn new(manager: Arc<dyn ServiceManager>, name: &str) -> Self {
        Self {
            manager,
            name: Arc::from(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn query(&self) -> ServiceState {
        self.manager.status(&self.name)
    }

    /// Issue a command. The outcome is logged here; callers only refresh.
    pub fn run(&self, command: ServiceCommand) -> CommandOutcome {
        let outcome = match command {
            ServiceCommand::Start => self.manager.start(&self.name),
            ServiceCommand::Stop => self.manager.stop(&self.name),
        };

        match &outcome {
            CommandOutcome::Succeeded => {
                info!("{} {} requested", command.verb(), self.name);
            }
            CommandOutcome::Rejected { reason } => {
                warn!(
                    "{}",
                    Error::command_failed(format!("{} {}", command.verb(), self.name), reason)
                );
            }
            CommandOutcome::Unknown { reason } => {
                warn!(
                    "{} {} outcome unknown: {}",
                    command.verb(),
                    self.name,
                    reason
                );
            }
        }
        outcome
    }

    pub fn start(&self) -> CommandOutcome {
        self.run(ServiceCommand::Start)
    }

    pub fn stop(&self) -> CommandOutcome {
        self.run(ServiceCommand::Stop)
    }
}

/// Last observed state of the supervised service
#[derive(Debug, Clone)]
pub struct ServiceSupervisor {
    handle: ServiceHandle,
    state: ServiceState,
}

impl ServiceSupervisor {
    /// Look the service up by name.
    ///
    /// Fails with [`Error::ServiceNotFound`] when the service manager does
    /// not know it; use [`ServiceSupervisor::not_installed`] to keep polling.
    pub fn locate(manager: Arc<dyn ServiceManager>, name: &str) -> Result<Self> {
        if !manager.lookup(name) {
            return Err(Error::service_not_found(name));
        }
        let handle = ServiceHandle::new(manager, name);
        let state = handle.query();
        info!("Supervising service '{}' ({})", name, state);
        Ok(Self { handle, state })
    }

    /// Supervisor for a service that is not installed (yet)
    pub fn not_installed(manager: Arc<dyn ServiceManager>, name: &str) -> Self {
        Self {
            handle: ServiceHandle::new(manager, name),
            state: ServiceState::NotInstalled,
        }
    }

    pub fn handle(&self) -> ServiceHandle {
        self.handle.clone()
    }

    pub fn name(&self) -> &str {
        self.handle.name()
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    /// Re-read the state synchronously
    pub fn refresh(&mut self) -> ServiceState {
        let state = self.handle.query();
        self.apply_status(state);
        state
    }

    /// Record a polled state. Returns true if it changed.
    pub fn apply_status(&mut self, state: ServiceState) -> bool {
        if self.state == state {
            return false;
        }
        debug!(
            "Service '{}' state {} -> {}",
            self.handle.name(),
            self.state,
            state
        );
        self.state = state;
        true
    }

    pub fn status_label(&self) -> String {
        format!("Service status: {}", self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use svcpanel_platform::test_utils::FakeServiceManager;

    mock! {
        pub Services {}
        impl ServiceManager for Services {
            fn status(&self, name: &str) -> ServiceState;
            fn start(&self, name: &str) -> CommandOutcome;
            fn stop(&self, name: &str) -> CommandOutcome;
        }
    }

    #[test]
    fn test_locate_missing_service() {
        let mut services = MockServices::new();
        services
            .expect_status()
            .times(1)
            .return_const(ServiceState::NotInstalled);

        let err = ServiceSupervisor::locate(Arc::new(services), "dhcpd").unwrap_err();
        assert!(matches!(err, Error::ServiceNotFound { ref name } if name == "dhcpd"));
    }

    #[test]
    fn test_locate_reads_initial_state() {
        let manager = FakeServiceManager::new().with_service("dhcpd", ServiceState::Stopped);
        let supervisor = ServiceSupervisor::locate(Arc::new(manager), "dhcpd").unwrap();
        assert_eq!(supervisor.state(), ServiceState::Stopped);
        assert_eq!(supervisor.status_label(), "Service status: Stopped");
    }

    #[test]
    fn test_start_while_running_is_rejected_and_state_unchanged() {
        let manager =
            Arc::new(FakeServiceManager::new().with_service("dhcpd", ServiceState::Running));
        let mut supervisor = ServiceSupervisor::locate(manager.clone(), "dhcpd").unwrap();

        let outcome = supervisor.handle().start();
        assert!(matches!(outcome, CommandOutcome::Rejected { .. }));

        assert_eq!(supervisor.refresh(), ServiceState::Running);
        assert_eq!(manager.commands().len(), 1);
    }

    #[test]
    fn test_unknown_outcome_is_suppressed() {
        let mut services = MockServices::new();
        services.expect_status().return_const(ServiceState::Stopped);
        services
            .expect_start()
            .times(1)
            .returning(|_| CommandOutcome::unknown("timed out"));

        let supervisor = ServiceSupervisor::locate(Arc::new(services), "dhcpd").unwrap();
        let outcome = supervisor.handle().run(ServiceCommand::Start);
        assert_eq!(outcome.reason(), Some("timed out"));
    }

    #[test]
    fn test_not_installed_picks_up_late_install() {
        let manager = Arc::new(FakeServiceManager::new());
        let mut supervisor = ServiceSupervisor::not_installed(manager.clone(), "dhcpd");
        assert_eq!(supervisor.state(), ServiceState::NotInstalled);

        manager.set_state("dhcpd", ServiceState::Stopped);
        assert_eq!(supervisor.refresh(), ServiceState::Stopped);
    }

    #[test]
    fn test_apply_status_reports_change() {
        let manager = Arc::new(FakeServiceManager::new());
        let mut supervisor = ServiceSupervisor::not_installed(manager, "dhcpd");
        assert!(supervisor.apply_status(ServiceState::StartPending));
        assert!(!supervisor.apply_status(ServiceState::StartPending));
        assert_eq!(supervisor.status_label(), "Service status: StartPending");
    }
}
