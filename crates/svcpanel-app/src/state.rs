//! Application state (Model in TEA pattern)

use svcpanel_core::{ControlEnablement, PrivilegeLevel, ServiceState};

use crate::config::Settings;
use crate::log_feed::LogFeed;
use crate::log_view_state::LogViewState;
use crate::privilege_gate::PrivilegeGate;
use crate::supervisor::ServiceSupervisor;

/// Current UI mode/screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    /// Log view with the control bar
    #[default]
    Normal,

    /// "Service has not been installed yet, install?" dialog
    InstallPrompt,

    /// Read-only settings panel
    Configure,
}

/// Why the event loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Operator quit or a termination signal arrived
    Quit,
    /// An elevated instance was launched and takes over
    Elevated,
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    pub ui_mode: UiMode,

    pub settings: Settings,

    pub log_feed: LogFeed,

    pub log_view_state: LogViewState,

    pub supervisor: ServiceSupervisor,

    pub gate: PrivilegeGate,

    /// A status poll is running; further ticks are skipped until it reports
    pub poll_in_flight: bool,

    /// Number of the latest status poll; results of older polls are dropped
    pub poll_seq: u64,

    /// An elevation request is waiting for the front end to suspend the UI
    pub elevation_requested: bool,

    /// Set once the event loop should stop
    pub exit: Option<ExitReason>,
}

impl AppState {
    pub fn new(settings: Settings, supervisor: ServiceSupervisor, gate: PrivilegeGate) -> Self {
        Self {
            ui_mode: UiMode::Normal,
            log_feed: LogFeed::new(settings.ui.max_lines),
            settings,
            log_view_state: LogViewState::new(),
            supervisor,
            gate,
            poll_in_flight: false,
            poll_seq: 0,
            elevation_requested: false,
            exit: None,
        }
    }

    pub fn service_state(&self) -> ServiceState {
        self.supervisor.state()
    }

    pub fn privilege_level(&self) -> PrivilegeLevel {
        self.gate.level()
    }

    /// Derived from the last polled state and level; never stored
    pub fn enablement(&self) -> ControlEnablement {
        self.gate.enablement(self.supervisor.state())
    }

    pub fn should_quit(&self) -> bool {
        self.exit.is_some()
    }

    pub fn request_quit(&mut self, reason: ExitReason) {
        if self.exit.is_none() {
            self.exit = Some(reason);
        }
    }
}
