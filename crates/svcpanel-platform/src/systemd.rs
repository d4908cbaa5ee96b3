//! systemd service manager using `systemctl`
//!
//! Status comes from `systemctl show <unit> -p LoadState -p ActiveState -p SubState`.
//! Start/stop are queued with `--no-block` so a slow unit never holds the
//! caller; the transitional state shows up on the next status poll.

use std::process::{Command, Stdio};

use svcpanel_core::prelude::*;
use svcpanel_core::{CommandOutcome, ServiceState};

use crate::service::ServiceManager;

/// Map `systemctl show` key=value output to a service state
pub fn parse_show_output(output: &str) -> ServiceState {
    let mut load_state = None;
    let mut active_state = None;
    let mut sub_state = None;

    for line in output.lines() {
        if let Some((key, value)) = line.split_once('=') {
            match key.trim() {
                "LoadState" => load_state = Some(value.trim()),
                "ActiveState" => active_state = Some(value.trim()),
                "SubState" => sub_state = Some(value.trim()),
                _ => {}
            }
        }
    }

    if matches!(load_state, Some("not-found") | None) {
        return ServiceState::NotInstalled;
    }

    match (active_state, sub_state) {
        (Some("active"), Some("running" | "exited")) => ServiceState::Running,
        (Some("active" | "reloading"), _) => ServiceState::Running,
        (Some("activating"), _) => ServiceState::StartPending,
        (Some("deactivating"), _) => ServiceState::StopPending,
        (Some("inactive" | "failed"), _) => ServiceState::Stopped,
        _ => ServiceState::Other,
    }
}

/// Service manager backed by `systemctl`
#[derive(Debug, Clone)]
pub struct SystemdManager {
    program: String,
}

impl Default for SystemdManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemdManager {
    pub fn new() -> Self {
        Self {
            program: "systemctl".to_string(),
        }
    }

    /// Use a different `systemctl` binary (e.g. an absolute path)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn run_command(&self, verb: &str, name: &str) -> CommandOutcome {
        let output = Command::new(&self.program)
            .args([verb, "--no-block", name])
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) if output.status.success() => {
                debug!("systemctl {} {} accepted", verb, name);
                CommandOutcome::Succeeded
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                CommandOutcome::rejected(if stderr.is_empty() {
                    format!("systemctl {verb} exited with {}", output.status)
                } else {
                    stderr
                })
            }
            Err(e) => CommandOutcome::unknown(format!("failed to run {}: {}", self.program, e)),
        }
    }
}

impl ServiceManager for SystemdManager {
    fn status(&self, name: &str) -> ServiceState {
        let output = Command::new(&self.program)
            .args(["show", name, "-p", "LoadState", "-p", "ActiveState", "-p", "SubState"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(output) if output.status.success() => {
                parse_show_output(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                debug!("systemctl show {} exited with {}", name, output.status);
                ServiceState::NotInstalled
            }
            Err(e) => {
                warn!("Failed to query status of {}: {}", name, e);
                ServiceState::Other
            }
        }
    }

    fn start(&self, name: &str) -> CommandOutcome {
        self.run_command("start", name)
    }

    fn stop(&self, name: &str) -> CommandOutcome {
        self.run_command("stop", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(load: &str, active: &str, sub: &str) -> String {
        format!("LoadState={load}\nActiveState={active}\nSubState={sub}\n")
    }

    #[test]
    fn test_parse_running() {
        assert_eq!(
            parse_show_output(&show("loaded", "active", "running")),
            ServiceState::Running
        );
    }

    #[test]
    fn test_parse_stopped_and_failed() {
        assert_eq!(
            parse_show_output(&show("loaded", "inactive", "dead")),
            ServiceState::Stopped
        );
        assert_eq!(
            parse_show_output(&show("loaded", "failed", "failed")),
            ServiceState::Stopped
        );
    }

    #[test]
    fn test_parse_transitions() {
        assert_eq!(
            parse_show_output(&show("loaded", "activating", "start")),
            ServiceState::StartPending
        );
        assert_eq!(
            parse_show_output(&show("loaded", "deactivating", "stop-sigterm")),
            ServiceState::StopPending
        );
    }

    #[test]
    fn test_parse_not_found() {
        assert_eq!(
            parse_show_output(&show("not-found", "inactive", "dead")),
            ServiceState::NotInstalled
        );
        assert_eq!(parse_show_output(""), ServiceState::NotInstalled);
    }

    #[test]
    fn test_parse_unknown_active_state() {
        assert_eq!(
            parse_show_output(&show("loaded", "maintenance", "x")),
            ServiceState::Other
        );
    }

    #[test]
    fn test_missing_program_is_unknown_outcome() {
        let manager = SystemdManager::new().with_program("/nonexistent/systemctl");
        assert!(matches!(
            manager.start("svc"),
            CommandOutcome::Unknown { .. }
        ));
        assert_eq!(manager.status("svc"), ServiceState::Other);
    }
}
