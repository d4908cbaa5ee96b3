//! Unix privilege backends: uid check and sudo relaunch
//!
//! The elevated instance needs the terminal the current instance is using,
//! so the current process cannot simply exit after spawning it: the shell
//! would take the terminal back. Instead [`SudoLauncher`] keeps the child
//! and [`ProcessLauncher::terminate_current`] waits for it, then reports its
//! exit code so the current process terminates with it.

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use svcpanel_core::prelude::*;
use svcpanel_core::CommandOutcome;

use crate::privilege::{PrivilegeOracle, ProcessLauncher};

/// Elevated iff the effective uid (as reported by `id -u`) is 0
#[derive(Debug, Clone)]
pub struct UidPrivilegeOracle {
    program: String,
}

impl Default for UidPrivilegeOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl UidPrivilegeOracle {
    pub fn new() -> Self {
        Self {
            program: "id".to_string(),
        }
    }

    /// Use a different `id` binary
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

/// `id -u` output names the superuser
fn is_root_uid(stdout: &[u8]) -> bool {
    String::from_utf8_lossy(stdout).trim() == "0"
}

impl PrivilegeOracle for UidPrivilegeOracle {
    fn is_elevated(&self) -> bool {
        match Command::new(&self.program)
            .arg("-u")
            .stderr(Stdio::null())
            .output()
        {
            Ok(output) if output.status.success() => is_root_uid(&output.stdout),
            Ok(output) => {
                debug!("{} -u exited with {}", self.program, output.status);
                false
            }
            Err(e) => {
                debug!("Failed to run {} -u: {}", self.program, e);
                false
            }
        }
    }
}

/// Relaunches through `sudo`.
///
/// `sudo -v` prompts the operator; only when it succeeds is the new instance
/// spawned with `sudo -n`, so a declined prompt never starts anything.
#[derive(Debug, Default)]
pub struct SudoLauncher {
    elevated: Mutex<Option<Child>>,
}

impl SudoLauncher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProcessLauncher for SudoLauncher {
    fn launch_elevated(&self, exe: &Path, args: &[String]) -> CommandOutcome {
        match Command::new("sudo").arg("-v").status() {
            Ok(status) if status.success() => {}
            Ok(status) => {
                return CommandOutcome::rejected(format!("sudo -v exited with {status}"));
            }
            Err(e) => return CommandOutcome::unknown(format!("failed to run sudo: {e}")),
        }

        match Command::new("sudo")
            .arg("-n")
            .arg("--")
            .arg(exe)
            .args(args)
            .spawn()
        {
            Ok(child) => {
                info!("Launched elevated instance (pid {})", child.id());
                match self.elevated.lock() {
                    Ok(mut slot) => *slot = Some(child),
                    Err(poisoned) => *poisoned.into_inner() = Some(child),
                }
                CommandOutcome::Succeeded
            }
            Err(e) => CommandOutcome::unknown(format!("failed to spawn elevated instance: {e}")),
        }
    }

    fn terminate_current(&self) -> i32 {
        let child = match self.elevated.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        match child {
            Some(mut child) => match child.wait() {
                Ok(status) => status.code().unwrap_or(0),
                Err(e) => {
                    warn!("Failed waiting for elevated instance: {}", e);
                    1
                }
            },
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminate_without_launch_exits_cleanly() {
        let launcher = SudoLauncher::new();
        assert_eq!(launcher.terminate_current(), 0);
    }

    #[test]
    fn test_is_root_uid() {
        assert!(is_root_uid(b"0\n"));
        assert!(is_root_uid(b" 0 "));
        assert!(!is_root_uid(b"1000\n"));
        assert!(!is_root_uid(b"10\n"));
        assert!(!is_root_uid(b""));
    }

    #[test]
    fn test_missing_id_program_is_standard() {
        let oracle = UidPrivilegeOracle::new().with_program("/nonexistent/id");
        assert!(!oracle.is_elevated());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_id_program_is_standard() {
        let oracle = UidPrivilegeOracle::new().with_program("false");
        assert!(!oracle.is_elevated());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_numeric_output_is_standard() {
        // `echo -u` prints "-u" and succeeds
        let oracle = UidPrivilegeOracle::new().with_program("echo");
        assert!(!oracle.is_elevated());
    }
}
