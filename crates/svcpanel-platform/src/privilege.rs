//! Identity/privilege oracle and process launcher contracts

use std::path::Path;

use svcpanel_core::CommandOutcome;

/// Answers whether the current process runs with administrative rights
pub trait PrivilegeOracle: Send + Sync {
    fn is_elevated(&self) -> bool;
}

/// Starts elevated instances of an executable
pub trait ProcessLauncher: Send + Sync {
    /// Start a new instance of `exe` with an elevation request.
    ///
    /// Returns [`CommandOutcome::Succeeded`] only once the OS has confirmed the
    /// new process was launched. A declined prompt is `Rejected`.
    fn launch_elevated(&self, exe: &Path, args: &[String]) -> CommandOutcome;

    /// Hand over to the launched instance and return the exit code the
    /// current process must terminate with. Called after the UI has shut down.
    fn terminate_current(&self) -> i32;
}
