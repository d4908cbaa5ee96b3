//! Privilege gate - privilege level, control enablement and elevation

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use svcpanel_core::prelude::*;
use svcpanel_core::{CommandOutcome, ControlEnablement, PrivilegeLevel, ServiceState};
use svcpanel_platform::{PrivilegeOracle, ProcessLauncher};

/// Executable and arguments the elevated instance is started with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relaunch {
    pub exe: PathBuf,
    pub args: Vec<String>,
}

impl Relaunch {
    pub fn new(exe: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            exe: exe.into(),
            args,
        }
    }

    /// The running executable with the arguments it was started with
    pub fn current() -> Result<Self> {
        let exe = std::env::current_exe()?;
        Ok(Self::new(exe, std::env::args().skip(1).collect()))
    }
}

/// Privilege level of this process plus the means to elevate it
#[derive(Clone)]
pub struct PrivilegeGate {
    oracle: Arc<dyn PrivilegeOracle>,
    launcher: Arc<dyn ProcessLauncher>,
    level: PrivilegeLevel,
}

impl fmt::Debug for PrivilegeGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivilegeGate")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl PrivilegeGate {
    /// Create the gate and evaluate the level once
    pub fn new(oracle: Arc<dyn PrivilegeOracle>, launcher: Arc<dyn ProcessLauncher>) -> Self {
        let level = PrivilegeLevel::from_elevated(oracle.is_elevated());
        debug!("Initial privilege level: {:?}", level);
        Self {
            oracle,
            launcher,
            level,
        }
    }

    /// Query the OS. Not cached; every call is a fresh evaluation.
    pub fn current_level(&self) -> PrivilegeLevel {
        PrivilegeLevel::from_elevated(self.oracle.is_elevated())
    }

    /// Level from the most recent evaluation
    pub fn level(&self) -> PrivilegeLevel {
        self.level
    }

    pub fn apply_level(&mut self, level: PrivilegeLevel) {
        if self.level != level {
            info!("Privilege level changed to {:?}", level);
            self.level = level;
        }
    }

    pub fn compute_enablement(state: ServiceState, level: PrivilegeLevel) -> ControlEnablement {
        ControlEnablement::compute(state, level)
    }

    /// Enablement for `state` at the last evaluated level
    pub fn enablement(&self, state: ServiceState) -> ControlEnablement {
        Self::compute_enablement(state, self.level)
    }

    /// Ask the OS to start an elevated instance of `exe`.
    ///
    /// Returns `Succeeded` only when the launch was confirmed; the caller then
    /// shuts down and terminates through [`PrivilegeGate::terminate_current`].
    /// A declined prompt or a failed launch is logged and changes nothing.
    pub fn elevate_and_restart(&self, exe: &Path, args: &[String]) -> CommandOutcome {
        info!("Requesting elevated relaunch of {:?}", exe);
        let outcome = self.launcher.launch_elevated(exe, args);
        if let Some(reason) = outcome.reason() {
            warn!("{}", Error::elevation(reason));
        }
        outcome
    }

    /// Exit code this process terminates with after a confirmed elevation
    pub fn terminate_current(&self) -> i32 {
        self.launcher.terminate_current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use svcpanel_platform::test_utils::{FixedPrivilege, RecordingLauncher};

    mock! {
        pub Oracle {}
        impl PrivilegeOracle for Oracle {
            fn is_elevated(&self) -> bool;
        }
    }

    fn make_gate(elevated: bool, launcher: RecordingLauncher) -> (PrivilegeGate, Arc<RecordingLauncher>) {
        let launcher = Arc::new(launcher);
        let gate = PrivilegeGate::new(Arc::new(FixedPrivilege::new(elevated)), launcher.clone());
        (gate, launcher)
    }

    #[test]
    fn test_current_level_is_not_cached() {
        let mut oracle = MockOracle::new();
        let mut answers = vec![false, true, false].into_iter();
        oracle
            .expect_is_elevated()
            .times(3)
            .returning(move || answers.next().unwrap_or(false));

        let gate = PrivilegeGate::new(Arc::new(oracle), Arc::new(RecordingLauncher::succeeding()));
        assert_eq!(gate.level(), PrivilegeLevel::Standard);
        assert_eq!(gate.current_level(), PrivilegeLevel::Elevated);
        assert_eq!(gate.current_level(), PrivilegeLevel::Standard);
        assert_eq!(gate.level(), PrivilegeLevel::Standard);
    }

    #[test]
    fn test_enablement_follows_applied_level() {
        let (mut gate, _) = make_gate(false, RecordingLauncher::succeeding());

        let standard = gate.enablement(ServiceState::Stopped);
        assert!(standard.elevate);
        assert!(!standard.start && !standard.stop && !standard.configure);

        gate.apply_level(PrivilegeLevel::Elevated);
        let elevated = gate.enablement(ServiceState::Stopped);
        assert!(elevated.start && elevated.configure);
        assert!(!elevated.stop && !elevated.elevate);
    }

    #[test]
    fn test_elevate_passes_exe_and_args() {
        let (gate, launcher) = make_gate(false, RecordingLauncher::succeeding());
        let outcome = gate.elevate_and_restart(Path::new("/usr/bin/svcpanel"), &["-s".to_string()]);

        assert!(outcome.is_success());
        assert_eq!(
            launcher.launches(),
            vec![(PathBuf::from("/usr/bin/svcpanel"), vec!["-s".to_string()])]
        );
    }

    #[test]
    fn test_declined_elevation_keeps_level() {
        let (gate, _) = make_gate(false, RecordingLauncher::declining());
        let outcome = gate.elevate_and_restart(Path::new("/usr/bin/svcpanel"), &[]);

        assert!(matches!(outcome, CommandOutcome::Rejected { .. }));
        assert_eq!(gate.level(), PrivilegeLevel::Standard);
    }

    #[test]
    fn test_relaunch_current() {
        let relaunch = Relaunch::current().unwrap();
        assert!(relaunch.exe.is_absolute());
    }
}
