//! In-memory collaborators for tests
//!
//! Enabled for this crate's tests and, through the `test-helpers` feature,
//! for the tests of downstream crates.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeZone};
use tokio::sync::mpsc;

use svcpanel_core::prelude::*;
use svcpanel_core::{CommandOutcome, EntryId, LogEntry, ServiceState, Severity};

use crate::channel::{is_cancelled, HistoryScan, LogChannel, ScanCancel, Subscription};
use crate::privilege::{PrivilegeOracle, ProcessLauncher};
use crate::service::ServiceManager;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Local instant on a fixed test day (2024-03-01)
pub fn test_time(hour: u32, minute: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 3, 1, hour, minute, 0)
        .single()
        .expect("unambiguous test time")
}

/// Log entry at `hh:mm` on the test day, identified by its time and message
pub fn test_entry(hour: u32, minute: u32, severity: Severity, message: &str) -> LogEntry {
    LogEntry::new(
        test_time(hour, minute),
        severity,
        message,
        EntryId::new(format!("{hour:02}{minute:02}-{message}")),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryLogChannel
// ─────────────────────────────────────────────────────────────────────────────

/// Log channel holding its history in memory
#[derive(Debug, Default)]
pub struct MemoryLogChannel {
    name: String,
    history: Mutex<Vec<LogEntry>>,
    subscribers: Mutex<Vec<mpsc::Sender<LogEntry>>>,
    unavailable: Mutex<Option<String>>,
    interrupt_after: Mutex<Option<usize>>,
    scans: AtomicUsize,
}

impl MemoryLogChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_history(self, entries: Vec<LogEntry>) -> Self {
        *lock(&self.history) = entries;
        self
    }

    /// Write an entry: it joins the history and is pushed to subscribers
    pub fn emit(&self, entry: LogEntry) {
        lock(&self.history).push(entry.clone());
        lock(&self.subscribers).retain(|tx| match tx.try_send(entry.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => true,
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }

    /// Write an entry to the history without notifying subscribers
    pub fn write_silently(&self, entry: LogEntry) {
        lock(&self.history).push(entry);
    }

    /// Make scans and subscriptions fail
    pub fn set_unavailable(&self, reason: impl Into<String>) {
        *lock(&self.unavailable) = Some(reason.into());
    }

    /// Make scans stop after `n` entries, reporting an interruption
    pub fn interrupt_after(&self, n: usize) {
        *lock(&self.interrupt_after) = Some(n);
    }

    /// Number of history scans that ran to the end
    pub fn scans_finished(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers)
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }
}

impl LogChannel for MemoryLogChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_history(&self, cancel: &ScanCancel) -> HistoryScan {
        if let Some(reason) = lock(&self.unavailable).clone() {
            return HistoryScan::failed(Error::channel_unavailable(&self.name, reason));
        }
        if is_cancelled(cancel) {
            return HistoryScan::failed(Error::channel_unavailable(&self.name, "scan cancelled"));
        }
        self.scans.fetch_add(1, Ordering::SeqCst);

        let history = lock(&self.history).clone();
        match *lock(&self.interrupt_after) {
            Some(n) if n < history.len() => HistoryScan::partial(
                history.into_iter().take(n).collect(),
                Error::channel_unavailable(&self.name, "scan interrupted"),
            ),
            _ => HistoryScan::complete(history),
        }
    }

    fn subscribe(&self, tx: mpsc::Sender<LogEntry>) -> Result<Subscription> {
        if let Some(reason) = lock(&self.unavailable).clone() {
            return Err(Error::channel_unavailable(&self.name, reason));
        }
        lock(&self.subscribers).push(tx);
        Ok(Subscription::detached(&self.name))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FakeServiceManager
// ─────────────────────────────────────────────────────────────────────────────

/// Service manager with in-memory services.
///
/// Mirrors a strict service control manager: starting a running service or
/// stopping a stopped one is rejected.
#[derive(Debug, Default)]
pub struct FakeServiceManager {
    services: Mutex<HashMap<String, ServiceState>>,
    access_denied: AtomicBool,
    commands: Mutex<Vec<(String, String)>>,
}

impl FakeServiceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(self, name: impl Into<String>, state: ServiceState) -> Self {
        lock(&self.services).insert(name.into(), state);
        self
    }

    pub fn set_state(&self, name: &str, state: ServiceState) {
        lock(&self.services).insert(name.to_string(), state);
    }

    pub fn deny_access(&self, denied: bool) {
        self.access_denied.store(denied, Ordering::SeqCst);
    }

    /// `(verb, service)` for every start/stop issued
    pub fn commands(&self) -> Vec<(String, String)> {
        lock(&self.commands).clone()
    }

    fn transition(
        &self,
        verb: &str,
        name: &str,
        from: ServiceState,
        to: ServiceState,
    ) -> CommandOutcome {
        lock(&self.commands).push((verb.to_string(), name.to_string()));

        if self.access_denied.load(Ordering::SeqCst) {
            return CommandOutcome::rejected("access denied");
        }

        let mut services = lock(&self.services);
        match services.get_mut(name) {
            None => CommandOutcome::rejected(format!("service {name} not installed")),
            Some(state) if *state == from => {
                *state = to;
                CommandOutcome::Succeeded
            }
            Some(state) => CommandOutcome::rejected(format!("cannot {verb} while {state}")),
        }
    }
}

impl ServiceManager for FakeServiceManager {
    fn status(&self, name: &str) -> ServiceState {
        lock(&self.services)
            .get(name)
            .copied()
            .unwrap_or(ServiceState::NotInstalled)
    }

    fn start(&self, name: &str) -> CommandOutcome {
        self.transition("start", name, ServiceState::Stopped, ServiceState::Running)
    }

    fn stop(&self, name: &str) -> CommandOutcome {
        self.transition("stop", name, ServiceState::Running, ServiceState::Stopped)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Privilege fakes
// ─────────────────────────────────────────────────────────────────────────────

/// Privilege oracle with a settable answer
#[derive(Debug, Default)]
pub struct FixedPrivilege(AtomicBool);

impl FixedPrivilege {
    pub fn new(elevated: bool) -> Self {
        Self(AtomicBool::new(elevated))
    }

    pub fn set(&self, elevated: bool) {
        self.0.store(elevated, Ordering::SeqCst);
    }
}

impl PrivilegeOracle for FixedPrivilege {
    fn is_elevated(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Launcher that records launch requests and answers with a fixed outcome
#[derive(Debug)]
pub struct RecordingLauncher {
    outcome: CommandOutcome,
    launches: Mutex<Vec<(PathBuf, Vec<String>)>>,
}

impl RecordingLauncher {
    pub fn succeeding() -> Self {
        Self::with_outcome(CommandOutcome::Succeeded)
    }

    pub fn declining() -> Self {
        Self::with_outcome(CommandOutcome::rejected("operator declined"))
    }

    pub fn with_outcome(outcome: CommandOutcome) -> Self {
        Self {
            outcome,
            launches: Mutex::new(Vec::new()),
        }
    }

    pub fn launches(&self) -> Vec<(PathBuf, Vec<String>)> {
        lock(&self.launches).clone()
    }
}

impl ProcessLauncher for RecordingLauncher {
    fn launch_elevated(&self, exe: &Path, args: &[String]) -> CommandOutcome {
        lock(&self.launches).push((exe.to_path_buf(), args.to_vec()));
        self.outcome.clone()
    }

    fn terminate_current(&self) -> i32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::watch;

    #[test]
    fn test_fake_manager_rejects_start_while_running() {
        let manager = FakeServiceManager::new().with_service("svc", ServiceState::Running);
        assert!(matches!(
            manager.start("svc"),
            CommandOutcome::Rejected { .. }
        ));
        assert_eq!(manager.status("svc"), ServiceState::Running);
        assert_eq!(manager.commands(), vec![("start".to_string(), "svc".to_string())]);
    }

    #[test]
    fn test_fake_manager_unknown_service() {
        let manager = FakeServiceManager::new();
        assert!(!manager.lookup("missing"));
        assert_eq!(manager.status("missing"), ServiceState::NotInstalled);
    }

    #[test]
    fn test_memory_channel_interrupt() {
        let channel = MemoryLogChannel::new("log").with_history(vec![
            test_entry(9, 0, Severity::Info, "a"),
            test_entry(9, 1, Severity::Info, "b"),
        ]);
        channel.interrupt_after(1);
        let (_tx, cancel) = watch::channel(false);
        let scan = channel.read_history(&cancel);
        assert_eq!(scan.entries.len(), 1);
        assert!(!scan.is_complete());
    }

    #[tokio::test]
    async fn test_memory_channel_pushes_to_subscribers() {
        let channel = MemoryLogChannel::new("log");
        let (tx, mut rx) = mpsc::channel(4);
        let _sub = channel.subscribe(tx).unwrap();

        channel.emit(test_entry(9, 0, Severity::Warning, "retry"));

        let pushed = rx.recv().await.unwrap();
        assert_eq!(pushed.message, "retry");
        let (_tx, cancel) = watch::channel(false);
        assert_eq!(channel.read_history(&cancel).entries.len(), 1);
    }

    #[test]
    fn test_memory_channel_honours_cancel() {
        let channel = MemoryLogChannel::new("log")
            .with_history(vec![test_entry(9, 0, Severity::Info, "a")]);
        let (tx, cancel) = watch::channel(false);
        tx.send(true).unwrap();

        let scan = channel.read_history(&cancel);
        assert!(scan.entries.is_empty());
        assert!(!scan.is_complete());
        assert_eq!(channel.scans_finished(), 0);
    }
}
