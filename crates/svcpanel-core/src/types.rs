//! Core domain types: log records, time threshold, service and privilege state

use std::fmt;

use chrono::{DateTime, Local, SubsecRound};
use serde::{Deserialize, Serialize};

/// Display format for timestamps in rendered lines and the filter label
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Format an instant as `yyyy-MM-dd HH:mm:ss.fff`
pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Log records
// ─────────────────────────────────────────────────────────────────────────────

/// Log severity as reported by the structured log channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Upper-case label used in rendered lines
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

/// Opaque identity the log channel assigns to a record (journal cursor,
/// event log record number, ...). Only used for de-duplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single record produced by the log channel. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    pub message: String,
    pub id: EntryId,
}

impl LogEntry {
    /// Create a log entry. The timestamp is truncated to millisecond precision.
    pub fn new(
        timestamp: DateTime<Local>,
        severity: Severity,
        message: impl Into<String>,
        id: EntryId,
    ) -> Self {
        Self {
            timestamp: timestamp.trunc_subsecs(3),
            severity,
            message: message.into(),
            id,
        }
    }

    /// Project this entry onto its display line
    pub fn render(&self) -> RenderedLine {
        RenderedLine::from_entry(self)
    }

    /// Identity used to detect the same record arriving from two sources
    pub fn identity(&self) -> (DateTime<Local>, &EntryId) {
        (self.timestamp, &self.id)
    }
}

/// Display-only projection of a [`LogEntry`]:
/// `"<yyyy-MM-dd HH:mm:ss.fff> : <SEVERITY> : <message>"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    text: String,
    severity: Severity,
}

impl RenderedLine {
    pub fn from_entry(entry: &LogEntry) -> Self {
        let message = entry.message.trim_end_matches(['\r', '\n', '\'']);
        Self {
            text: format!(
                "{} : {} : {}",
                format_timestamp(&entry.timestamp),
                entry.severity.label(),
                message
            ),
            severity: entry.severity,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Severity of the source entry, kept for colouring
    pub fn severity(&self) -> Severity {
        self.severity
    }
}

impl fmt::Display for RenderedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Time threshold
// ─────────────────────────────────────────────────────────────────────────────

/// The instant below which log entries are hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeThreshold {
    /// Show everything
    Unbounded,
    /// Show only entries strictly after this instant
    At(DateTime<Local>),
}

impl TimeThreshold {
    /// Threshold at the current instant ("clear")
    pub fn now() -> Self {
        Self::At(Local::now().trunc_subsecs(3))
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, TimeThreshold::Unbounded)
    }

    /// Entries exactly at the threshold are excluded
    pub fn admits(&self, timestamp: &DateTime<Local>) -> bool {
        match self {
            TimeThreshold::Unbounded => true,
            TimeThreshold::At(t) => timestamp > t,
        }
    }

    /// Move a concrete threshold back in time. `None` when unbounded.
    pub fn back_by(&self, delta: chrono::Duration) -> Option<Self> {
        match self {
            TimeThreshold::Unbounded => None,
            TimeThreshold::At(t) => Some(TimeThreshold::At(*t - delta)),
        }
    }

    /// Label shown above the log view
    pub fn label(&self) -> String {
        match self {
            TimeThreshold::Unbounded => "Showing all logging".to_string(),
            TimeThreshold::At(t) => {
                format!("Showing log starting at: {}", format_timestamp(t))
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Service and privilege state
// ─────────────────────────────────────────────────────────────────────────────

/// OS service lifecycle state, refreshed by polling only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServiceState {
    #[default]
    NotInstalled,
    Stopped,
    StartPending,
    Running,
    StopPending,
    Other,
}

impl ServiceState {
    pub const ALL: [ServiceState; 6] = [
        ServiceState::NotInstalled,
        ServiceState::Stopped,
        ServiceState::StartPending,
        ServiceState::Running,
        ServiceState::StopPending,
        ServiceState::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceState::NotInstalled => "NotInstalled",
            ServiceState::Stopped => "Stopped",
            ServiceState::StartPending => "StartPending",
            ServiceState::Running => "Running",
            ServiceState::StopPending => "StopPending",
            ServiceState::Other => "Other",
        }
    }

    pub fn is_transitional(&self) -> bool {
        matches!(self, ServiceState::StartPending | ServiceState::StopPending)
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether the running process holds administrative rights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrivilegeLevel {
    #[default]
    Standard,
    Elevated,
}

impl PrivilegeLevel {
    pub fn from_elevated(elevated: bool) -> Self {
        if elevated {
            PrivilegeLevel::Elevated
        } else {
            PrivilegeLevel::Standard
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self, PrivilegeLevel::Elevated)
    }
}

/// Derived on/off state of each operator-facing control. Never stored on its
/// own; always recomputed from the current state and privilege level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlEnablement {
    pub start: bool,
    pub stop: bool,
    pub configure: bool,
    pub elevate: bool,
}

impl ControlEnablement {
    pub fn compute(state: ServiceState, level: PrivilegeLevel) -> Self {
        let elevated = level.is_elevated();
        Self {
            start: elevated && state == ServiceState::Stopped,
            stop: elevated && state == ServiceState::Running,
            configure: elevated,
            elevate: !elevated,
        }
    }
}

/// Outcome of a fire-and-forget OS command (start, stop, elevated launch).
///
/// The control panel maps every variant to "no visible change"; the
/// distinction exists so suppression can be logged and asserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Succeeded,
    /// The OS refused the command (already running, access denied, declined prompt)
    Rejected { reason: String },
    /// The command could not be issued or its result is unknown (timeout, spawn failure)
    Unknown { reason: String },
}

impl CommandOutcome {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::Unknown {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Succeeded)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            CommandOutcome::Succeeded => None,
            CommandOutcome::Rejected { reason } | CommandOutcome::Unknown { reason } => {
                Some(reason)
            }
        }
    }
}
