//! # svcpanel-platform - OS Collaborators
//!
//! Narrow interfaces to the operating system facilities the control panel
//! consumes, plus their Linux backends.
//!
//! Depends on [`svcpanel_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Structured log channel
//! - [`LogChannel`] - Historical scan plus push subscription
//! - [`HistoryScan`] - Entries retrieved by a scan, with an optional interruption
//! - [`Subscription`] - Handle that keeps a push subscription alive
//! - [`JournalChannel`] - `journalctl` backed channel
//!
//! ### Service manager
//! - [`ServiceManager`] - Lookup, status, start and stop by service name
//! - [`SystemdManager`] - `systemctl` backed manager
//!
//! ### Privilege
//! - [`PrivilegeOracle`] - "Is this process elevated?"
//! - [`ProcessLauncher`] - Relaunch elevated and terminate the current process
//! - [`UidPrivilegeOracle`], [`SudoLauncher`] - Unix backends

pub mod channel;
pub mod elevation;
pub mod journal;
pub mod privilege;
pub mod service;
pub mod systemd;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use channel::{is_cancelled, HistoryScan, LogChannel, ScanCancel, Subscription};
pub use elevation::{SudoLauncher, UidPrivilegeOracle};
pub use journal::{parse_journal_line, severity_from_priority, JournalChannel};
pub use privilege::{PrivilegeOracle, ProcessLauncher};
pub use service::ServiceManager;
pub use systemd::{parse_show_output, SystemdManager};
