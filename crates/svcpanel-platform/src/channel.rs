//! Structured log channel contract
//!
//! A channel is identified by name and offers two sources of entries: a
//! synchronous scan of everything written so far, and a push subscription
//! delivering new entries as they are written. Push delivery may run on any
//! task; consumers receive entries through a single-consumer queue and apply
//! them on their own execution context.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use svcpanel_core::prelude::*;
use svcpanel_core::LogEntry;

/// Result of a historical scan.
///
/// A scan that is interrupted midway still returns whatever it retrieved;
/// the interruption is reported alongside instead of replacing the entries.
#[derive(Debug, Default)]
pub struct HistoryScan {
    /// Entries in channel emission order
    pub entries: Vec<LogEntry>,
    /// Set when the scan could not complete or could not start at all
    pub interrupted: Option<Error>,
}

impl HistoryScan {
    pub fn complete(entries: Vec<LogEntry>) -> Self {
        Self {
            entries,
            interrupted: None,
        }
    }

    pub fn partial(entries: Vec<LogEntry>, error: Error) -> Self {
        Self {
            entries,
            interrupted: Some(error),
        }
    }

    pub fn failed(error: Error) -> Self {
        Self::partial(Vec::new(), error)
    }

    pub fn is_complete(&self) -> bool {
        self.interrupted.is_none()
    }
}

/// Cancels a running scan when `true` is sent
pub type ScanCancel = watch::Receiver<bool>;

/// Check a scan's cancel signal; a dropped sender counts as cancelled
pub fn is_cancelled(cancel: &ScanCancel) -> bool {
    *cancel.borrow() || cancel.has_changed().is_err()
}

/// Keeps a push subscription enabled. Cancelling or dropping it disables
/// delivery as a unit.
#[derive(Debug)]
pub struct Subscription {
    channel: String,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Subscription backed by a delivery task that is aborted on cancel
    pub fn new(channel: impl Into<String>, task: JoinHandle<()>) -> Self {
        Self {
            channel: channel.into(),
            task: Some(task),
        }
    }

    /// Subscription whose delivery stops once the receiving queue is closed
    pub fn detached(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            task: None,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Unsubscribed from log channel '{}'", self.channel);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A structured log channel
pub trait LogChannel: Send + Sync {
    /// Channel name (journal unit, event log name, ...)
    fn name(&self) -> &str;

    /// Read every historical entry, ordered by emission. May block; callers
    /// run it off the UI context.
    ///
    /// Implementations stop early once `cancel` is set and return what they
    /// have with an interruption.
    fn read_history(&self, cancel: &ScanCancel) -> HistoryScan;

    /// Start delivering newly written entries into `tx`.
    ///
    /// Must be called from within a tokio runtime.
    fn subscribe(&self, tx: mpsc::Sender<LogEntry>) -> Result<Subscription>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_scan_constructors() {
        assert!(HistoryScan::complete(Vec::new()).is_complete());

        let scan = HistoryScan::failed(Error::channel_unavailable("log", "gone"));
        assert!(!scan.is_complete());
        assert!(scan.entries.is_empty());
    }

    #[test]
    fn test_is_cancelled() {
        let (tx, rx) = watch::channel(false);
        assert!(!is_cancelled(&rx));
        tx.send(true).unwrap();
        assert!(is_cancelled(&rx));

        let (tx, rx) = watch::channel(false);
        drop(tx);
        assert!(is_cancelled(&rx));
    }

    #[tokio::test]
    async fn test_subscription_cancel_aborts_task() {
        let task = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        });
        let mut sub = Subscription::new("log", task);
        sub.cancel();
        assert_eq!(sub.channel(), "log");
        // Second cancel is a no-op
        sub.cancel();
    }
}
