//! journald log channel using `journalctl -o json`
//!
//! The historical scan runs `journalctl -u <unit> -o json --no-pager` and
//! parses one JSON object per line, checking its cancel signal between lines
//! and killing the child once cancelled. The push subscription follows the journal
//! with `journalctl -u <unit> -o json -f -n 0` on a tokio task; the child is
//! killed when the subscription is cancelled.

use std::io::{BufRead, BufReader};
use std::process::Stdio;

use chrono::{DateTime, Local};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader as AsyncBufReader};
use tokio::sync::mpsc;

use svcpanel_core::prelude::*;
use svcpanel_core::{EntryId, LogEntry, Severity};

use crate::channel::{is_cancelled, HistoryScan, LogChannel, ScanCancel, Subscription};

/// One line of `journalctl -o json` output (only the fields we read)
#[derive(Debug, Deserialize)]
struct JournalRecord {
    #[serde(rename = "__CURSOR")]
    cursor: String,
    #[serde(rename = "__REALTIME_TIMESTAMP")]
    realtime_timestamp: String,
    #[serde(rename = "PRIORITY", default)]
    priority: Option<String>,
    #[serde(rename = "MESSAGE", default)]
    message: Option<serde_json::Value>,
}

/// Map a syslog priority (0 = emerg .. 7 = debug) to a severity
pub fn severity_from_priority(priority: Option<&str>) -> Severity {
    match priority.and_then(|p| p.trim().parse::<u8>().ok()) {
        Some(0..=3) => Severity::Error,
        Some(4) => Severity::Warning,
        _ => Severity::Info,
    }
}

/// journald stores non-UTF-8 messages as an array of byte values
fn message_text(value: Option<serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Array(bytes)) => {
            let raw: Vec<u8> = bytes
                .iter()
                .filter_map(|b| b.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect();
            String::from_utf8_lossy(&raw).into_owned()
        }
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Parse one line of `journalctl -o json` output into a log entry
pub fn parse_journal_line(line: &str) -> Result<LogEntry> {
    let record: JournalRecord = serde_json::from_str(line)?;

    let micros: i64 = record.realtime_timestamp.parse().map_err(|_| {
        Error::channel_unavailable(
            "journal",
            format!("invalid timestamp '{}'", record.realtime_timestamp),
        )
    })?;
    let timestamp: DateTime<Local> = DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| {
            Error::channel_unavailable("journal", format!("timestamp out of range: {micros}"))
        })?
        .with_timezone(&Local);

    Ok(LogEntry::new(
        timestamp,
        severity_from_priority(record.priority.as_deref()),
        message_text(record.message),
        EntryId::new(record.cursor),
    ))
}

/// Log channel backed by the systemd journal of one unit
#[derive(Debug, Clone)]
pub struct JournalChannel {
    unit: String,
    program: String,
}

impl JournalChannel {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            program: "journalctl".to_string(),
        }
    }

    /// Use a different `journalctl` binary (e.g. an absolute path)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn history_args(&self) -> Vec<String> {
        vec![
            "-u".to_string(),
            self.unit.clone(),
            "-o".to_string(),
            "json".to_string(),
            "--no-pager".to_string(),
        ]
    }

    fn follow_args(&self) -> Vec<String> {
        let mut args = self.history_args();
        args.extend(["-f".to_string(), "-n".to_string(), "0".to_string()]);
        args
    }
}

impl LogChannel for JournalChannel {
    fn name(&self) -> &str {
        &self.unit
    }

    fn read_history(&self, cancel: &ScanCancel) -> HistoryScan {
        let mut child = match std::process::Command::new(&self.program)
            .args(self.history_args())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return HistoryScan::failed(Error::channel_unavailable(
                    &self.unit,
                    format!("failed to run {}: {}", self.program, e),
                ))
            }
        };

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            return HistoryScan::failed(Error::channel_unavailable(&self.unit, "no stdout"));
        };

        let mut entries = Vec::new();
        let mut interrupted = None;
        let mut lines = BufReader::new(stdout).lines();
        loop {
            if is_cancelled(cancel) {
                debug!("Journal scan of '{}' cancelled", self.unit);
                interrupted = Some(Error::channel_unavailable(&self.unit, "scan cancelled"));
                let _ = child.kill();
                break;
            }
            let Some(line) = lines.next() else {
                break;
            };
            match line {
                Ok(line) if line.trim().is_empty() => {}
                Ok(line) => match parse_journal_line(&line) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => trace!("Skipping unparseable journal line: {}", e),
                },
                Err(e) => {
                    interrupted = Some(Error::channel_unavailable(
                        &self.unit,
                        format!("scan interrupted: {e}"),
                    ));
                    let _ = child.kill();
                    break;
                }
            }
        }

        match child.wait() {
            Ok(status) if !status.success() && interrupted.is_none() => {
                interrupted = Some(Error::channel_unavailable(
                    &self.unit,
                    format!("{} exited with {}", self.program, status),
                ));
            }
            Err(e) if interrupted.is_none() => interrupted = Some(e.into()),
            _ => {}
        }

        debug!(
            "Journal scan of '{}' returned {} entries",
            self.unit,
            entries.len()
        );
        HistoryScan {
            entries,
            interrupted,
        }
    }

    fn subscribe(&self, tx: mpsc::Sender<LogEntry>) -> Result<Subscription> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::channel_unavailable(&self.unit, e.to_string()))?;

        let mut child = tokio::process::Command::new(&self.program)
            .args(self.follow_args())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::channel_unavailable(
                    &self.unit,
                    format!("failed to follow with {}: {}", self.program, e),
                )
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::channel_unavailable(&self.unit, "no stdout"))?;

        let unit = self.unit.clone();
        let task = runtime.spawn(async move {
            // Keep the child alive for as long as this task runs
            let _child = child;
            let mut lines = AsyncBufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) if line.trim().is_empty() => {}
                    Ok(Some(line)) => match parse_journal_line(&line) {
                        Ok(entry) => {
                            if tx.send(entry).await.is_err() {
                                debug!("Journal follower for '{}' lost its receiver", unit);
                                break;
                            }
                        }
                        Err(e) => trace!("Skipping unparseable journal line: {}", e),
                    },
                    Ok(None) => {
                        warn!("Journal follower for '{}' ended", unit);
                        break;
                    }
                    Err(e) => {
                        warn!("Journal follower for '{}' failed: {}", unit, e);
                        break;
                    }
                }
            }
        });

        info!("Subscribed to journal of '{}'", self.unit);
        Ok(Subscription::new(&self.unit, task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::time::{Duration, Instant};
    use tokio::sync::watch;

    #[test]
    fn test_severity_from_priority() {
        assert_eq!(severity_from_priority(Some("0")), Severity::Error);
        assert_eq!(severity_from_priority(Some("3")), Severity::Error);
        assert_eq!(severity_from_priority(Some("4")), Severity::Warning);
        assert_eq!(severity_from_priority(Some("5")), Severity::Info);
        assert_eq!(severity_from_priority(Some("7")), Severity::Info);
        assert_eq!(severity_from_priority(None), Severity::Info);
        assert_eq!(severity_from_priority(Some("bogus")), Severity::Info);
    }

    #[test]
    fn test_parse_journal_line() {
        let line = r#"{"__CURSOR":"s=abc;i=1","__REALTIME_TIMESTAMP":"1709283900123456","PRIORITY":"3","MESSAGE":"lease pool exhausted\n"}"#;
        let entry = parse_journal_line(line).unwrap();

        let expected = Utc
            .timestamp_millis_opt(1_709_283_900_123)
            .unwrap()
            .with_timezone(&Local);
        assert_eq!(entry.timestamp, expected);
        assert_eq!(entry.severity, Severity::Error);
        assert_eq!(entry.message, "lease pool exhausted\n");
        assert_eq!(entry.id.as_str(), "s=abc;i=1");
    }

    #[test]
    fn test_parse_journal_line_binary_message() {
        let line = r#"{"__CURSOR":"c","__REALTIME_TIMESTAMP":"1000000","MESSAGE":[104,105]}"#;
        let entry = parse_journal_line(line).unwrap();
        assert_eq!(entry.message, "hi");
        assert_eq!(entry.severity, Severity::Info);
    }

    #[test]
    fn test_parse_journal_line_rejects_garbage() {
        assert!(parse_journal_line("not json").is_err());
        assert!(parse_journal_line(r#"{"__CURSOR":"c","__REALTIME_TIMESTAMP":"x"}"#).is_err());
    }

    #[test]
    fn test_follow_args_extend_history_args() {
        let channel = JournalChannel::new("dhcpd.service");
        assert_eq!(
            channel.history_args(),
            vec!["-u", "dhcpd.service", "-o", "json", "--no-pager"]
        );
        let follow = channel.follow_args();
        assert!(follow.ends_with(&["-f".to_string(), "-n".to_string(), "0".to_string()]));
    }

    #[test]
    fn test_missing_program_degrades_to_failed_scan() {
        let channel = JournalChannel::new("x").with_program("/nonexistent/journalctl");
        let (_tx, cancel) = watch::channel(false);
        let scan = channel.read_history(&cancel);
        assert!(scan.entries.is_empty());
        assert!(matches!(
            scan.interrupted,
            Some(Error::ChannelUnavailable { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_cancelled_scan_kills_endless_reader() {
        // `yes` never ends on its own; the scan must still return
        let channel = JournalChannel::new("x").with_program("yes");
        let (tx, cancel) = watch::channel(false);
        tx.send(true).unwrap();

        let started = Instant::now();
        let scan = channel.read_history(&cancel);

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(scan.entries.is_empty());
        match scan.interrupted {
            Some(Error::ChannelUnavailable { reason, .. }) => assert_eq!(reason, "scan cancelled"),
            other => panic!("expected cancellation, got {other:?}"),
        }
    }
}
