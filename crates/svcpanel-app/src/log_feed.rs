//! Log feed - the filtered, live-updating view of the log channel.
//!
//! Two sources feed the view:
//! - a full rebuild from a historical scan, triggered by every threshold change;
//! - entries pushed by the channel subscription, appended incrementally.
//!
//! A rebuild is identified by a generation number. Only the latest generation
//! may replace the view; results of superseded rebuilds are discarded.
//!
//! The subscription is opened before the scan, so a record written while the
//! scan runs can arrive from both sources, and its push may land before or
//! after the rebuild. While a rebuild is in flight, pushed entries that pass
//! the threshold are buffered and merged when it lands. After that, the
//! identities of the newest scanned records are kept, and a later push
//! carrying one of them is dropped.

use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Local};
use svcpanel_core::prelude::*;
use svcpanel_core::{EntryId, LogEntry, RenderedLine, TimeThreshold};
use svcpanel_platform::HistoryScan;

/// Default cap on rendered lines kept in the view
pub const DEFAULT_MAX_LINES: usize = 50_000;

/// A rebuild the event loop must run off the UI context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildRequest {
    pub generation: u64,
    pub threshold: TimeThreshold,
}

/// Timestamp and channel id: what makes two deliveries the same record
type Identity = (DateTime<Local>, EntryId);

fn identity(entry: &LogEntry) -> Identity {
    (entry.timestamp, entry.id.clone())
}

/// Result of a rebuild, computed off the UI context and swapped in whole
#[derive(Debug, Clone, Default)]
pub struct RebuiltView {
    lines: Vec<RenderedLine>,
    /// Identities parallel to `lines`, oldest first
    ids: Vec<Identity>,
    /// Why the scan came back short, if it did
    pub interrupted: Option<String>,
}

impl RebuiltView {
    /// Filter a scan by `threshold` and render it in chronological order.
    ///
    /// The scan is in emission order; the stable sort keeps emission order
    /// among entries with the same timestamp.
    pub fn build(scan: HistoryScan, threshold: TimeThreshold) -> Self {
        let mut kept: Vec<LogEntry> = scan
            .entries
            .into_iter()
            .filter(|e| threshold.admits(&e.timestamp))
            .collect();
        kept.sort_by_key(|e| e.timestamp);

        let ids = kept.iter().map(identity).collect();
        let lines = kept.iter().map(LogEntry::render).collect();

        Self {
            lines,
            ids,
            interrupted: scan.interrupted.map(|e| e.to_string()),
        }
    }

    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }
}

#[derive(Debug)]
struct PendingRebuild {
    generation: u64,
    buffered: Vec<LogEntry>,
}

/// The rendered view plus the threshold it was built for
#[derive(Debug)]
pub struct LogFeed {
    threshold: TimeThreshold,
    lines: VecDeque<RenderedLine>,
    generation: u64,
    pending: Option<PendingRebuild>,
    /// Newest scanned records not yet seen again by push
    scanned: HashSet<Identity>,
    max_lines: usize,
    /// Lines dropped by the `max_lines` cap since the last rebuild
    evicted: usize,
    degraded: Option<String>,
}

impl Default for LogFeed {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl LogFeed {
    pub fn new(max_lines: usize) -> Self {
        Self {
            threshold: TimeThreshold::Unbounded,
            lines: VecDeque::new(),
            generation: 0,
            pending: None,
            scanned: HashSet::new(),
            max_lines: max_lines.max(1),
            evicted: 0,
            degraded: None,
        }
    }

    pub fn threshold(&self) -> TimeThreshold {
        self.threshold
    }

    pub fn lines(&self) -> &VecDeque<RenderedLine> {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_rebuilding(&self) -> bool {
        self.pending.is_some()
    }

    /// Reason the channel is (partially) unavailable, for display
    pub fn degraded(&self) -> Option<&str> {
        self.degraded.as_deref()
    }

    pub fn mark_degraded(&mut self, reason: impl Into<String>) {
        self.degraded = Some(reason.into());
    }

    /// Number of oldest lines dropped by the cap since the last rebuild.
    /// Non-zero means the view no longer holds every admitted entry.
    pub fn evicted(&self) -> usize {
        self.evicted
    }

    /// Label describing the active threshold
    pub fn filter_label(&self) -> String {
        self.threshold.label()
    }

    // ─────────────────────────────────────────────────────────
    // Threshold changes (each forces a full rebuild)
    // ─────────────────────────────────────────────────────────

    /// Replace the threshold. The current view stays on screen until the
    /// returned rebuild completes and replaces it atomically.
    pub fn set_threshold(&mut self, threshold: TimeThreshold) -> RebuildRequest {
        self.generation += 1;
        self.threshold = threshold;

        if let Some(stale) = self.pending.take() {
            debug!(
                "Rebuild {} superseded by {}",
                stale.generation, self.generation
            );
        }
        self.pending = Some(PendingRebuild {
            generation: self.generation,
            buffered: Vec::new(),
        });

        RebuildRequest {
            generation: self.generation,
            threshold,
        }
    }

    /// "Clear": hide everything written up to now
    pub fn clear(&mut self) -> RebuildRequest {
        self.set_threshold(TimeThreshold::now())
    }

    /// "Show all"
    pub fn show_all(&mut self) -> RebuildRequest {
        self.set_threshold(TimeThreshold::Unbounded)
    }

    /// Move the threshold back by `delta`. No-op while unbounded.
    pub fn back_by(&mut self, delta: chrono::Duration) -> Option<RebuildRequest> {
        let threshold = self.threshold.back_by(delta)?;
        Some(self.set_threshold(threshold))
    }

    // ─────────────────────────────────────────────────────────
    // Incoming data
    // ─────────────────────────────────────────────────────────

    /// Apply a live entry. Returns true if it was appended or buffered.
    pub fn on_entry_pushed(&mut self, entry: LogEntry) -> bool {
        if !self.threshold.admits(&entry.timestamp) {
            trace!("Dropping pushed entry at or before threshold");
            return false;
        }

        if let Some(pending) = self.pending.as_mut() {
            pending.buffered.push(entry);
            return true;
        }

        // A push is delivered once, so a match can be forgotten
        if self.scanned.remove(&identity(&entry)) {
            trace!("Dropping pushed entry already shown by the last scan");
            return false;
        }

        self.push_line(entry.render());
        true
    }

    /// Swap in a finished rebuild. Returns false if it was superseded.
    pub fn complete_rebuild(&mut self, generation: u64, view: RebuiltView) -> bool {
        let pending = match self.pending.take() {
            Some(p) if p.generation == generation => p,
            other => {
                self.pending = other;
                debug!("Discarding stale rebuild {}", generation);
                return false;
            }
        };

        self.degraded = view.interrupted.clone();
        if let Some(reason) = &view.interrupted {
            warn!("Log rebuild completed with a partial scan: {}", reason);
        }

        let RebuiltView {
            lines: scanned_lines,
            ids,
            ..
        } = view;

        // Only the newest records can race the scan; older ones are never pushed
        let skip = ids.len().saturating_sub(self.max_lines);
        let mut scanned: HashSet<Identity> = ids.into_iter().skip(skip).collect();

        let mut lines: VecDeque<RenderedLine> = scanned_lines.into();
        let mut merged = 0usize;
        for entry in pending.buffered {
            if !scanned.remove(&identity(&entry)) {
                lines.push_back(entry.render());
                merged += 1;
            }
        }

        self.evicted = lines.len().saturating_sub(self.max_lines);
        lines.drain(..self.evicted);
        self.lines = lines;
        self.scanned = scanned;

        debug!(
            "Rebuild {} applied: {} lines ({} pushed during scan)",
            generation,
            self.lines.len(),
            merged
        );
        true
    }

    fn push_line(&mut self, line: RenderedLine) {
        self.lines.push_back(line);
        if self.lines.len() > self.max_lines {
            self.lines.pop_front();
            self.evicted += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use svcpanel_core::Severity;
    use svcpanel_platform::test_utils::{test_entry, test_time};

    fn texts(feed: &LogFeed) -> Vec<String> {
        feed.lines().iter().map(|l| l.to_string()).collect()
    }

    fn history() -> Vec<LogEntry> {
        vec![
            test_entry(9, 0, Severity::Info, "boot"),
            test_entry(9, 5, Severity::Error, "fail\r\n"),
        ]
    }

    fn rebuild(feed: &mut LogFeed, threshold: TimeThreshold, entries: Vec<LogEntry>) {
        let req = feed.set_threshold(threshold);
        let view = RebuiltView::build(HistoryScan::complete(entries), req.threshold);
        assert!(feed.complete_rebuild(req.generation, view));
    }

    #[test]
    fn test_rebuild_keeps_only_entries_after_threshold() {
        let mut feed = LogFeed::default();
        rebuild(&mut feed, TimeThreshold::At(test_time(9, 3)), history());
        assert_eq!(texts(&feed), vec!["2024-03-01 09:05:00.000 : ERROR : fail"]);
    }

    #[test]
    fn test_entry_exactly_at_threshold_is_excluded() {
        let mut feed = LogFeed::default();
        rebuild(&mut feed, TimeThreshold::At(test_time(9, 5)), history());
        assert!(feed.is_empty());
    }

    #[test]
    fn test_rebuild_sorts_chronologically_with_stable_ties() {
        let entries = vec![
            test_entry(9, 10, Severity::Info, "late"),
            test_entry(9, 1, Severity::Info, "first"),
            test_entry(9, 1, Severity::Warning, "second"),
        ];
        let mut feed = LogFeed::default();
        rebuild(&mut feed, TimeThreshold::Unbounded, entries);
        assert_eq!(
            texts(&feed),
            vec![
                "2024-03-01 09:01:00.000 : INFO : first",
                "2024-03-01 09:01:00.000 : WARNING : second",
                "2024-03-01 09:10:00.000 : INFO : late",
            ]
        );
    }

    #[test]
    fn test_rebuild_result_independent_of_previous_view() {
        let mut fresh = LogFeed::default();
        rebuild(&mut fresh, TimeThreshold::At(test_time(9, 3)), history());

        let mut used = LogFeed::default();
        rebuild(&mut used, TimeThreshold::Unbounded, history());
        used.on_entry_pushed(test_entry(9, 30, Severity::Info, "extra"));
        rebuild(&mut used, TimeThreshold::At(test_time(9, 3)), history());

        assert_eq!(texts(&fresh), texts(&used));
    }

    #[test]
    fn test_push_appends_when_after_threshold() {
        let mut feed = LogFeed::default();
        rebuild(&mut feed, TimeThreshold::At(test_time(9, 3)), history());

        assert!(feed.on_entry_pushed(test_entry(9, 10, Severity::Warning, "retry")));
        assert_eq!(
            texts(&feed).last().unwrap(),
            "2024-03-01 09:10:00.000 : WARNING : retry"
        );
    }

    #[test]
    fn test_push_at_or_before_threshold_never_appears() {
        let mut feed = LogFeed::default();
        rebuild(&mut feed, TimeThreshold::At(test_time(9, 3)), Vec::new());

        assert!(!feed.on_entry_pushed(test_entry(9, 3, Severity::Info, "equal")));
        assert!(!feed.on_entry_pushed(test_entry(8, 0, Severity::Info, "older")));
        assert!(feed.is_empty());
    }

    #[test]
    fn test_incremental_append_matches_full_rebuild() {
        let threshold = TimeThreshold::At(test_time(9, 3));
        let pushed = vec![
            test_entry(9, 10, Severity::Warning, "retry"),
            test_entry(9, 20, Severity::Info, "ok"),
        ];

        let mut incremental = LogFeed::default();
        rebuild(&mut incremental, threshold, history());
        for e in pushed.clone() {
            incremental.on_entry_pushed(e);
        }

        let mut all = history();
        all.extend(pushed);
        let mut full = LogFeed::default();
        rebuild(&mut full, threshold, all);

        let mut a = texts(&incremental);
        let mut b = texts(&full);
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_scenario_push_then_show_all() {
        let mut feed = LogFeed::default();
        rebuild(&mut feed, TimeThreshold::At(test_time(9, 3)), history());
        let retry = test_entry(9, 10, Severity::Warning, "retry");
        feed.on_entry_pushed(retry.clone());

        let mut all = history();
        all.push(retry);
        rebuild(&mut feed, TimeThreshold::Unbounded, all);

        assert_eq!(
            texts(&feed),
            vec![
                "2024-03-01 09:00:00.000 : INFO : boot",
                "2024-03-01 09:05:00.000 : ERROR : fail",
                "2024-03-01 09:10:00.000 : WARNING : retry",
            ]
        );
    }

    #[test]
    fn test_stale_rebuild_is_discarded() {
        let mut feed = LogFeed::default();
        let first = feed.set_threshold(TimeThreshold::Unbounded);
        let second = feed.set_threshold(TimeThreshold::At(test_time(9, 3)));

        let stale = RebuiltView::build(HistoryScan::complete(history()), first.threshold);
        assert!(!feed.complete_rebuild(first.generation, stale));
        assert!(feed.is_empty());
        assert!(feed.is_rebuilding());

        let current = RebuiltView::build(HistoryScan::complete(history()), second.threshold);
        assert!(feed.complete_rebuild(second.generation, current));
        assert_eq!(feed.len(), 1);
        assert!(!feed.is_rebuilding());
    }

    #[test]
    fn test_pushes_during_rebuild_are_deduplicated() {
        let mut feed = LogFeed::default();
        let req = feed.set_threshold(TimeThreshold::Unbounded);

        // Written before the scan snapshot, pushed after: appears in both
        let raced = test_entry(9, 7, Severity::Info, "raced");
        // Written after the snapshot: only pushed
        let fresh = test_entry(9, 8, Severity::Info, "fresh");
        feed.on_entry_pushed(raced.clone());
        feed.on_entry_pushed(fresh);

        let mut scanned = history();
        scanned.push(raced);
        let view = RebuiltView::build(HistoryScan::complete(scanned), req.threshold);
        feed.complete_rebuild(req.generation, view);

        let lines = texts(&feed);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines.iter().filter(|l| l.ends_with("raced")).count(), 1);
        assert!(lines[3].ends_with("fresh"));
    }

    #[test]
    fn test_scanned_entry_pushed_after_rebuild_is_not_duplicated() {
        let mut feed = LogFeed::default();
        let raced = test_entry(9, 7, Severity::Info, "raced");

        let mut scanned = history();
        scanned.push(raced.clone());
        rebuild(&mut feed, TimeThreshold::Unbounded, scanned);

        // Its push lands only after the rebuild was applied
        assert!(!feed.on_entry_pushed(raced.clone()));
        assert_eq!(
            texts(&feed).iter().filter(|l| l.ends_with("raced")).count(),
            1
        );

        // A genuinely new record with the same timestamp is still shown
        let sibling = test_entry(9, 7, Severity::Info, "sibling");
        assert!(feed.on_entry_pushed(sibling));
        assert_eq!(feed.len(), 4);
    }

    #[test]
    fn test_late_push_of_newest_scanned_record_is_dropped() {
        let mut feed = LogFeed::new(1);
        rebuild(&mut feed, TimeThreshold::Unbounded, history());
        assert_eq!(feed.evicted(), 1);

        // The newest scanned record is remembered even at the cap
        assert!(!feed.on_entry_pushed(test_entry(9, 5, Severity::Error, "fail\r\n")));
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.evicted(), 1);
    }

    #[test]
    fn test_partial_scan_still_replaces_view() {
        let mut feed = LogFeed::default();
        let req = feed.set_threshold(TimeThreshold::Unbounded);
        let scan = HistoryScan::partial(
            vec![test_entry(9, 0, Severity::Info, "boot")],
            Error::channel_unavailable("log", "scan interrupted"),
        );
        assert!(feed.complete_rebuild(req.generation, RebuiltView::build(scan, req.threshold)));
        assert_eq!(feed.len(), 1);
        assert!(feed.degraded().unwrap().contains("scan interrupted"));
    }

    #[test]
    fn test_back_by_is_noop_when_unbounded() {
        let mut feed = LogFeed::default();
        assert!(feed.back_by(Duration::hours(1)).is_none());
        assert_eq!(feed.threshold(), TimeThreshold::Unbounded);

        feed.set_threshold(TimeThreshold::At(test_time(9, 3)));
        let req = feed.back_by(Duration::days(1)).unwrap();
        assert_eq!(
            req.threshold,
            TimeThreshold::At(test_time(9, 3) - Duration::days(1))
        );
    }

    #[test]
    fn test_max_lines_evicts_oldest() {
        let mut feed = LogFeed::new(2);
        rebuild(&mut feed, TimeThreshold::Unbounded, Vec::new());
        feed.on_entry_pushed(test_entry(9, 0, Severity::Info, "a"));
        feed.on_entry_pushed(test_entry(9, 1, Severity::Info, "b"));
        feed.on_entry_pushed(test_entry(9, 2, Severity::Info, "c"));
        let lines = texts(&feed);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(": b"));
        assert_eq!(feed.evicted(), 1);
    }

    #[test]
    fn test_rebuild_resets_and_counts_evictions() {
        let mut feed = LogFeed::new(1);
        rebuild(&mut feed, TimeThreshold::Unbounded, history());
        assert_eq!(feed.evicted(), 1);
        assert!(texts(&feed)[0].ends_with("fail"));

        rebuild(&mut feed, TimeThreshold::At(test_time(9, 3)), history());
        assert_eq!(feed.evicted(), 0);
    }

    #[test]
    fn test_filter_label() {
        let mut feed = LogFeed::default();
        assert_eq!(feed.filter_label(), "Showing all logging");
        feed.set_threshold(TimeThreshold::At(test_time(9, 3)));
        assert_eq!(
            feed.filter_label(),
            "Showing log starting at: 2024-03-01 09:03:00.000"
        );
    }
}
