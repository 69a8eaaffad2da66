// Trailing time windows used to detect bursts of events.
//
// One `RateWindows` map backs each detector (spam per user, channel deletions
// per guild, bans per guild). Pruning runs on every append, so a window never
// holds more entries than arrived within its width.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::collections::VecDeque;

/// Ordered timestamps for a single subject.
#[derive(Debug, Clone)]
pub struct RateWindow {
    width: Duration,
    entries: VecDeque<DateTime<Utc>>,
}

impl RateWindow {
    pub fn new(width: Duration) -> Self {
        Self {
            width,
            entries: VecDeque::new(),
        }
    }

    /// Append `at` and prune relative to it. Returns the surviving count.
    pub fn record(&mut self, at: DateTime<Utc>) -> usize {
        self.entries.push_back(at);
        self.prune(at);
        self.entries.len()
    }

    /// Drop every entry with `now - t >= width`.
    ///
    /// Entries are not guaranteed to arrive in order (gateway timestamps can
    /// skew slightly), so this filters instead of popping from the front.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let width = self.width;
        self.entries.retain(|t| now.signed_duration_since(*t) < width);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A keyed family of windows sharing one width.
pub struct RateWindows {
    width: Duration,
    windows: DashMap<u64, RateWindow>,
}

impl RateWindows {
    pub fn new(width: Duration) -> Self {
        Self {
            width,
            windows: DashMap::new(),
        }
    }

    pub fn width(&self) -> Duration {
        self.width
    }

    /// Append an event for `subject_id` and return the window size after pruning.
    pub fn record_event(&self, subject_id: u64, at: DateTime<Utc>) -> usize {
        // entry() holds the shard lock for the whole append-and-prune
        self.windows
            .entry(subject_id)
            .or_insert_with(|| RateWindow::new(self.width))
            .record(at)
    }

    /// Current window size for `subject_id` as seen at `now`. A window that
    /// prunes down to nothing is dropped.
    pub fn count_recent(&self, subject_id: u64, now: DateTime<Utc>) -> usize {
        let count = match self.windows.get_mut(&subject_id) {
            Some(mut window) => {
                window.prune(now);
                window.len()
            }
            None => return 0,
        };
        if count == 0 {
            self.windows.remove_if(&subject_id, |_, window| window.is_empty());
        }
        count
    }

    pub fn clear(&self, subject_id: u64) {
        self.windows.remove(&subject_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_prune_keeps_only_trailing_width() {
        let mut window = RateWindow::new(Duration::seconds(60));
        for t in [0, 10, 30, 65] {
            window.record(at(t));
        }

        // At t=90 only 65 and 90 satisfy `now - t < 60`; 30 sits exactly on the edge.
        assert_eq!(window.record(at(90)), 2);
    }

    #[test]
    fn test_boundary_entry_is_dropped() {
        let mut window = RateWindow::new(Duration::seconds(10));
        window.record(at(0));
        window.prune(at(10));
        assert!(window.is_empty());

        window.record(at(11));
        window.prune(at(20));
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_windows_are_independent_per_subject() {
        let windows = RateWindows::new(Duration::seconds(60));
        windows.record_event(1, at(0));
        windows.record_event(1, at(1));
        windows.record_event(2, at(1));

        assert_eq!(windows.count_recent(1, at(2)), 2);
        assert_eq!(windows.count_recent(2, at(2)), 1);
        assert_eq!(windows.count_recent(3, at(2)), 0);

        windows.clear(1);
        assert_eq!(windows.count_recent(1, at(2)), 0);
        assert_eq!(windows.count_recent(2, at(2)), 1);
    }

    #[test]
    fn test_empty_windows_release_their_subject() {
        let windows = RateWindows::new(Duration::seconds(60));
        windows.record_event(1, at(0));
        windows.record_event(2, at(0));
        assert_eq!(windows.windows.len(), 2);

        windows.clear(1);
        assert!(!windows.windows.contains_key(&1));

        // Fully stale windows go away on the next count.
        assert_eq!(windows.count_recent(2, at(120)), 0);
        assert!(windows.windows.is_empty());

        // A cleared subject starts a fresh window.
        assert_eq!(windows.record_event(1, at(121)), 1);
    }

    #[test]
    fn test_count_recent_prunes_stale_entries() {
        let windows = RateWindows::new(Duration::seconds(60));
        windows.record_event(9, at(0));
        windows.record_event(9, at(30));

        assert_eq!(windows.count_recent(9, at(59)), 2);
        assert_eq!(windows.count_recent(9, at(61)), 1);
        assert_eq!(windows.count_recent(9, at(200)), 0);
    }
}
