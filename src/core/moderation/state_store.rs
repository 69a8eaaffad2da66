// Process-local moderation state.
//
// `ModerationState` owns every mutable map the detectors and commands share:
// the AFK registry, warning counts and the three rate-window families. It is
// built once in main and handed to the services through `Arc`, so nothing
// here is ambient global state. None of it survives a restart.

use super::moderation_models::{AfkEntry, NUKE_WINDOW_SECS, SPAM_WINDOW_SECS};
use super::rate_window::RateWindows;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

pub struct ModerationState {
    afk: DashMap<u64, AfkEntry>,
    warnings: DashMap<u64, u32>,
    /// user_id -> recent message timestamps
    pub spam: RateWindows,
    /// guild_id -> recent channel deletions
    pub channel_deletions: RateWindows,
    /// guild_id -> recent bans
    pub bans: RateWindows,
}

impl Default for ModerationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ModerationState {
    pub fn new() -> Self {
        Self {
            afk: DashMap::new(),
            warnings: DashMap::new(),
            spam: RateWindows::new(Duration::seconds(SPAM_WINDOW_SECS)),
            channel_deletions: RateWindows::new(Duration::seconds(NUKE_WINDOW_SECS)),
            bans: RateWindows::new(Duration::seconds(NUKE_WINDOW_SECS)),
        }
    }

    // ------------------------------------------------------------------
    // AFK registry
    // ------------------------------------------------------------------

    pub fn set_afk(&self, user_id: u64, reason: impl Into<String>, now: DateTime<Utc>) {
        self.afk.insert(
            user_id,
            AfkEntry {
                user_id,
                reason: reason.into(),
                set_at: now,
            },
        );
    }

    pub fn afk_entry(&self, user_id: u64) -> Option<AfkEntry> {
        self.afk.get(&user_id).map(|e| e.clone())
    }

    /// Remove the user's AFK entry. Only the first caller gets `Some`.
    pub fn clear_afk(&self, user_id: u64) -> Option<AfkEntry> {
        self.afk.remove(&user_id).map(|(_, entry)| entry)
    }

    pub fn afk_entries(&self) -> Vec<AfkEntry> {
        let mut entries: Vec<AfkEntry> = self.afk.iter().map(|e| e.value().clone()).collect();
        entries.sort_by_key(|e| e.set_at);
        entries
    }

    // ------------------------------------------------------------------
    // Warning counts
    // ------------------------------------------------------------------

    /// Increment the user's warning count and return the new value.
    pub fn warn(&self, user_id: u64) -> u32 {
        let mut count = self.warnings.entry(user_id).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn warning_count(&self, user_id: u64) -> u32 {
        self.warnings.get(&user_id).map(|c| *c).unwrap_or(0)
    }

    /// Decrement by `amount`, never below zero. Returns `(old, new)`.
    pub fn remove_warnings(&self, user_id: u64, amount: u32) -> (u32, u32) {
        match self.warnings.get_mut(&user_id) {
            Some(mut count) => {
                let old = *count;
                *count = old.saturating_sub(amount);
                (old, *count)
            }
            None => (0, 0),
        }
    }

    /// Set the count to zero and return what it was.
    pub fn reset_warnings(&self, user_id: u64) -> u32 {
        self.warnings.insert(user_id, 0).unwrap_or(0)
    }

    /// Every user with a non-zero count, highest first.
    pub fn warned_users(&self) -> Vec<(u64, u32)> {
        let mut users: Vec<(u64, u32)> = self
            .warnings
            .iter()
            .filter(|e| *e.value() > 0)
            .map(|e| (*e.key(), *e.value()))
            .collect();
        users.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_increments_from_zero() {
        let state = ModerationState::new();
        assert_eq!(state.warning_count(1), 0);
        assert_eq!(state.warn(1), 1);
        assert_eq!(state.warn(1), 2);
        assert_eq!(state.warning_count(1), 2);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let state = ModerationState::new();
        state.warn(1);
        state.warn(1);
        state.warn(1);

        assert_eq!(state.reset_warnings(1), 3);
        assert_eq!(state.warning_count(1), 0);
        assert_eq!(state.reset_warnings(1), 0);
        assert_eq!(state.reset_warnings(42), 0);
        assert_eq!(state.warning_count(42), 0);
    }

    #[test]
    fn test_remove_warnings_saturates() {
        let state = ModerationState::new();
        state.warn(5);
        state.warn(5);

        assert_eq!(state.remove_warnings(5, 1), (2, 1));
        assert_eq!(state.remove_warnings(5, 10), (1, 0));
        assert_eq!(state.remove_warnings(6, 1), (0, 0));
    }

    #[test]
    fn test_warned_users_sorted_and_filtered() {
        let state = ModerationState::new();
        state.warn(1);
        state.warn(2);
        state.warn(2);
        state.warn(3);
        state.reset_warnings(3);

        assert_eq!(state.warned_users(), vec![(2, 2), (1, 1)]);
    }

    #[test]
    fn test_afk_overwrite_and_clear_once() {
        let state = ModerationState::new();
        let now = Utc::now();
        state.set_afk(7, "lunch", now);
        state.set_afk(7, "dinner", now);

        assert_eq!(state.afk_entry(7).unwrap().reason, "dinner");
        assert_eq!(state.clear_afk(7).unwrap().reason, "dinner");
        assert!(state.clear_afk(7).is_none());
    }
}
