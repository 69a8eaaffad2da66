// Anti-nuke burst detection.
//
// Two per-guild windows: channel deletions and bans. Crossing a threshold
// produces a `NukeAlert`; the Discord layer posts it. Nothing here locks the
// guild down - alerting only.

use crate::core::moderation::ModerationState;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// More than this many channel deletions per window triggers an alert.
pub const CHANNEL_DELETION_THRESHOLD: usize = 3;
/// More than this many bans per window triggers an alert.
pub const BAN_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NukeKind {
    MassChannelDeletion,
    MassBan,
}

impl fmt::Display for NukeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NukeKind::MassChannelDeletion => write!(f, "Mass channel deletion detected"),
            NukeKind::MassBan => write!(f, "Mass ban detected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NukeAlert {
    pub guild_id: u64,
    pub kind: NukeKind,
    /// Events inside the window when the alert fired.
    pub recent_events: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NukeStatus {
    pub enabled: bool,
    pub recent_deletions: usize,
    pub recent_bans: usize,
}

pub struct AntiNukeService {
    state: Arc<ModerationState>,
    enabled: AtomicBool,
}

impl AntiNukeService {
    pub fn new(state: Arc<ModerationState>) -> Self {
        Self {
            state,
            enabled: AtomicBool::new(true),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn record_channel_deletion(&self, guild_id: u64, at: DateTime<Utc>) -> Option<NukeAlert> {
        if !self.is_enabled() {
            return None;
        }
        let count = self.state.channel_deletions.record_event(guild_id, at);
        (count > CHANNEL_DELETION_THRESHOLD).then_some(NukeAlert {
            guild_id,
            kind: NukeKind::MassChannelDeletion,
            recent_events: count,
        })
    }

    pub fn record_ban(&self, guild_id: u64, at: DateTime<Utc>) -> Option<NukeAlert> {
        if !self.is_enabled() {
            return None;
        }
        let count = self.state.bans.record_event(guild_id, at);
        (count > BAN_THRESHOLD).then_some(NukeAlert {
            guild_id,
            kind: NukeKind::MassBan,
            recent_events: count,
        })
    }

    pub fn status(&self, guild_id: u64, now: DateTime<Utc>) -> NukeStatus {
        NukeStatus {
            enabled: self.is_enabled(),
            recent_deletions: self.state.channel_deletions.count_recent(guild_id, now),
            recent_bans: self.state.bans.count_recent(guild_id, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn service() -> AntiNukeService {
        AntiNukeService::new(Arc::new(ModerationState::new()))
    }

    #[test]
    fn test_fourth_deletion_alerts() {
        let service = service();
        for i in 0..3 {
            assert_eq!(service.record_channel_deletion(10, at(i)), None);
        }
        let alert = service.record_channel_deletion(10, at(3)).unwrap();
        assert_eq!(alert.kind, NukeKind::MassChannelDeletion);
        assert_eq!(alert.recent_events, 4);

        // Other guilds are unaffected.
        assert_eq!(service.record_channel_deletion(11, at(3)), None);
    }

    #[test]
    fn test_deletions_outside_window_do_not_count() {
        let service = service();
        for i in 0..3 {
            service.record_channel_deletion(10, at(i * 30));
        }
        // By t=90 only the deletion at t=60 is still inside the window.
        assert_eq!(service.record_channel_deletion(10, at(90)), None);
    }

    #[test]
    fn test_sixth_ban_alerts() {
        let service = service();
        for i in 0..5 {
            assert_eq!(service.record_ban(10, at(i)), None);
        }
        let alert = service.record_ban(10, at(5)).unwrap();
        assert_eq!(alert.kind, NukeKind::MassBan);
        assert_eq!(alert.kind.to_string(), "Mass ban detected");
    }

    #[test]
    fn test_disabled_records_nothing() {
        let service = service();
        service.set_enabled(false);
        for i in 0..10 {
            assert_eq!(service.record_ban(10, at(i)), None);
        }
        let status = service.status(10, at(10));
        assert!(!status.enabled);
        assert_eq!(status.recent_bans, 0);
    }

    #[test]
    fn test_status_counts_recent_activity() {
        let service = service();
        service.record_ban(10, at(0));
        service.record_channel_deletion(10, at(1));
        service.record_channel_deletion(10, at(2));

        let status = service.status(10, at(30));
        assert_eq!(
            status,
            NukeStatus {
                enabled: true,
                recent_deletions: 2,
                recent_bans: 1,
            }
        );
    }
}
