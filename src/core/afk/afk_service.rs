// AFK registry behaviour.
//
// When an AFK user speaks again their entry is cleared; when someone mentions
// an AFK user the reason and elapsed time are reported back.

use crate::core::moderation::{AfkEntry, ModerationState};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_AFK_REASON: &str = "AFK";

#[derive(Debug, Clone, PartialEq)]
pub struct AfkMention {
    pub entry: AfkEntry,
    pub elapsed: Duration,
}

/// Everything one message changed or revealed about AFK state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AfkMessageOutcome {
    /// Set when the author was AFK and has now been cleared.
    pub returned: Option<AfkEntry>,
    pub mentioned: Vec<AfkMention>,
}

pub struct AfkService {
    state: Arc<ModerationState>,
}

impl AfkService {
    pub fn new(state: Arc<ModerationState>) -> Self {
        Self { state }
    }

    /// Blank reasons fall back to "AFK".
    pub fn set(&self, user_id: u64, reason: Option<&str>, now: DateTime<Utc>) -> AfkEntry {
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_AFK_REASON);
        self.state.set_afk(user_id, reason, now);
        AfkEntry {
            user_id,
            reason: reason.to_string(),
            set_at: now,
        }
    }

    pub fn remove(&self, user_id: u64) -> Option<AfkEntry> {
        self.state.clear_afk(user_id)
    }

    pub fn list(&self) -> Vec<AfkEntry> {
        self.state.afk_entries()
    }

    pub fn on_message(
        &self,
        author_id: u64,
        mentioned_ids: &[u64],
        now: DateTime<Utc>,
    ) -> AfkMessageOutcome {
        let returned = self.state.clear_afk(author_id);
        AfkMessageOutcome {
            returned,
            ..self.on_mentions(author_id, mentioned_ids, now)
        }
    }

    /// Report mentioned AFK users without touching the author's own entry.
    pub fn on_mentions(
        &self,
        author_id: u64,
        mentioned_ids: &[u64],
        now: DateTime<Utc>,
    ) -> AfkMessageOutcome {
        let mut mentioned = Vec::new();
        for &user_id in mentioned_ids {
            let already_reported = mentioned
                .iter()
                .any(|m: &AfkMention| m.entry.user_id == user_id);
            if user_id == author_id || already_reported {
                continue;
            }
            if let Some(entry) = self.state.afk_entry(user_id) {
                let elapsed = now
                    .signed_duration_since(entry.set_at)
                    .to_std()
                    .unwrap_or_default();
                mentioned.push(AfkMention { entry, elapsed });
            }
        }

        AfkMessageOutcome {
            returned: None,
            mentioned,
        }
    }
}

/// "N seconds", "N minutes" or "N hours" (whole units, rounded down).
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        format!("{} seconds", secs)
    } else if secs < 3600 {
        format!("{} minutes", secs / 60)
    } else {
        format!("{} hours", secs / 3600)
    }
}

/// Short form for lists: "Ns", "Nm", "Nh".
pub fn format_elapsed_short(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else {
        format!("{}h", secs / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn service() -> AfkService {
        AfkService::new(Arc::new(ModerationState::new()))
    }

    #[test]
    fn test_mention_reports_reason_and_elapsed() {
        let service = service();
        service.set(1, Some("grabbing food"), at(0));

        let outcome = service.on_message(2, &[1], at(125));
        assert!(outcome.returned.is_none());
        assert_eq!(outcome.mentioned.len(), 1);
        assert_eq!(outcome.mentioned[0].entry.reason, "grabbing food");
        assert_eq!(outcome.mentioned[0].elapsed, Duration::from_secs(125));
        assert_eq!(format_elapsed(outcome.mentioned[0].elapsed), "2 minutes");

        // Mentioning does not clear the entry.
        assert!(service.list().iter().any(|e| e.user_id == 1));
    }

    #[test]
    fn test_own_message_clears_exactly_once() {
        let service = service();
        service.set(1, None, at(0));

        let first = service.on_message(1, &[], at(5));
        assert_eq!(first.returned.map(|e| e.reason), Some("AFK".to_string()));

        let second = service.on_message(1, &[], at(6));
        assert!(second.returned.is_none());
    }

    #[test]
    fn test_duplicate_mentions_reported_once() {
        let service = service();
        service.set(1, Some("away"), at(0));
        let outcome = service.on_message(2, &[1, 1, 3], at(1));
        assert_eq!(outcome.mentioned.len(), 1);
    }

    #[test]
    fn test_returning_user_mentioning_self_is_not_reported() {
        let service = service();
        service.set(1, Some("away"), at(0));
        let outcome = service.on_message(1, &[1], at(1));
        assert!(outcome.returned.is_some());
        assert!(outcome.mentioned.is_empty());
    }

    #[test]
    fn test_mentions_only_keeps_author_entry() {
        let service = service();
        service.set(1, Some("away"), at(0));
        service.set(2, Some("sleeping"), at(0));

        let outcome = service.on_mentions(1, &[2], at(3));
        assert!(outcome.returned.is_none());
        assert_eq!(outcome.mentioned.len(), 1);
        assert_eq!(service.list().len(), 2);
    }

    #[test]
    fn test_blank_reason_defaults() {
        let service = service();
        assert_eq!(service.set(1, Some("   "), at(0)).reason, DEFAULT_AFK_REASON);
    }

    #[test]
    fn test_elapsed_formatting() {
        assert_eq!(format_elapsed(Duration::from_secs(59)), "59 seconds");
        assert_eq!(format_elapsed(Duration::from_secs(3599)), "59 minutes");
        assert_eq!(format_elapsed(Duration::from_secs(7200)), "2 hours");
        assert_eq!(format_elapsed_short(Duration::from_secs(90)), "1m");
    }
}
