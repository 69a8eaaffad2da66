// Auto-moderation service - the four message evaluators.
//
// Evaluation order is fixed: bad words, spam, caps, mass mentions. The first
// rule that fires wins so a message gets at most one deletion and one notice.
//
// NO Discord dependencies here - the handler in discord/automod turns a
// `Violation` into deletes and notices.

use super::automod_models::{AutoModConfig, MessageSnapshot, RecentMessage, Violation};
use crate::core::moderation::ModerationState;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct AutoModService {
    state: Arc<ModerationState>,
    config: AutoModConfig,
    enabled: AtomicBool,
    bad_words: RwLock<Vec<String>>,
}

impl AutoModService {
    pub fn new(state: Arc<ModerationState>, config: AutoModConfig, bad_words: Vec<String>) -> Self {
        let mut words: Vec<String> = bad_words
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        words.dedup();

        Self {
            state,
            config,
            enabled: AtomicBool::new(true),
            bad_words: RwLock::new(words),
        }
    }

    pub fn config(&self) -> &AutoModConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Run the evaluators in order. Returns the first violation, if any.
    ///
    /// Callers must check whitelist immunity first; an immune message must not
    /// reach this function at all (it would still feed the spam window).
    pub async fn evaluate(&self, msg: &MessageSnapshot) -> Option<Violation> {
        if !self.is_enabled() {
            return None;
        }

        if let Some(word) = self.check_bad_words(&msg.content).await {
            return Some(Violation::BadWord(word));
        }
        if self.check_spam(msg.author_id, msg.sent_at) {
            return Some(Violation::Spam);
        }
        if self.check_caps(&msg.content) {
            return Some(Violation::ExcessiveCaps);
        }
        if self.check_mass_mentions(msg.mention_count) {
            return Some(Violation::MassMention(msg.mention_count));
        }

        None
    }

    /// Case-insensitive substring match against the filter list.
    pub async fn check_bad_words(&self, content: &str) -> Option<String> {
        let lowered = content.to_lowercase();
        let words = self.bad_words.read().await;
        words.iter().find(|w| lowered.contains(w.as_str())).cloned()
    }

    /// Record the message and report a burst. A burst clears the window.
    pub fn check_spam(&self, author_id: u64, at: DateTime<Utc>) -> bool {
        let count = self.state.spam.record_event(author_id, at);
        if count > self.config.spam_threshold {
            self.state.spam.clear(author_id);
            return true;
        }
        false
    }

    pub fn check_caps(&self, content: &str) -> bool {
        let total = content.chars().count();
        if total < self.config.caps_min_length {
            return false;
        }
        let upper = content.chars().filter(|c| c.is_uppercase()).count();
        (upper as f64 / total as f64) > self.config.caps_ratio
    }

    pub fn check_mass_mentions(&self, mention_count: usize) -> bool {
        mention_count > self.config.mention_threshold
    }

    /// Whether a message at `sent_at` falls inside the spam window ending at `now`.
    pub fn within_spam_window(&self, sent_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(sent_at) < self.state.spam.width()
    }

    /// Ids to delete after a spam hit: the author's messages among `recent`
    /// still inside the spam window, plus the triggering message itself.
    pub fn spam_cleanup_ids(
        &self,
        author_id: u64,
        trigger_id: u64,
        recent: &[RecentMessage],
        now: DateTime<Utc>,
    ) -> Vec<u64> {
        let mut ids: Vec<u64> = recent
            .iter()
            .filter(|m| m.author_id == author_id)
            .filter(|m| self.within_spam_window(m.sent_at, now))
            .map(|m| m.message_id)
            .collect();
        ids.dedup();
        if !ids.contains(&trigger_id) {
            ids.push(trigger_id);
        }
        ids
    }

    /// Returns false if the word was already present.
    pub async fn add_bad_word(&self, word: &str) -> bool {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return false;
        }
        let mut words = self.bad_words.write().await;
        if words.contains(&word) {
            return false;
        }
        words.push(word);
        true
    }

    /// Returns false if the word was not in the filter.
    pub async fn remove_bad_word(&self, word: &str) -> bool {
        let word = word.trim().to_lowercase();
        let mut words = self.bad_words.write().await;
        let before = words.len();
        words.retain(|w| *w != word);
        words.len() != before
    }

    pub async fn bad_words(&self) -> Vec<String> {
        self.bad_words.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn service() -> AutoModService {
        AutoModService::new(
            Arc::new(ModerationState::new()),
            AutoModConfig::default(),
            vec!["badword".to_string(), "Spam".to_string()],
        )
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn msg(author_id: u64, content: &str, sent_at: DateTime<Utc>) -> MessageSnapshot {
        MessageSnapshot {
            author_id,
            channel_id: 1,
            content: content.to_string(),
            mention_count: 0,
            sent_at,
        }
    }

    #[tokio::test]
    async fn test_normal_message_passes() {
        let service = service();
        assert_eq!(service.evaluate(&msg(1, "hello there", at(0))).await, None);
    }

    #[tokio::test]
    async fn test_bad_word_case_insensitive() {
        let service = service();
        let result = service
            .evaluate(&msg(1, "what a BadWord thing", at(0)))
            .await;
        assert_eq!(result, Some(Violation::BadWord("badword".into())));

        // Seed list entries are lowercased.
        let result = service.evaluate(&msg(2, "no SPAMMING", at(0))).await;
        assert_eq!(result, Some(Violation::BadWord("spam".into())));
    }

    #[tokio::test]
    async fn test_sixth_message_triggers_spam_and_resets() {
        let service = service();

        for i in 0..5 {
            let result = service.evaluate(&msg(1, "hi", at(i))).await;
            assert_eq!(result, None, "message {} should pass", i + 1);
        }

        assert_eq!(
            service.evaluate(&msg(1, "hi", at(5))).await,
            Some(Violation::Spam)
        );
        assert_eq!(service.state.spam.count_recent(1, at(5)), 0);

        // The window restarted, so the next message is fine.
        assert_eq!(service.evaluate(&msg(1, "hi", at(6))).await, None);
    }

    #[tokio::test]
    async fn test_spread_out_messages_are_not_spam() {
        let service = service();
        for i in 0..12 {
            let result = service.evaluate(&msg(1, "hi", at(i * 3))).await;
            assert_eq!(result, None);
        }
    }

    #[tokio::test]
    async fn test_caps_length_floor() {
        let service = service();
        assert!(!service.check_caps("ABCDEFGHI"));
        assert!(service.check_caps("ABCDEFGHIJ"));
        assert!(!service.check_caps("ABCDEFGhij"));
        assert!(service.check_caps("ABCDEFGHij"));
    }

    #[tokio::test]
    async fn test_mass_mention_threshold() {
        let service = service();
        let mut m = msg(1, "hey all", at(0));
        m.mention_count = 5;
        assert_eq!(service.evaluate(&m).await, None);

        let mut m = msg(2, "hey all", at(0));
        m.mention_count = 6;
        assert_eq!(service.evaluate(&m).await, Some(Violation::MassMention(6)));
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let service = service();
        let mut m = msg(1, "BADWORD BADWORD BADWORD", at(0));
        m.mention_count = 10;
        assert_eq!(
            service.evaluate(&m).await,
            Some(Violation::BadWord("badword".into()))
        );

        let mut m = msg(2, "HELLO EVERYBODY", at(0));
        m.mention_count = 10;
        assert_eq!(service.evaluate(&m).await, Some(Violation::ExcessiveCaps));
    }

    #[tokio::test]
    async fn test_disabled_skips_everything() {
        let service = service();
        service.set_enabled(false);
        let mut m = msg(1, "BADWORD", at(0));
        m.mention_count = 50;
        assert_eq!(service.evaluate(&m).await, None);
    }

    #[tokio::test]
    async fn test_bad_word_list_editing() {
        let service = service();
        assert!(service.add_bad_word("Heck").await);
        assert!(!service.add_bad_word("heck").await);
        assert_eq!(
            service.check_bad_words("oh HECK").await,
            Some("heck".to_string())
        );

        assert!(service.remove_bad_word("HECK").await);
        assert!(!service.remove_bad_word("heck").await);
        assert_eq!(service.check_bad_words("oh heck").await, None);
    }

    fn recent(author_id: u64, message_id: u64, sent_at: DateTime<Utc>) -> RecentMessage {
        RecentMessage {
            author_id,
            message_id,
            sent_at,
        }
    }

    #[test]
    fn test_spam_cleanup_skips_other_authors() {
        let service = service();
        let now = at(100);
        let history = [
            recent(1, 10, at(95)),
            recent(2, 11, at(96)),
            recent(1, 12, at(97)),
        ];
        assert_eq!(service.spam_cleanup_ids(1, 12, &history, now), vec![10, 12]);
    }

    #[test]
    fn test_spam_cleanup_skips_messages_outside_window() {
        let service = service();
        let now = at(100);
        let history = [
            recent(1, 10, at(80)),
            recent(1, 11, at(90)),
            recent(1, 12, at(99)),
        ];
        // t=90 sits exactly on the window edge.
        assert_eq!(service.spam_cleanup_ids(1, 12, &history, now), vec![12]);
    }

    #[test]
    fn test_spam_cleanup_keeps_sub_second_precision() {
        let service = service();
        let sent = at(0) + Duration::milliseconds(900);
        let now = at(10) + Duration::milliseconds(500);
        let history = [recent(1, 10, sent)];
        assert_eq!(service.spam_cleanup_ids(1, 11, &history, now), vec![10, 11]);
    }

    #[test]
    fn test_spam_cleanup_always_includes_trigger_once() {
        let service = service();
        let now = at(100);

        // Trigger missing from the fetched history.
        assert_eq!(service.spam_cleanup_ids(1, 50, &[], now), vec![50]);

        // Trigger already fetched is not added twice.
        let history = [recent(1, 49, at(99)), recent(1, 50, at(100))];
        assert_eq!(service.spam_cleanup_ids(1, 50, &history, now), vec![49, 50]);
    }

    #[test]
    fn test_spam_window_membership() {
        let service = service();
        let now = at(100);
        assert!(service.within_spam_window(now - Duration::seconds(9), now));
        assert!(!service.within_spam_window(now - Duration::seconds(10), now));
    }
}
