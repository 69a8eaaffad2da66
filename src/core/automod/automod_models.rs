use chrono::{DateTime, Utc};
use std::fmt;

/// The parts of a message the evaluators look at.
#[derive(Debug, Clone)]
pub struct MessageSnapshot {
    pub author_id: u64,
    pub channel_id: u64,
    pub content: String,
    /// User mentions only; role mentions are not counted.
    pub mention_count: usize,
    pub sent_at: DateTime<Utc>,
}

/// A message already in the channel, as seen by the spam cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentMessage {
    pub author_id: u64,
    pub message_id: u64,
    pub sent_at: DateTime<Utc>,
}

/// Which rule fired. Only one is reported per message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    BadWord(String),
    Spam,
    ExcessiveCaps,
    MassMention(usize),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::BadWord(_) => write!(f, "Bad Word"),
            Violation::Spam => write!(f, "Spam"),
            Violation::ExcessiveCaps => write!(f, "Excessive Caps"),
            Violation::MassMention(_) => write!(f, "Mass Mention"),
        }
    }
}

/// Thresholds for the message evaluators.
#[derive(Debug, Clone)]
pub struct AutoModConfig {
    /// Messages allowed in the spam window before the next one triggers.
    pub spam_threshold: usize,
    /// Messages shorter than this are never caps-checked.
    pub caps_min_length: usize,
    /// Uppercase share that triggers, exclusive.
    pub caps_ratio: f64,
    /// Mentions allowed per message before triggering.
    pub mention_threshold: usize,
    /// How many recent channel messages the spam cleanup scans.
    pub spam_history_scan: u8,
}

impl Default for AutoModConfig {
    fn default() -> Self {
        Self {
            spam_threshold: 5,
            caps_min_length: 10,
            caps_ratio: 0.7,
            mention_threshold: 5,
            spam_history_scan: 10,
        }
    }
}
