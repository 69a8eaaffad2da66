// Moderation domain models shared by the AFK, warning and detector services.
//
// These are pure domain types with no Discord dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Width of the per-user spam window, in seconds.
pub const SPAM_WINDOW_SECS: i64 = 10;
/// Width of the per-guild anti-nuke windows, in seconds.
pub const NUKE_WINDOW_SECS: i64 = 60;

/// One AFK registration. Re-setting overwrites the previous entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AfkEntry {
    pub user_id: u64,
    pub reason: String,
    pub set_at: DateTime<Utc>,
}
