// Warning escalation.
//
// Counts live in `ModerationState`; this service decides what each new count
// means. There is one policy object so the mute and ban thresholds are
// configured in exactly one place.

use crate::core::moderation::ModerationState;
use std::sync::Arc;

/// What should happen after a warning is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// Notice only.
    Notice,
    /// Apply the Muted role.
    Mute,
    /// Ban the member.
    Ban,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarningPolicy {
    /// The count at which the member is muted.
    pub mute_at: u32,
    /// The count at (or above) which the member is banned.
    pub ban_at: u32,
}

impl Default for WarningPolicy {
    fn default() -> Self {
        Self {
            mute_at: 2,
            ban_at: 3,
        }
    }
}

impl WarningPolicy {
    pub fn with_max_warnings(max_warnings: u32) -> Self {
        Self {
            ban_at: max_warnings.max(1),
            ..Self::default()
        }
    }

    /// Ban wins over mute when the thresholds collide.
    pub fn escalation_for(&self, count: u32) -> Escalation {
        if count >= self.ban_at {
            Escalation::Ban
        } else if count == self.mute_at {
            Escalation::Mute
        } else {
            Escalation::Notice
        }
    }

    /// One warning away from a ban.
    pub fn is_near_limit(&self, count: u32) -> bool {
        count > 0 && count + 1 >= self.ban_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarnOutcome {
    pub count: u32,
    pub escalation: Escalation,
}

pub struct WarningService {
    state: Arc<ModerationState>,
    policy: WarningPolicy,
}

impl WarningService {
    pub fn new(state: Arc<ModerationState>, policy: WarningPolicy) -> Self {
        Self { state, policy }
    }

    pub fn policy(&self) -> WarningPolicy {
        self.policy
    }

    pub fn warn(&self, user_id: u64) -> WarnOutcome {
        let count = self.state.warn(user_id);
        WarnOutcome {
            count,
            escalation: self.policy.escalation_for(count),
        }
    }

    pub fn count(&self, user_id: u64) -> u32 {
        self.state.warning_count(user_id)
    }

    /// Returns `(old, new)`.
    pub fn remove(&self, user_id: u64, amount: u32) -> (u32, u32) {
        self.state.remove_warnings(user_id, amount)
    }

    /// Returns the count that was cleared.
    pub fn clear(&self, user_id: u64) -> u32 {
        self.state.reset_warnings(user_id)
    }

    pub fn list(&self) -> Vec<(u64, u32)> {
        self.state.warned_users()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(max: u32) -> WarningService {
        WarningService::new(
            Arc::new(ModerationState::new()),
            WarningPolicy::with_max_warnings(max),
        )
    }

    #[test]
    fn test_default_escalation_ladder() {
        let service = service(3);
        assert_eq!(service.warn(1).escalation, Escalation::Notice);
        assert_eq!(service.warn(1).escalation, Escalation::Mute);
        assert_eq!(
            service.warn(1),
            WarnOutcome {
                count: 3,
                escalation: Escalation::Ban
            }
        );
        // Counts keep growing until reset; every one past the max is a ban.
        assert_eq!(service.warn(1).escalation, Escalation::Ban);
    }

    #[test]
    fn test_higher_max_leaves_gap_after_mute() {
        let service = service(5);
        let ladder: Vec<Escalation> = (0..5).map(|_| service.warn(9).escalation).collect();
        assert_eq!(
            ladder,
            vec![
                Escalation::Notice,
                Escalation::Mute,
                Escalation::Notice,
                Escalation::Notice,
                Escalation::Ban
            ]
        );
    }

    #[test]
    fn test_ban_threshold_wins_over_mute() {
        let service = service(2);
        assert_eq!(service.warn(1).escalation, Escalation::Notice);
        assert_eq!(service.warn(1).escalation, Escalation::Ban);
    }

    #[test]
    fn test_clear_resets_to_zero() {
        let service = service(3);
        service.warn(4);
        service.warn(4);
        assert_eq!(service.clear(4), 2);
        assert_eq!(service.count(4), 0);
        assert_eq!(service.clear(4), 0);

        // Escalation restarts from the bottom.
        assert_eq!(service.warn(4).escalation, Escalation::Notice);
    }

    #[test]
    fn test_near_limit() {
        let policy = WarningPolicy::default();
        assert!(!policy.is_near_limit(0));
        assert!(!policy.is_near_limit(1));
        assert!(policy.is_near_limit(2));
        assert!(policy.is_near_limit(3));
    }
}
