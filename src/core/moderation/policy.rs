// The single permission/hierarchy predicate every moderation command uses.
//
// The Discord layer gathers the facts (permission bit, top-role positions,
// ownership) and this module decides. Prefix and slash invocations share the
// same poise command bodies, so they cannot drift apart.

use thiserror::Error;

/// Facts about a guild member needed for hierarchy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberFacts {
    pub user_id: u64,
    /// Position of the member's highest role (0 = @everyone only).
    pub top_role_position: u16,
    pub is_guild_owner: bool,
    pub is_bot: bool,
}

/// One moderation attempt: who acts, on whom, through which bot.
#[derive(Debug, Clone, Copy)]
pub struct TargetCheck<'a> {
    /// Verb used in messages, e.g. "ban", "timeout".
    pub action: &'a str,
    pub caller: MemberFacts,
    pub target: MemberFacts,
    pub bot: MemberFacts,
    pub caller_has_permission: bool,
    /// Ban/kick may target other bots; warn/timeout/quarantine may not.
    pub allow_bot_targets: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("❌ You don't have permission to {0} members.")]
    MissingPermission(String),
    #[error("❌ You cannot {0} yourself.")]
    TargetIsSelf(String),
    #[error("❌ I cannot {0} myself.")]
    TargetIsThisBot(String),
    #[error("❌ You cannot {0} bots.")]
    TargetIsBot(String),
    #[error("❌ You cannot {0} someone with equal or higher roles.")]
    TargetNotBelowCaller(String),
    #[error("❌ I cannot {0} that member because their highest role is equal to or above mine.")]
    TargetNotBelowBot(String),
}

/// Evaluate `{has_permission, target_not_self, target_not_bot,
/// target_below_caller, target_below_bot}` in that order.
pub fn check_target(check: &TargetCheck<'_>) -> Result<(), PolicyViolation> {
    let action = check.action.to_string();

    if !check.caller_has_permission {
        return Err(PolicyViolation::MissingPermission(action));
    }

    if check.target.user_id == check.caller.user_id {
        return Err(PolicyViolation::TargetIsSelf(action));
    }

    if check.target.user_id == check.bot.user_id {
        return Err(PolicyViolation::TargetIsThisBot(action));
    }

    if check.target.is_bot && !check.allow_bot_targets {
        return Err(PolicyViolation::TargetIsBot(action));
    }

    // The guild owner outranks everyone, including members with higher roles.
    let outranked = check.target.is_guild_owner
        || (check.target.top_role_position >= check.caller.top_role_position
            && !check.caller.is_guild_owner);
    if outranked {
        return Err(PolicyViolation::TargetNotBelowCaller(action));
    }

    if check.target.is_guild_owner || check.target.top_role_position >= check.bot.top_role_position
    {
        return Err(PolicyViolation::TargetNotBelowBot(action));
    }

    Ok(())
}

/// Whether the bot can hand out a role at `role_position`.
pub fn role_assignable_by_bot(role_position: u16, bot_top_role_position: u16) -> bool {
    role_position < bot_top_role_position
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(user_id: u64, top: u16) -> MemberFacts {
        MemberFacts {
            user_id,
            top_role_position: top,
            is_guild_owner: false,
            is_bot: false,
        }
    }

    fn check<'a>(caller: MemberFacts, target: MemberFacts) -> TargetCheck<'a> {
        TargetCheck {
            action: "ban",
            caller,
            target,
            bot: MemberFacts {
                is_bot: true,
                ..member(999, 50)
            },
            caller_has_permission: true,
            allow_bot_targets: false,
        }
    }

    #[test]
    fn test_allows_lower_target() {
        assert_eq!(check_target(&check(member(1, 10), member(2, 5))), Ok(()));
    }

    #[test]
    fn test_permission_checked_first() {
        let mut c = check(member(1, 10), member(1, 5));
        c.caller_has_permission = false;
        assert_eq!(
            check_target(&c),
            Err(PolicyViolation::MissingPermission("ban".into()))
        );
    }

    #[test]
    fn test_rejects_self_and_bot() {
        assert_eq!(
            check_target(&check(member(1, 10), member(1, 10))),
            Err(PolicyViolation::TargetIsSelf("ban".into()))
        );
        assert_eq!(
            check_target(&check(member(1, 10), member(999, 1))),
            Err(PolicyViolation::TargetIsThisBot("ban".into()))
        );

        let other_bot = MemberFacts {
            is_bot: true,
            ..member(3, 1)
        };
        assert_eq!(
            check_target(&check(member(1, 10), other_bot)),
            Err(PolicyViolation::TargetIsBot("ban".into()))
        );

        let mut c = check(member(1, 10), other_bot);
        c.allow_bot_targets = true;
        assert_eq!(check_target(&c), Ok(()));
    }

    #[test]
    fn test_equal_role_rejected_unless_owner() {
        assert_eq!(
            check_target(&check(member(1, 10), member(2, 10))),
            Err(PolicyViolation::TargetNotBelowCaller("ban".into()))
        );

        let owner = MemberFacts {
            is_guild_owner: true,
            ..member(1, 0)
        };
        assert_eq!(check_target(&check(owner, member(2, 10))), Ok(()));
    }

    #[test]
    fn test_guild_owner_is_never_a_valid_target() {
        let owner_target = MemberFacts {
            is_guild_owner: true,
            ..member(2, 0)
        };
        assert_eq!(
            check_target(&check(member(1, 40), owner_target)),
            Err(PolicyViolation::TargetNotBelowCaller("ban".into()))
        );
    }

    #[test]
    fn test_bot_hierarchy() {
        let owner = MemberFacts {
            is_guild_owner: true,
            ..member(1, 0)
        };
        assert_eq!(
            check_target(&check(owner, member(2, 50))),
            Err(PolicyViolation::TargetNotBelowBot("ban".into()))
        );
        assert!(role_assignable_by_bot(4, 5));
        assert!(!role_assignable_by_bot(5, 5));
    }
}
