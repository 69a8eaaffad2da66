// Gathers hierarchy facts from Discord and runs the shared policy check.

use super::action_executor::ActionExecutor;
use crate::core::moderation::{
    check_target, ActionError, MemberFacts, PolicyViolation, TargetCheck,
};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use std::collections::{HashMap, HashSet};

pub fn top_role_position(
    roles: &HashMap<serenity::RoleId, serenity::Role>,
    member_roles: &[serenity::RoleId],
) -> u16 {
    member_roles
        .iter()
        .filter_map(|id| roles.get(id))
        .map(|role| role.position)
        .max()
        .unwrap_or(0)
}

/// Guild-level permissions from @everyone plus the member's roles.
pub fn resolve_permissions(
    guild: &serenity::PartialGuild,
    user_id: serenity::UserId,
    member_roles: &[serenity::RoleId],
) -> serenity::Permissions {
    if guild.owner_id == user_id {
        return serenity::Permissions::all();
    }

    let everyone = serenity::RoleId::new(guild.id.get());
    let mut resolved = serenity::Permissions::empty();
    for role in guild.roles.values() {
        if role.id == everyone || member_roles.contains(&role.id) {
            resolved |= role.permissions;
        }
    }
    resolved
}

pub fn has_permission(granted: serenity::Permissions, required: serenity::Permissions) -> bool {
    granted.contains(serenity::Permissions::ADMINISTRATOR) || granted.contains(required)
}

pub fn require_permission(
    granted: serenity::Permissions,
    required: serenity::Permissions,
    action: &str,
) -> Result<(), ActionError> {
    if has_permission(granted, required) {
        Ok(())
    } else {
        Err(ActionError::PermissionDenied(action.to_string()))
    }
}

pub fn member_facts(guild: &serenity::PartialGuild, member: &serenity::Member) -> MemberFacts {
    MemberFacts {
        user_id: member.user.id.get(),
        top_role_position: top_role_position(&guild.roles, &member.roles),
        is_guild_owner: guild.owner_id == member.user.id,
        is_bot: member.user.bot,
    }
}

pub fn bot_user_id(ctx: Context<'_>) -> serenity::UserId {
    ctx.cache().current_user().id
}

/// Facts for the invoking user and the bot, fetched fresh from the API.
pub struct ActorContext {
    pub guild: serenity::PartialGuild,
    pub caller: serenity::Member,
    pub bot: serenity::Member,
}

impl ActorContext {
    pub async fn load(ctx: Context<'_>, exec: &ActionExecutor<'_>) -> Result<Self, Error> {
        let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
        let guild = exec.guild(guild_id).await?;
        let caller = exec.member(guild_id, ctx.author().id).await?;
        let bot = exec.member(guild_id, bot_user_id(ctx)).await?;
        Ok(Self { guild, caller, bot })
    }

    pub fn bot_top_position(&self) -> u16 {
        top_role_position(&self.guild.roles, &self.bot.roles)
    }

    pub fn caller_has(&self, required: serenity::Permissions) -> bool {
        has_permission(
            resolve_permissions(&self.guild, self.caller.user.id, &self.caller.roles),
            required,
        )
    }

    /// Fail with `PermissionDenied` unless the caller holds `required`.
    pub fn require(
        &self,
        required: serenity::Permissions,
        action: &str,
    ) -> Result<(), ActionError> {
        require_permission(
            resolve_permissions(&self.guild, self.caller.user.id, &self.caller.roles),
            required,
            action,
        )
    }

    /// Run the policy predicate for `action` against `target`.
    pub fn check(
        &self,
        action: &str,
        target: &serenity::Member,
        required: serenity::Permissions,
        allow_bot_targets: bool,
    ) -> Result<(), PolicyViolation> {
        check_target(&TargetCheck {
            action,
            caller: member_facts(&self.guild, &self.caller),
            target: member_facts(&self.guild, target),
            bot: member_facts(&self.guild, &self.bot),
            caller_has_permission: self.caller_has(required),
            allow_bot_targets,
        })
    }
}

/// Load actors and check `target`; a violation becomes the command error so
/// `on_error` shows it to the caller.
pub async fn ensure_can_target(
    ctx: Context<'_>,
    exec: &ActionExecutor<'_>,
    action: &str,
    target: &serenity::Member,
    required: serenity::Permissions,
    allow_bot_targets: bool,
) -> Result<ActorContext, Error> {
    let actors = ActorContext::load(ctx, exec).await?;
    if let Err(violation) = actors.check(action, target, required, allow_bot_targets) {
        tracing::warn!(
            caller_id = ctx.author().id.get(),
            target_id = target.user.id.get(),
            "Refused {}: {}",
            action,
            violation
        );
        return Err(violation.into());
    }
    Ok(actors)
}

/// Keep only ids that belong to cached members of the guild. If the guild is
/// not cached every id is kept.
pub fn retain_guild_members(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    ids: impl IntoIterator<Item = u64>,
) -> Vec<u64> {
    let members: Option<HashSet<u64>> = ctx
        .cache()
        .guild(guild_id)
        .map(|g| g.members.keys().map(|id| id.get()).collect());

    ids.into_iter()
        .filter(|id| members.as_ref().map_or(true, |m| m.contains(id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_permission_respects_administrator() {
        use self::serenity::Permissions as P;
        assert!(has_permission(P::ADMINISTRATOR, P::BAN_MEMBERS));
        assert!(has_permission(P::BAN_MEMBERS | P::KICK_MEMBERS, P::BAN_MEMBERS));
        assert!(!has_permission(P::KICK_MEMBERS, P::BAN_MEMBERS));
    }

    #[test]
    fn test_require_permission_reports_denial() {
        use self::serenity::Permissions as P;
        assert_eq!(require_permission(P::MANAGE_ROLES, P::MANAGE_ROLES, "assign roles"), Ok(()));
        assert_eq!(require_permission(P::ADMINISTRATOR, P::MANAGE_ROLES, "assign roles"), Ok(()));

        let denied = require_permission(P::KICK_MEMBERS, P::MANAGE_ROLES, "assign roles");
        assert_eq!(
            denied,
            Err(ActionError::PermissionDenied("assign roles".to_string()))
        );
        assert!(denied.unwrap_err().is_user_facing());
    }
}
