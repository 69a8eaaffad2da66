// The Muted and Quarantined roles: created on first use, with a deny
// overwrite on every channel so the role actually restricts something.

use super::action_executor::ActionExecutor;
use crate::core::moderation::ActionError;
use poise::serenity_prelude as serenity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionRole {
    Muted,
    Quarantined,
}

impl RestrictionRole {
    pub fn name(self) -> &'static str {
        match self {
            RestrictionRole::Muted => "Muted",
            RestrictionRole::Quarantined => "Quarantined",
        }
    }

    pub fn colour(self) -> u32 {
        match self {
            RestrictionRole::Muted => 0x818386,
            RestrictionRole::Quarantined => 0x992D22,
        }
    }

    /// Permissions to deny on a channel of this kind, or `None` to leave it alone.
    pub fn deny_for(self, kind: serenity::ChannelType) -> Option<serenity::Permissions> {
        use serenity::ChannelType;
        use serenity::Permissions as P;

        match self {
            RestrictionRole::Muted => Some(P::SEND_MESSAGES | P::SPEAK),
            RestrictionRole::Quarantined => match kind {
                ChannelType::Text | ChannelType::News | ChannelType::Forum => Some(
                    P::SEND_MESSAGES
                        | P::ADD_REACTIONS
                        | P::CREATE_PUBLIC_THREADS
                        | P::CREATE_PRIVATE_THREADS
                        | P::SEND_MESSAGES_IN_THREADS,
                ),
                ChannelType::Voice | ChannelType::Stage => {
                    Some(P::CONNECT | P::SPEAK | P::STREAM | P::USE_VAD)
                }
                _ => None,
            },
        }
    }
}

/// Find the role by name without creating it.
pub async fn find_restriction_role(
    exec: &ActionExecutor<'_>,
    guild_id: serenity::GuildId,
    role: RestrictionRole,
) -> Result<Option<serenity::RoleId>, ActionError> {
    let roles = exec.roles(guild_id).await?;
    Ok(roles
        .values()
        .find(|r| r.name == role.name())
        .map(|r| r.id))
}

/// Look the role up by name, creating and configuring it when absent.
pub async fn ensure_restriction_role(
    exec: &ActionExecutor<'_>,
    guild_id: serenity::GuildId,
    role: RestrictionRole,
) -> Result<serenity::RoleId, ActionError> {
    if let Some(existing) = find_restriction_role(exec, guild_id, role).await? {
        return Ok(existing);
    }

    let created = exec
        .create_role(
            guild_id,
            role.name(),
            role.colour(),
            &format!("{} role setup", role.name()),
        )
        .await?;
    tracing::info!(
        guild_id = guild_id.get(),
        role_id = created.id.get(),
        "Created {} role",
        role.name()
    );

    let channels = exec.channels(guild_id).await?;
    for channel in channels.values() {
        apply_overwrite(exec, channel, created.id, role).await;
    }

    Ok(created.id)
}

/// Deny the role's permissions on one channel. Failures are logged; one locked
/// channel should not abort setting up the rest.
pub async fn apply_overwrite(
    exec: &ActionExecutor<'_>,
    channel: &serenity::GuildChannel,
    role_id: serenity::RoleId,
    role: RestrictionRole,
) {
    let Some(deny) = role.deny_for(channel.kind) else {
        return;
    };
    if let Err(e) = exec.set_role_overwrite(channel.id, role_id, deny).await {
        tracing::warn!(
            "Cannot set {} permissions for #{}: {}",
            role.name(),
            channel.name,
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use self::serenity::{ChannelType, Permissions};

    #[test]
    fn test_muted_denies_text_and_voice_everywhere() {
        let deny = RestrictionRole::Muted.deny_for(ChannelType::Category).unwrap();
        assert!(deny.contains(Permissions::SEND_MESSAGES | Permissions::SPEAK));
    }

    #[test]
    fn test_quarantine_overwrites_by_channel_kind() {
        let text = RestrictionRole::Quarantined
            .deny_for(ChannelType::Text)
            .unwrap();
        assert!(text.contains(Permissions::SEND_MESSAGES | Permissions::ADD_REACTIONS));
        assert!(!text.contains(Permissions::CONNECT));

        let voice = RestrictionRole::Quarantined
            .deny_for(ChannelType::Voice)
            .unwrap();
        assert!(voice.contains(Permissions::CONNECT | Permissions::SPEAK));
        assert!(!voice.contains(Permissions::SEND_MESSAGES));

        assert_eq!(RestrictionRole::Quarantined.deny_for(ChannelType::Category), None);
    }
}
