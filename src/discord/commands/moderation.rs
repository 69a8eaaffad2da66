// Kick, role-based mute and the permission scan.

use crate::discord::actions::embeds::{self, mention, NO_REASON};
use crate::discord::actions::permissions::{ensure_can_target, has_permission, resolve_permissions};
use crate::discord::actions::restriction_roles::{ensure_restriction_role, find_restriction_role};
use crate::discord::actions::{ActionExecutor, RestrictionRole};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Permissions shown by `checkperms`, in display order.
pub const KEY_PERMISSIONS: [(&str, serenity::Permissions); 8] = [
    ("Administrator", serenity::Permissions::ADMINISTRATOR),
    ("Manage Guild", serenity::Permissions::MANAGE_GUILD),
    ("Manage Roles", serenity::Permissions::MANAGE_ROLES),
    ("Kick Members", serenity::Permissions::KICK_MEMBERS),
    ("Ban Members", serenity::Permissions::BAN_MEMBERS),
    ("Manage Channels", serenity::Permissions::MANAGE_CHANNELS),
    ("Manage Messages", serenity::Permissions::MANAGE_MESSAGES),
    ("Mention Everyone", serenity::Permissions::MENTION_EVERYONE),
];

/// Kick a member from the server.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "KICK_MEMBERS"
)]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "Member to kick"] member: serenity::Member,
    #[description = "Reason for the kick"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let actors = ensure_can_target(
        ctx,
        &exec,
        "kick",
        &member,
        serenity::Permissions::KICK_MEMBERS,
        true,
    )
    .await?;
    let reason = reason.unwrap_or_else(|| NO_REASON.to_string());

    exec.dm_best_effort(
        member.user.id,
        embeds::dm_embed(
            "👢 You have been kicked",
            format!("You have been kicked from **{}**", actors.guild.name),
            embeds::ORANGE,
            Some(&reason),
            ctx.author(),
        ),
    )
    .await;

    exec.kick(
        actors.guild.id,
        member.user.id,
        &format!("Kicked by {}: {}", ctx.author().name, reason),
    )
    .await?;

    tracing::info!(
        guild_id = actors.guild.id.get(),
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        "Member kicked: {}",
        reason
    );

    let embed = embeds::embed(
        "Member Kicked",
        format!("{} has been kicked from the server.", mention(member.user.id)),
        embeds::ORANGE,
    )
    .field("Reason", reason.as_str(), false)
    .field("Moderator", mention(ctx.author().id), true);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Give a member the Muted role, creating it if needed.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_ROLES"
)]
pub async fn mute(
    ctx: Context<'_>,
    #[description = "Member to mute"] member: serenity::Member,
    #[description = "Reason for the mute"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let actors = ensure_can_target(
        ctx,
        &exec,
        "mute",
        &member,
        serenity::Permissions::MANAGE_ROLES,
        false,
    )
    .await?;
    let reason = reason.unwrap_or_else(|| NO_REASON.to_string());

    let role_id = ensure_restriction_role(&exec, actors.guild.id, RestrictionRole::Muted).await?;
    if member.roles.contains(&role_id) {
        ctx.say(format!("❌ {} is already muted.", mention(member.user.id)))
            .await?;
        return Ok(());
    }

    exec.add_role(
        actors.guild.id,
        member.user.id,
        role_id,
        &format!("Muted by {}: {}", ctx.author().name, reason),
    )
    .await?;

    tracing::info!(
        guild_id = actors.guild.id.get(),
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        "Member muted: {}",
        reason
    );

    let embed = embeds::embed(
        "Member Muted",
        format!("{} has been muted.", mention(member.user.id)),
        embeds::ORANGE,
    )
    .field("Reason", reason.as_str(), false)
    .field("Moderator", mention(ctx.author().id), true);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Remove the Muted role from a member.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_ROLES"
)]
pub async fn unmute(
    ctx: Context<'_>,
    #[description = "Member to unmute"] member: serenity::Member,
) -> Result<(), Error> {
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let actors = ensure_can_target(
        ctx,
        &exec,
        "unmute",
        &member,
        serenity::Permissions::MANAGE_ROLES,
        false,
    )
    .await?;

    let Some(role_id) = find_restriction_role(&exec, actors.guild.id, RestrictionRole::Muted).await?
    else {
        ctx.say("❌ Muted role not found.").await?;
        return Ok(());
    };
    if !member.roles.contains(&role_id) {
        ctx.say("❌ This member is not muted.").await?;
        return Ok(());
    }

    exec.remove_role(
        actors.guild.id,
        member.user.id,
        role_id,
        &format!("Unmuted by {}", ctx.author().name),
    )
    .await?;

    tracing::info!(
        guild_id = actors.guild.id.get(),
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        "Member unmuted"
    );

    let embed = embeds::embed(
        "Member Unmuted",
        format!("{} has been unmuted.", mention(member.user.id)),
        embeds::GREEN,
    )
    .field("Moderator", mention(ctx.author().id), true);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Scan a member's key server permissions.
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn checkperms(
    ctx: Context<'_>,
    #[description = "Member to inspect (defaults to you)"] member: Option<serenity::Member>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let guild = exec.guild(guild_id).await?;
    let target = match member {
        Some(member) => member,
        None => exec.member(guild_id, ctx.author().id).await?,
    };

    let granted = resolve_permissions(&guild, target.user.id, &target.roles);
    let mut embed = embeds::embed(
        &format!("🔍 Permission Scan: {}", target.display_name()),
        "Behold the power they wield...",
        embeds::PURPLE,
    );
    for (label, permission) in KEY_PERMISSIONS {
        let status = if has_permission(granted, permission) {
            "✅ Granted"
        } else {
            "❌ Denied"
        };
        embed = embed.field(label, status, true);
    }
    embed = embed.footer(serenity::CreateEmbedFooter::new(
        "Scan complete. Power levels assessed.",
    ));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
