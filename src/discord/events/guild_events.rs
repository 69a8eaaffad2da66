// Member joins, channel creation and the bot's own guild joins/removals.

use crate::core::server_logs::{GuildLogEntry, GuildLogEvent};
use crate::discord::actions::restriction_roles::apply_overwrite;
use crate::discord::actions::{ActionExecutor, RestrictionRole};
use crate::discord::{Data, Error};
use poise::serenity_prelude as serenity;

/// Hand the configured auto-role to a member who just joined.
pub async fn handle_member_join(
    ctx: &serenity::Context,
    data: &Data,
    member: &serenity::Member,
) -> Result<(), Error> {
    let Some(role_id) = data.auto_role.role_for(member.guild_id.get()) else {
        return Ok(());
    };

    let exec = ActionExecutor::new(&ctx.http, &data.retry);
    match exec
        .add_role(
            member.guild_id,
            member.user.id,
            serenity::RoleId::new(role_id),
            "Auto-role on join",
        )
        .await
    {
        Ok(()) => tracing::info!(
            guild_id = member.guild_id.get(),
            user_id = member.user.id.get(),
            role_id,
            "Assigned auto-role"
        ),
        Err(e) => tracing::error!(
            guild_id = member.guild_id.get(),
            user_id = member.user.id.get(),
            "Failed to assign auto-role: {}",
            e
        ),
    }
    Ok(())
}

/// New channels inherit the quarantine restrictions.
pub async fn handle_channel_create(
    ctx: &serenity::Context,
    data: &Data,
    channel: &serenity::GuildChannel,
) -> Result<(), Error> {
    let role_id = ctx.cache.guild(channel.guild_id).and_then(|guild| {
        guild
            .roles
            .values()
            .find(|r| r.name == RestrictionRole::Quarantined.name())
            .map(|r| r.id)
    });

    if let Some(role_id) = role_id {
        let exec = ActionExecutor::new(&ctx.http, &data.retry);
        apply_overwrite(&exec, channel, role_id, RestrictionRole::Quarantined).await;
    }
    Ok(())
}

pub async fn handle_guild_create(
    ctx: &serenity::Context,
    data: &Data,
    guild: &serenity::Guild,
    is_new: Option<bool>,
) -> Result<(), Error> {
    // Startup replays GuildCreate for every existing guild.
    if is_new != Some(true) {
        return Ok(());
    }

    tracing::info!(guild_id = guild.id.get(), "Joined guild {}", guild.name);
    let entry = GuildLogEntry {
        guild_id: guild.id.get(),
        name: guild.name.clone(),
        member_count: guild.member_count,
        owner_id: Some(guild.owner_id.get()),
        total_guilds: ctx.cache.guilds().len(),
    };
    post_log(ctx, data, GuildLogEvent::Joined, &entry).await
}

pub async fn handle_guild_delete(
    ctx: &serenity::Context,
    data: &Data,
    incomplete: &serenity::UnavailableGuild,
    full: Option<&serenity::Guild>,
) -> Result<(), Error> {
    // An outage, not a removal.
    if incomplete.unavailable {
        return Ok(());
    }

    tracing::info!(guild_id = incomplete.id.get(), "Removed from guild");
    let entry = GuildLogEntry {
        guild_id: incomplete.id.get(),
        name: full
            .map(|g| g.name.clone())
            .unwrap_or_else(|| "Unknown server".to_string()),
        member_count: full.map(|g| g.member_count).unwrap_or(0),
        owner_id: full.map(|g| g.owner_id.get()),
        total_guilds: ctx.cache.guilds().len(),
    };
    post_log(ctx, data, GuildLogEvent::Left, &entry).await
}

pub fn log_embed(event: GuildLogEvent, entry: &GuildLogEntry) -> serenity::CreateEmbed {
    let owner = entry
        .owner_id
        .map(|id| format!("<@{}>", id))
        .unwrap_or_else(|| "Unknown".to_string());

    serenity::CreateEmbed::new()
        .title(event.title())
        .description(format!("**{}**", entry.name))
        .color(event.color())
        .field("Server ID", entry.guild_id.to_string(), true)
        .field("Owner", owner, true)
        .field("Member Count", entry.member_count.to_string(), true)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Total servers: {}",
            entry.total_guilds
        )))
        .timestamp(serenity::Timestamp::now())
}

async fn post_log(
    ctx: &serenity::Context,
    data: &Data,
    event: GuildLogEvent,
    entry: &GuildLogEntry,
) -> Result<(), Error> {
    let Some(channel_id) = data.server_logs.log_channel().await? else {
        return Ok(());
    };

    let exec = ActionExecutor::new(&ctx.http, &data.retry);
    if let Err(e) = exec
        .send_embed(serenity::ChannelId::new(channel_id), log_embed(event, entry))
        .await
    {
        tracing::error!(channel_id, "Failed to post server log: {}", e);
    }
    Ok(())
}
