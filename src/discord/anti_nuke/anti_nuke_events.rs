// Feeds channel deletions and bans into the burst detector and posts an alert
// when a window overflows.

use crate::core::anti_nuke::NukeAlert;
use crate::discord::actions::embeds;
use crate::discord::actions::ActionExecutor;
use crate::discord::{Data, Error};
use chrono::Utc;
use poise::serenity_prelude as serenity;

pub async fn handle_channel_delete(
    ctx: &serenity::Context,
    data: &Data,
    channel: &serenity::GuildChannel,
) -> Result<(), Error> {
    if let Some(alert) = data
        .anti_nuke
        .record_channel_deletion(channel.guild_id.get(), Utc::now())
    {
        post_alert(ctx, data, channel.guild_id, &alert).await;
    }
    Ok(())
}

pub async fn handle_ban(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: serenity::GuildId,
    banned_user: &serenity::User,
) -> Result<(), Error> {
    tracing::debug!(
        guild_id = guild_id.get(),
        user_id = banned_user.id.get(),
        "Ban observed"
    );
    if let Some(alert) = data.anti_nuke.record_ban(guild_id.get(), Utc::now()) {
        post_alert(ctx, data, guild_id, &alert).await;
    }
    Ok(())
}

pub fn alert_embed(alert: &NukeAlert) -> serenity::CreateEmbed {
    embeds::embed(
        "🚨 Anti-Nuke Protection Activated",
        format!(
            "**Reason:** {}\n\nSuspicious activity detected. Please review recent actions.",
            alert.kind
        ),
        embeds::RED,
    )
    .field(
        "Recommended Actions",
        "• Check audit logs\n• Review staff permissions\n• Consider enabling slowmode",
        false,
    )
}

async fn post_alert(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: serenity::GuildId,
    alert: &NukeAlert,
) {
    tracing::warn!(
        guild_id = alert.guild_id,
        recent_events = alert.recent_events,
        "Anti-nuke: {}",
        alert.kind
    );

    let Some(channel_id) = alert_channel(ctx, guild_id) else {
        tracing::warn!(
            guild_id = guild_id.get(),
            "No text channel available for the anti-nuke alert"
        );
        return;
    };

    let exec = ActionExecutor::new(&ctx.http, &data.retry);
    if let Err(e) = exec.send_embed(channel_id, alert_embed(alert)).await {
        tracing::error!("Failed to post anti-nuke alert: {}", e);
    }
}

/// The top-most text channel the bot can write to.
fn alert_channel(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
) -> Option<serenity::ChannelId> {
    let bot_id = ctx.cache.current_user().id;
    let guild = ctx.cache.guild(guild_id)?;
    let bot = guild.members.get(&bot_id);

    let mut candidates: Vec<&serenity::GuildChannel> = guild
        .channels
        .values()
        .filter(|c| c.kind == serenity::ChannelType::Text)
        .filter(|c| {
            bot.map_or(true, |me| {
                guild
                    .user_permissions_in(c, me)
                    .contains(serenity::Permissions::SEND_MESSAGES)
            })
        })
        .collect();
    candidates.sort_by_key(|c| (c.position, c.id));
    candidates.first().map(|c| c.id)
}
