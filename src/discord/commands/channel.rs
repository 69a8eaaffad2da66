// Channel clean-up: purge recent messages or recreate the channel outright.

use crate::discord::actions::confirmation::{
    prompt_confirm_decline, resolve_confirmation, CONFIRMATION_TIMEOUT,
};
use crate::discord::actions::embeds::{self, mention};
use crate::discord::actions::ActionExecutor;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Discord refuses to bulk delete messages older than this.
const BULK_DELETE_MAX_AGE_SECS: i64 = 14 * 24 * 3600;

pub fn validate_purge_amount(amount: i64) -> Result<u8, &'static str> {
    if amount > 100 {
        return Err("❌ Cannot delete more than 100 messages at once.");
    }
    if amount < 1 {
        return Err("❌ Amount must be at least 1.");
    }
    Ok(amount as u8)
}

/// Delete up to 100 recent messages in this channel.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn purge(
    ctx: Context<'_>,
    #[description = "Number of messages to delete (1-100)"] amount: i64,
) -> Result<(), Error> {
    let amount = match validate_purge_amount(amount) {
        Ok(amount) => amount,
        Err(message) => {
            ctx.send(poise::CreateReply::default().content(message).ephemeral(true))
                .await?;
            return Ok(());
        }
    };

    ctx.defer_ephemeral().await?;
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let channel_id = ctx.channel_id();

    let cutoff = serenity::Timestamp::now().unix_timestamp() - BULK_DELETE_MAX_AGE_SECS;
    let ids: Vec<serenity::MessageId> = exec
        .recent_messages(channel_id, amount)
        .await?
        .iter()
        .filter(|m| m.timestamp.unix_timestamp() > cutoff)
        .map(|m| m.id)
        .collect();

    exec.delete_messages(channel_id, &ids).await?;
    tracing::info!(
        channel_id = channel_id.get(),
        moderator_id = ctx.author().id.get(),
        deleted = ids.len(),
        "Messages purged"
    );

    let embed = embeds::embed(
        "✅ Messages Purged",
        format!("Successfully deleted {} messages.", ids.len()),
        embeds::GREEN,
    )
    .field("Moderator", mention(ctx.author().id), true);
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Delete this channel and recreate it with the same settings.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_CHANNELS"
)]
pub async fn nuke(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let Some(channel) = ctx.guild_channel().await else {
        ctx.say("❌ Could not resolve this channel.").await?;
        return Ok(());
    };
    if channel.kind != serenity::ChannelType::Text {
        ctx.say("❌ Only text channels can be nuked.").await?;
        return Ok(());
    }

    let prompt = embeds::embed(
        "⚠️ Nuke Confirmation Required",
        format!(
            "This will delete ALL messages in <#{}> and recreate the channel.",
            channel.id
        ),
        embeds::YELLOW,
    );
    let confirmation = prompt_confirm_decline(ctx, prompt, CONFIRMATION_TIMEOUT).await?;
    let confirmed = resolve_confirmation(
        ctx,
        confirmation,
        "⌛ Nuke cancelled: no response within 30 seconds.",
        "❎ Nuke cancelled.",
        "💥 Nuking channel...",
    )
    .await?;
    if confirmed.is_none() {
        return Ok(());
    }

    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let reason = format!("Channel nuked by {}", ctx.author().name);

    let mut builder = serenity::CreateChannel::new(channel.name.clone())
        .kind(serenity::ChannelType::Text)
        .position(channel.position)
        .nsfw(channel.nsfw)
        .permissions(channel.permission_overwrites.clone())
        .audit_log_reason(&reason);
    if let Some(parent_id) = channel.parent_id {
        builder = builder.category(parent_id);
    }
    if let Some(topic) = &channel.topic {
        builder = builder.topic(topic.clone());
    }
    if let Some(slowmode) = channel.rate_limit_per_user {
        builder = builder.rate_limit_per_user(slowmode);
    }

    let recreated = exec.create_channel(guild_id, builder).await?;
    exec.delete_channel(channel.id).await?;

    tracing::info!(
        guild_id = guild_id.get(),
        old_channel_id = channel.id.get(),
        new_channel_id = recreated.id.get(),
        moderator_id = ctx.author().id.get(),
        "Channel #{} nuked",
        channel.name
    );

    let embed = embeds::embed(
        "💥 Channel Nuked",
        "This channel has been successfully nuked and recreated!",
        embeds::GREEN,
    )
    .field("Moderator", mention(ctx.author().id), true);
    exec.send_embed(recreated.id, embed).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purge_amount_bounds() {
        assert_eq!(validate_purge_amount(1), Ok(1));
        assert_eq!(validate_purge_amount(100), Ok(100));
        assert!(validate_purge_amount(0).is_err());
        assert!(validate_purge_amount(101).is_err());
        assert!(validate_purge_amount(-5).is_err());
    }
}
