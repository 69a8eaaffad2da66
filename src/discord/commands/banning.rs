// Ban, soft ban and unban, plus ban list lookups.

use crate::core::moderation::ActionError;
use crate::discord::actions::embeds::{self, mention, truncate, NO_REASON};
use crate::discord::actions::permissions::ensure_can_target;
use crate::discord::actions::ActionExecutor;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

const MAX_DELETE_DAYS: u8 = 7;
const BAN_LIST_LIMIT: usize = 15;
const BAN_REASON_PREVIEW: usize = 50;

/// Ban a member, optionally deleting their recent messages.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "BAN_MEMBERS"
)]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "Member to ban"] member: serenity::Member,
    #[description = "Days of messages to delete (0-7)"] delete_days: Option<u8>,
    #[description = "Reason for the ban"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let delete_days = delete_days.unwrap_or(0);
    if delete_days > MAX_DELETE_DAYS {
        ctx.say("❌ Delete days must be between 0 and 7.").await?;
        return Ok(());
    }

    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let actors = ensure_can_target(
        ctx,
        &exec,
        "ban",
        &member,
        serenity::Permissions::BAN_MEMBERS,
        true,
    )
    .await?;
    let reason = reason.unwrap_or_else(|| NO_REASON.to_string());

    exec.dm_best_effort(
        member.user.id,
        embeds::dm_embed(
            "🔨 You have been banned",
            format!("You have been banned from **{}**", actors.guild.name),
            embeds::RED,
            Some(&reason),
            ctx.author(),
        ),
    )
    .await;

    exec.ban(
        actors.guild.id,
        member.user.id,
        delete_days,
        &format!("Banned by {}: {}", ctx.author().name, reason),
    )
    .await?;

    tracing::info!(
        guild_id = actors.guild.id.get(),
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        delete_days,
        "Member banned: {}",
        reason
    );

    let embed = embeds::embed(
        "User Banned",
        format!("{} has been banned from the server.", mention(member.user.id)),
        embeds::RED,
    )
    .field("Reason", reason.as_str(), false)
    .field("Moderator", mention(ctx.author().id), true)
    .field("Messages Deleted", format!("Last {} day(s)", delete_days), true);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Ban and immediately unban to clear a member's recent messages.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "BAN_MEMBERS"
)]
pub async fn softban(
    ctx: Context<'_>,
    #[description = "Member to soft ban"] member: serenity::Member,
    #[description = "Days of messages to delete (0-7, default 1)"] delete_days: Option<u8>,
    #[description = "Reason for the soft ban"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let delete_days = delete_days.unwrap_or(1);
    if delete_days > MAX_DELETE_DAYS {
        ctx.say("❌ Delete days must be between 0 and 7.").await?;
        return Ok(());
    }

    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let actors = ensure_can_target(
        ctx,
        &exec,
        "soft ban",
        &member,
        serenity::Permissions::BAN_MEMBERS,
        true,
    )
    .await?;
    let reason = reason.unwrap_or_else(|| NO_REASON.to_string());

    exec.dm_best_effort(
        member.user.id,
        embeds::dm_embed(
            "⚠️ You have been soft banned",
            format!("You have been soft banned from **{}**", actors.guild.name),
            embeds::ORANGE,
            Some(&reason),
            ctx.author(),
        )
        .field(
            "What is a soft ban?",
            format!(
                "Your messages from the last {} day(s) have been deleted, but you can rejoin the server.",
                delete_days
            ),
            false,
        ),
    )
    .await;

    exec.ban(
        actors.guild.id,
        member.user.id,
        delete_days,
        &format!("Soft banned by {}: {}", ctx.author().name, reason),
    )
    .await?;
    exec.unban(
        actors.guild.id,
        member.user.id,
        &format!("Soft ban unban by {}", ctx.author().name),
    )
    .await?;

    tracing::info!(
        guild_id = actors.guild.id.get(),
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        delete_days,
        "Member soft banned: {}",
        reason
    );

    let embed = embeds::embed(
        "User Soft Banned",
        format!(
            "{} (ID: {}) has been soft banned.",
            member.user.name, member.user.id
        ),
        embeds::ORANGE,
    )
    .field("Reason", reason.as_str(), false)
    .field("Moderator", mention(ctx.author().id), true)
    .field("Messages Deleted", format!("Last {} day(s)", delete_days), true)
    .field(
        "Note",
        "User can rejoin the server but their recent messages have been deleted.",
        false,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Lift a ban by user ID.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "BAN_MEMBERS"
)]
pub async fn unban(
    ctx: Context<'_>,
    #[description = "ID of the banned user"] user_id: String,
    #[description = "Reason for the unban"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let Some(user_id) = parse_user_id(&user_id) else {
        ctx.say("❌ Invalid user ID.").await?;
        return Ok(());
    };
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);

    let user = match exec.user(user_id).await {
        Ok(user) => user,
        Err(ActionError::NotFound(_)) => {
            ctx.say(format!("❌ User with ID {} not found.", user_id))
                .await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let bans = exec.bans(guild_id).await?;
    if !bans.iter().any(|b| b.user.id == user_id) {
        ctx.say(format!("❌ User with ID {} is not banned.", user_id))
            .await?;
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| NO_REASON.to_string());
    let guild_name = ctx
        .guild()
        .map(|g| g.name.clone())
        .unwrap_or_else(|| "the server".to_string());

    exec.dm_best_effort(
        user_id,
        embeds::dm_embed(
            "✅ You have been unbanned",
            format!("You have been unbanned from **{}**", guild_name),
            embeds::GREEN,
            Some(&reason),
            ctx.author(),
        ),
    )
    .await;

    exec.unban(
        guild_id,
        user_id,
        &format!("Unbanned by {}: {}", ctx.author().name, reason),
    )
    .await?;

    tracing::info!(
        guild_id = guild_id.get(),
        user_id = user_id.get(),
        moderator_id = ctx.author().id.get(),
        "User unbanned: {}",
        reason
    );

    let embed = embeds::embed(
        "User Unbanned",
        format!("{} (ID: {}) has been unbanned.", user.name, user.id),
        embeds::GREEN,
    )
    .field("Reason", reason.as_str(), false)
    .field("Moderator", mention(ctx.author().id), true);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// List banned users.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    aliases("bans"),
    required_permissions = "BAN_MEMBERS"
)]
pub async fn banlist(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let bans = exec.bans(guild_id).await?;

    if bans.is_empty() {
        ctx.say("✅ No users are currently banned.").await?;
        return Ok(());
    }

    let lines: Vec<String> = bans
        .iter()
        .take(BAN_LIST_LIMIT)
        .map(|b| {
            let reason = b.reason.as_deref().unwrap_or(NO_REASON);
            format!(
                "**{}** (ID: {})\n└ Reason: {}",
                b.user.name,
                b.user.id,
                truncate(reason, BAN_REASON_PREVIEW)
            )
        })
        .collect();

    let mut embed = embeds::embed(
        &format!("Banned Users ({})", bans.len()),
        lines.join("\n\n"),
        embeds::RED,
    );
    if bans.len() > BAN_LIST_LIMIT {
        embed = embed.field(
            "Note",
            format!("Showing {} of {} banned users.", BAN_LIST_LIMIT, bans.len()),
            false,
        );
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Show the recorded reason for one ban.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "BAN_MEMBERS"
)]
pub async fn baninfo(
    ctx: Context<'_>,
    #[description = "ID of the banned user"] user_id: String,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let Some(user_id) = parse_user_id(&user_id) else {
        ctx.say("❌ Invalid user ID.").await?;
        return Ok(());
    };
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);

    let user = match exec.user(user_id).await {
        Ok(user) => user,
        Err(ActionError::NotFound(_)) => {
            ctx.say(format!("❌ User with ID {} not found.", user_id))
                .await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let bans = exec.bans(guild_id).await?;
    let Some(entry) = bans.iter().find(|b| b.user.id == user_id) else {
        ctx.say(format!("❌ User with ID {} is not banned.", user_id))
            .await?;
        return Ok(());
    };

    let embed = serenity::CreateEmbed::new()
        .title("Ban Information")
        .color(embeds::RED)
        .field("User", format!("{} (ID: {})", user.name, user.id), false)
        .field(
            "Reason",
            entry.reason.clone().unwrap_or_else(|| NO_REASON.to_string()),
            false,
        );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Accepts a raw snowflake or a `<@id>` mention.
pub fn parse_user_id(input: &str) -> Option<serenity::UserId> {
    let trimmed = input
        .trim()
        .trim_start_matches("<@")
        .trim_start_matches('!')
        .trim_end_matches('>');
    trimmed
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(serenity::UserId::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(
            parse_user_id("123456789012345678"),
            Some(serenity::UserId::new(123456789012345678))
        );
        assert_eq!(parse_user_id("<@!42>"), Some(serenity::UserId::new(42)));
        assert_eq!(parse_user_id("<@42>"), Some(serenity::UserId::new(42)));
        assert_eq!(parse_user_id("0"), None);
        assert_eq!(parse_user_id("abc"), None);
    }
}
