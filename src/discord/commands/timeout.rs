// Native Discord timeouts.

use crate::core::moderation::duration::{format_duration, parse_duration_secs, MAX_TIMEOUT_SECS};
use crate::discord::actions::embeds::{self, mention, NO_REASON};
use crate::discord::actions::permissions::ensure_can_target;
use crate::discord::actions::ActionExecutor;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

const TIMEOUT_LIST_LIMIT: usize = 10;

/// Check a duration argument, returning seconds or the message to show.
pub fn validate_timeout(input: &str) -> Result<u64, &'static str> {
    let secs = parse_duration_secs(input)
        .ok_or("❌ Invalid duration format. Use formats like: `10m`, `1h`, `30s`, `2d`")?;
    if secs == 0 {
        return Err("❌ Timeout duration must be at least 1 second.");
    }
    if secs > MAX_TIMEOUT_SECS {
        return Err("❌ Timeout duration cannot exceed 28 days.");
    }
    Ok(secs)
}

/// Unix time the member's timeout ends, if it is still running.
pub fn active_timeout(member: &serenity::Member) -> Option<i64> {
    let until = member.communication_disabled_until?.unix_timestamp();
    (until > serenity::Timestamp::now().unix_timestamp()).then_some(until)
}

/// Time a member out for up to 28 days.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MODERATE_MEMBERS"
)]
pub async fn timeout(
    ctx: Context<'_>,
    #[description = "Member to time out"] member: serenity::Member,
    #[description = "Duration, e.g. 10m, 1h, 2d"] duration: String,
    #[description = "Reason for the timeout"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let actors = ensure_can_target(
        ctx,
        &exec,
        "timeout",
        &member,
        serenity::Permissions::MODERATE_MEMBERS,
        false,
    )
    .await?;

    let secs = match validate_timeout(&duration) {
        Ok(secs) => secs,
        Err(message) => {
            ctx.say(message).await?;
            return Ok(());
        }
    };
    if active_timeout(&member).is_some() {
        ctx.say(format!("❌ {} is already timed out.", mention(member.user.id)))
            .await?;
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| NO_REASON.to_string());
    let ends_at = serenity::Timestamp::now().unix_timestamp() + secs as i64;
    let until = serenity::Timestamp::from_unix_timestamp(ends_at)
        .map_err(|e| format!("Invalid timeout end: {}", e))?;
    let duration_text = format_duration(secs);

    exec.dm_best_effort(
        member.user.id,
        embeds::dm_embed(
            "⏱️ You have been timed out",
            format!("You have been timed out in **{}**", actors.guild.name),
            embeds::ORANGE,
            Some(&reason),
            ctx.author(),
        )
        .field("Duration", duration_text.as_str(), true)
        .field("Timeout ends", format!("<t:{}:F>", ends_at), false),
    )
    .await;

    exec.timeout(
        actors.guild.id,
        member.user.id,
        until,
        &format!("Timed out by {}: {}", ctx.author().name, reason),
    )
    .await?;

    tracing::info!(
        guild_id = actors.guild.id.get(),
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        secs,
        "Member timed out: {}",
        reason
    );

    let embed = embeds::embed(
        "User Timed Out",
        format!(
            "{} has been timed out for {}.",
            mention(member.user.id),
            duration_text
        ),
        embeds::ORANGE,
    )
    .field("Reason", reason.as_str(), false)
    .field("Moderator", mention(ctx.author().id), true)
    .field("Timeout ends", format!("<t:{}:R>", ends_at), true);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Lift a member's timeout.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    aliases("removetimeout"),
    required_permissions = "MODERATE_MEMBERS"
)]
pub async fn untimeout(
    ctx: Context<'_>,
    #[description = "Member to release"] member: serenity::Member,
) -> Result<(), Error> {
    if active_timeout(&member).is_none() {
        ctx.say(format!("❌ {} is not timed out.", mention(member.user.id)))
            .await?;
        return Ok(());
    }

    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let actors = ensure_can_target(
        ctx,
        &exec,
        "untimeout",
        &member,
        serenity::Permissions::MODERATE_MEMBERS,
        false,
    )
    .await?;

    exec.remove_timeout(
        actors.guild.id,
        member.user.id,
        &format!("Timeout removed by {}", ctx.author().name),
    )
    .await?;

    exec.dm_best_effort(
        member.user.id,
        embeds::dm_embed(
            "⏱️ Timeout Removed",
            format!("Your timeout has been removed in **{}**", actors.guild.name),
            embeds::GREEN,
            None,
            ctx.author(),
        ),
    )
    .await;

    tracing::info!(
        guild_id = actors.guild.id.get(),
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        "Timeout removed"
    );

    let embed = embeds::embed(
        "Timeout Removed",
        format!("Timeout has been removed from {}.", mention(member.user.id)),
        embeds::GREEN,
    )
    .field("Moderator", mention(ctx.author().id), true);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// List members who are currently timed out.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MODERATE_MEMBERS"
)]
pub async fn timeouts(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let members = exec.members(guild_id).await?;

    let timed_out: Vec<(serenity::UserId, i64)> = members
        .iter()
        .filter_map(|m| active_timeout(m).map(|until| (m.user.id, until)))
        .collect();

    if timed_out.is_empty() {
        ctx.say("✅ No users are currently timed out.").await?;
        return Ok(());
    }

    let lines: Vec<String> = timed_out
        .iter()
        .take(TIMEOUT_LIST_LIMIT)
        .map(|(user_id, until)| format!("{} - Ends <t:{}:R>", mention(*user_id), until))
        .collect();

    let mut embed = embeds::embed("Timed Out Users", lines.join("\n"), embeds::ORANGE);
    if timed_out.len() > TIMEOUT_LIST_LIMIT {
        embed = embed.field(
            "Note",
            format!(
                "Showing {} of {} timed out users.",
                TIMEOUT_LIST_LIMIT,
                timed_out.len()
            ),
            false,
        );
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Show when a member's timeout ends.
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn timeoutinfo(
    ctx: Context<'_>,
    #[description = "Member to check (defaults to you)"] member: Option<serenity::Member>,
) -> Result<(), Error> {
    let member = match member {
        Some(member) => member,
        None => {
            let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
            ActionExecutor::new(ctx.http(), &ctx.data().retry)
                .member(guild_id, ctx.author().id)
                .await?
        }
    };

    let Some(until) = active_timeout(&member) else {
        ctx.say(format!(
            "{} is not currently timed out.",
            mention(member.user.id)
        ))
        .await?;
        return Ok(());
    };

    let embed = embeds::embed(
        "Timeout Information",
        format!("**User:** {}", mention(member.user.id)),
        embeds::ORANGE,
    )
    .field(
        "Timeout ends",
        format!("<t:{}:F>\n(<t:{}:R>)", until, until),
        false,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_timeout_bounds() {
        assert_eq!(validate_timeout("10m"), Ok(600));
        assert_eq!(validate_timeout("28d"), Ok(MAX_TIMEOUT_SECS));
        assert_eq!(
            validate_timeout("29d"),
            Err("❌ Timeout duration cannot exceed 28 days.")
        );
        assert_eq!(
            validate_timeout("0s"),
            Err("❌ Timeout duration must be at least 1 second.")
        );
        assert!(validate_timeout("soon").is_err());
    }
}
