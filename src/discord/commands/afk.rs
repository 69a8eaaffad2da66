// AFK commands.

use crate::core::afk::format_elapsed_short;
use crate::discord::actions::embeds::{self, mention};
use crate::discord::actions::permissions::retain_guild_members;
use crate::discord::{Context, Error};
use chrono::Utc;
use poise::serenity_prelude as serenity;

const AFK_LIST_LIMIT: usize = 10;

/// Set yourself as AFK.
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn afk(
    ctx: Context<'_>,
    #[description = "Why you are away"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let user_id = ctx.author().id.get();
    let entry = ctx.data().afk.set(user_id, reason.as_deref(), Utc::now());
    tracing::info!(user_id, reason = %entry.reason, "User set AFK");

    let embed = embeds::embed(
        "AFK Status Set",
        format!("{} is now AFK: {}", mention(user_id), entry.reason),
        embeds::YELLOW,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Show who is AFK in this server.
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn afklist(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let entries = ctx.data().afk.list();
    let here = retain_guild_members(ctx, guild_id, entries.iter().map(|e| e.user_id));
    let now = Utc::now();

    let lines: Vec<String> = entries
        .iter()
        .filter(|e| here.contains(&e.user_id))
        .take(AFK_LIST_LIMIT)
        .map(|e| {
            let elapsed = now
                .signed_duration_since(e.set_at)
                .to_std()
                .unwrap_or_default();
            format!(
                "{} - {} ({})",
                mention(e.user_id),
                e.reason,
                format_elapsed_short(elapsed)
            )
        })
        .collect();

    if lines.is_empty() {
        ctx.say("✅ No users are currently AFK.").await?;
        return Ok(());
    }

    let embed = embeds::embed("AFK Users", lines.join("\n"), embeds::BLUE);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Clear another member's AFK status.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn afkremove(
    ctx: Context<'_>,
    #[description = "Member to clear"] member: serenity::Member,
) -> Result<(), Error> {
    let user_id = member.user.id.get();
    match ctx.data().afk.remove(user_id) {
        Some(_) => {
            tracing::info!(
                user_id,
                moderator_id = ctx.author().id.get(),
                "AFK status removed"
            );
            ctx.say(format!("✅ Removed AFK status from {}.", mention(user_id)))
                .await?;
        }
        None => {
            ctx.say(format!("❌ {} is not AFK.", mention(user_id)))
                .await?;
        }
    }
    Ok(())
}
