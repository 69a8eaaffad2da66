// Anti-nuke toggle and status.

use super::{parse_toggle, INVALID_TOGGLE};
use crate::core::anti_nuke::anti_nuke_service::{BAN_THRESHOLD, CHANNEL_DELETION_THRESHOLD};
use crate::discord::actions::embeds;
use crate::discord::{Context, Error};
use chrono::Utc;
use poise::serenity_prelude as serenity;

/// Turn anti-nuke alerts on or off, or show the current state.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn antinuke(
    ctx: Context<'_>,
    #[description = "on or off"] status: Option<String>,
) -> Result<(), Error> {
    let service = &ctx.data().anti_nuke;

    let Some(status) = status else {
        let state = if service.is_enabled() {
            "enabled"
        } else {
            "disabled"
        };
        ctx.say(format!("Anti-nuke protection is currently **{}**.", state))
            .await?;
        return Ok(());
    };

    match parse_toggle(&status) {
        Some(true) => {
            service.set_enabled(true);
            tracing::info!(moderator_id = ctx.author().id.get(), "Anti-nuke enabled");
            ctx.say("✅ Anti-nuke protection **enabled**.").await?;
        }
        Some(false) => {
            service.set_enabled(false);
            tracing::info!(moderator_id = ctx.author().id.get(), "Anti-nuke disabled");
            ctx.say("❌ Anti-nuke protection **disabled**.").await?;
        }
        None => {
            ctx.say(INVALID_TOGGLE).await?;
        }
    }
    Ok(())
}

/// Show anti-nuke state and activity in the last minute.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD"
)]
pub async fn nukestatus(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let status = ctx.data().anti_nuke.status(guild_id.get(), Utc::now());

    let embed = status_embed(status.enabled, status.recent_deletions, status.recent_bans);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn status_embed(
    enabled: bool,
    recent_deletions: usize,
    recent_bans: usize,
) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Anti-Nuke Status")
        .color(embeds::BLUE)
        .field(
            "Protection Status",
            if enabled { "✅ Enabled" } else { "❌ Disabled" },
            true,
        )
        .field(
            "Recent Deletions (1min)",
            format!("{}/{}", recent_deletions, CHANNEL_DELETION_THRESHOLD),
            true,
        )
        .field(
            "Recent Bans (1min)",
            format!("{}/{}", recent_bans, BAN_THRESHOLD),
            true,
        )
}
