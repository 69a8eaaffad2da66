// Auto-moderation toggle and bad word list.

use super::{parse_toggle, INVALID_TOGGLE};
use crate::discord::{Context, Error};

/// Turn auto-moderation on or off, or show the current state.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn automod(
    ctx: Context<'_>,
    #[description = "on or off"] status: Option<String>,
) -> Result<(), Error> {
    let service = &ctx.data().automod;

    let Some(status) = status else {
        let state = if service.is_enabled() {
            "enabled"
        } else {
            "disabled"
        };
        let filtered = service.bad_words().await.len();
        ctx.say(format!(
            "Auto-moderation is currently **{}** ({} filtered words).",
            state, filtered
        ))
        .await?;
        return Ok(());
    };

    match parse_toggle(&status) {
        Some(enabled) => {
            service.set_enabled(enabled);
            tracing::info!(
                moderator_id = ctx.author().id.get(),
                enabled,
                "Auto-moderation toggled"
            );
            if enabled {
                ctx.say("✅ Auto-moderation **enabled**.").await?;
            } else {
                ctx.say("❌ Auto-moderation **disabled**.").await?;
            }
        }
        None => {
            ctx.say(INVALID_TOGGLE).await?;
        }
    }
    Ok(())
}

/// Add a word to the filter.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn addbadword(
    ctx: Context<'_>,
    #[description = "Word to filter"] word: String,
) -> Result<(), Error> {
    let word = word.trim().to_lowercase();
    if ctx.data().automod.add_bad_word(&word).await {
        tracing::info!(moderator_id = ctx.author().id.get(), "Bad word added");
        ctx.say(format!("✅ Added `{}` to the bad words filter.", word))
            .await?;
    } else {
        ctx.say(format!("❌ `{}` is already in the filter.", word))
            .await?;
    }
    Ok(())
}

/// Remove a word from the filter.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn removebadword(
    ctx: Context<'_>,
    #[description = "Word to stop filtering"] word: String,
) -> Result<(), Error> {
    let word = word.trim().to_lowercase();
    if ctx.data().automod.remove_bad_word(&word).await {
        tracing::info!(moderator_id = ctx.author().id.get(), "Bad word removed");
        ctx.say(format!("✅ Removed `{}` from the bad words filter.", word))
            .await?;
    } else {
        ctx.say(format!("❌ `{}` is not in the filter.", word))
            .await?;
    }
    Ok(())
}
