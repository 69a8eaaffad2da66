// Bot owner tools.

use crate::discord::actions::embeds;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Re-register every slash command globally.
#[poise::command(prefix_command, slash_command, owners_only, hide_in_help)]
pub async fn sync(ctx: Context<'_>) -> Result<(), Error> {
    let commands = &ctx.framework().options().commands;
    poise::builtins::register_globally(ctx.http(), commands).await?;

    let synced = commands.iter().filter(|c| c.slash_action.is_some()).count();
    tracing::info!(
        owner_id = ctx.author().id.get(),
        synced,
        "Slash commands synced globally"
    );

    let embed = embeds::embed(
        "Slash Command Sync",
        format!("Successfully synced **{}** slash commands globally.", synced),
        embeds::BLUE,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Choose where server join and leave events are logged. Without a channel,
/// logging is turned off.
#[poise::command(prefix_command, slash_command, owners_only, guild_only, hide_in_help)]
pub async fn server_logs(
    ctx: Context<'_>,
    #[description = "Channel for join/leave logs (omit to disable)"]
    #[channel_types("Text")]
    channel: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    let Some(channel) = channel else {
        ctx.data().server_logs.clear_log_channel().await?;
        tracing::info!(owner_id = ctx.author().id.get(), "Server log channel cleared");
        ctx.say("✅ Server join/leave logging disabled.").await?;
        return Ok(());
    };

    ctx.data().server_logs.set_log_channel(channel.id.get()).await?;
    tracing::info!(
        owner_id = ctx.author().id.get(),
        channel_id = channel.id.get(),
        "Server log channel set"
    );

    let embed = embeds::embed(
        "Server Logs Configured",
        format!(
            "Server join/leave events will now be logged to <#{}>.",
            channel.id
        ),
        embeds::PURPLE,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
