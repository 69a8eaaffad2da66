// Auto-moderation immunity for users, roles and channels.

use crate::core::whitelist::WhitelistKind;
use crate::discord::actions::embeds;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Toggle auto-moderation immunity for a user, role or channel.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn whitelist(
    ctx: Context<'_>,
    #[description = "User to whitelist or unwhitelist"] user: Option<serenity::User>,
    #[description = "Role to whitelist or unwhitelist"] role: Option<serenity::Role>,
    #[description = "Channel to whitelist or unwhitelist"]
    #[channel_types("Text")]
    channel: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    // One target per call; user wins over role, role over channel.
    let whitelist = &ctx.data().whitelist;
    let (kind, id, label, added) = if let Some(user) = &user {
        let added = whitelist.toggle_user(user.id.get()).await?;
        (WhitelistKind::User, user.id.get(), format!("<@{}>", user.id), added)
    } else if let Some(role) = &role {
        let added = whitelist.toggle_role(role.id.get()).await?;
        let label = format!("Role **{}**", role.name);
        (WhitelistKind::Role, role.id.get(), label, added)
    } else if let Some(channel) = &channel {
        let added = whitelist.toggle_channel(channel.id.get()).await?;
        let label = format!("Channel <#{}>", channel.id);
        (WhitelistKind::Channel, channel.id.get(), label, added)
    } else {
        ctx.send(
            poise::CreateReply::default()
                .content("⚠️ Please specify a user, role, or channel.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    };

    tracing::info!(
        moderator_id = ctx.author().id.get(),
        target_id = id,
        added,
        "Whitelist toggled for {}",
        kind.label()
    );

    let (description, colour) = if added {
        (format!("{} added to automod whitelist.", label), embeds::GREEN)
    } else {
        (format!("{} removed from automod whitelist.", label), embeds::RED)
    };
    ctx.send(
        poise::CreateReply::default()
            .embed(embeds::embed("Whitelist Updated", description, colour))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Show everything that is immune to auto-moderation.
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn whitelist_status(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data().whitelist.snapshot().await;
    if data.is_empty() {
        ctx.send(
            poise::CreateReply::default()
                .content("The automod whitelist is empty.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let list = |ids: Vec<String>| {
        if ids.is_empty() {
            "None".to_string()
        } else {
            ids.join("\n")
        }
    };

    let embed = serenity::CreateEmbed::new()
        .title("🛡️ Automod Whitelist Status")
        .color(embeds::BLURPLE)
        .field(
            "Users",
            list(data.users.iter().map(|id| format!("<@{}>", id)).collect()),
            false,
        )
        .field(
            "Roles",
            list(data.roles.iter().map(|id| format!("<@&{}>", id)).collect()),
            false,
        )
        .field(
            "Channels",
            list(data.channels.iter().map(|id| format!("<#{}>", id)).collect()),
            false,
        );

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}
