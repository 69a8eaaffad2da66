// This is the entry point of the moderation bot.
//
// **Architecture Overview:**
// - `core/` = Moderation logic (platform-agnostic)
// - `infra/` = Implementations of core traits (JSON files on disk)
// - `discord/` = Discord-specific adapters (commands, events, outbound actions)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::afk::AfkService;
use crate::core::anti_nuke::AntiNukeService;
use crate::core::auto_role::AutoRoleService;
use crate::core::automod::{AutoModConfig, AutoModService};
use crate::core::config::BotConfig;
use crate::core::moderation::{ModerationState, RetryPolicy};
use crate::core::server_logs::ServerLogsService;
use crate::core::warnings::{WarningPolicy, WarningService};
use crate::core::whitelist::WhitelistService;
use crate::discord::events::guild_events;
use crate::discord::{Data, Error};
use crate::infra::server_logs::JsonLogChannelStore;
use crate::infra::whitelist::JsonWhitelistStore;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Event handler for non-command Discord events.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            // Auto-moderation and AFK are independent; a removed message still
            // counts as the author being back.
            if let Err(e) =
                discord::automod::handle_message_for_automod(ctx, new_message, data).await
            {
                tracing::error!("Error running auto-moderation: {}", e);
            }
            if let Err(e) = discord::afk::handle_message_for_afk(ctx, new_message, data).await {
                tracing::error!("Error handling AFK message: {}", e);
            }
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            if let Err(e) = guild_events::handle_member_join(ctx, data, new_member).await {
                tracing::error!("Error handling member join: {}", e);
            }
        }
        serenity::FullEvent::GuildBanAddition {
            guild_id,
            banned_user,
        } => {
            if let Err(e) =
                discord::anti_nuke::handle_ban(ctx, data, *guild_id, banned_user).await
            {
                tracing::error!("Error handling ban event: {}", e);
            }
        }
        serenity::FullEvent::ChannelDelete { channel, .. } => {
            if let Err(e) = discord::anti_nuke::handle_channel_delete(ctx, data, channel).await {
                tracing::error!("Error handling channel delete: {}", e);
            }
        }
        serenity::FullEvent::ChannelCreate { channel } => {
            if let Err(e) = guild_events::handle_channel_create(ctx, data, channel).await {
                tracing::error!("Error handling channel create: {}", e);
            }
        }
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            if let Err(e) = guild_events::handle_guild_create(ctx, data, guild, *is_new).await {
                tracing::error!("Error logging guild join: {}", e);
            }
        }
        serenity::FullEvent::GuildDelete { incomplete, full } => {
            if let Err(e) =
                guild_events::handle_guild_delete(ctx, data, incomplete, full.as_ref()).await
            {
                tracing::error!("Error logging guild removal: {}", e);
            }
        }

        _ => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = BotConfig::from_env().context("Failed to load configuration")?;

    // Keep runtime files in a dedicated folder so the repo root stays tidy.
    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "Failed to create data directory {}",
            config.data_dir.display()
        )
    })?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    // One state object shared by every detector; nothing in it survives a restart.
    let state = Arc::new(ModerationState::new());

    let automod_service = Arc::new(AutoModService::new(
        Arc::clone(&state),
        AutoModConfig::default(),
        config.bad_words.clone(),
    ));
    let anti_nuke_service = Arc::new(AntiNukeService::new(Arc::clone(&state)));
    let warning_service = Arc::new(WarningService::new(
        Arc::clone(&state),
        WarningPolicy::with_max_warnings(config.max_warnings),
    ));
    let afk_service = Arc::new(AfkService::new(Arc::clone(&state)));

    let whitelist_store = JsonWhitelistStore::new(config.whitelist_path());
    let whitelist_service = Arc::new(
        WhitelistService::load(whitelist_store)
            .await
            .context("Failed to load the automod whitelist")?,
    );

    let server_logs_store = JsonLogChannelStore::new(config.server_logs_path());
    let server_logs_service = Arc::new(ServerLogsService::new(server_logs_store));

    let owners = config
        .owner_ids
        .iter()
        .map(|id| serenity::UserId::new(*id))
        .collect();
    let prefix = config.prefix.clone();
    let token = config.token.clone();

    // Create the data structure that will be shared across all commands
    let data = Data {
        config: Arc::new(config),
        retry: RetryPolicy::default(),
        automod: automod_service,
        anti_nuke: anti_nuke_service,
        warnings: warning_service,
        afk: afk_service,
        whitelist: whitelist_service,
        auto_role: Arc::new(AutoRoleService::new()),
        server_logs: server_logs_service,
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================
    // Configure the poise framework with our commands and settings.

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MODERATION;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: discord::commands::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                case_insensitive_commands: true,
                ..Default::default()
            },
            owners,
            on_error: |error| Box::pin(discord::events::on_error(error)),
            // Event handler for messages and other events
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            pre_command: |ctx| {
                Box::pin(async move {
                    tracing::debug!(
                        command = %ctx.command().qualified_name,
                        user_id = ctx.author().id.get(),
                        "Running command"
                    );
                })
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("Logged in as {}", ready.user.name);

                // Register slash commands globally (can take up to an hour to propagate)
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!(
                    guilds = ready.guilds.len(),
                    "Commands registered, bot is ready"
                );

                Ok(data)
            })
        })
        .build();

    // Create the client and start the bot
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;
    Ok(())
}
