// Discord layer - commands, event handlers and the outbound action executor.

use crate::core::afk::AfkService;
use crate::core::anti_nuke::AntiNukeService;
use crate::core::auto_role::AutoRoleService;
use crate::core::automod::AutoModService;
use crate::core::config::BotConfig;
use crate::core::moderation::RetryPolicy;
use crate::core::server_logs::ServerLogsService;
use crate::core::warnings::WarningService;
use crate::core::whitelist::WhitelistService;
use crate::infra::server_logs::JsonLogChannelStore;
use crate::infra::whitelist::JsonWhitelistStore;
use std::sync::Arc;

#[path = "actions/mod.rs"]
pub mod actions;

#[path = "afk/afk_handler.rs"]
pub mod afk;

#[path = "anti_nuke/anti_nuke_events.rs"]
pub mod anti_nuke;

#[path = "automod/automod_handler.rs"]
pub mod automod;

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "events/mod.rs"]
pub mod events;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared across every command and event handler.
pub struct Data {
    pub config: Arc<BotConfig>,
    pub retry: RetryPolicy,
    pub automod: Arc<AutoModService>,
    pub anti_nuke: Arc<AntiNukeService>,
    pub warnings: Arc<WarningService>,
    pub afk: Arc<AfkService>,
    pub whitelist: Arc<WhitelistService<JsonWhitelistStore>>,
    pub auto_role: Arc<AutoRoleService>,
    pub server_logs: Arc<ServerLogsService<JsonLogChannelStore>>,
}
