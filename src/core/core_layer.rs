// The core module contains all business logic.
// Each feature gets its own submodule. Nothing in here knows about Discord.

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "automod/mod.rs"]
pub mod automod;

#[path = "anti_nuke/mod.rs"]
pub mod anti_nuke;

#[path = "warnings/warning_service.rs"]
pub mod warnings;

#[path = "afk/afk_service.rs"]
pub mod afk;

#[path = "whitelist/mod.rs"]
pub mod whitelist;

#[path = "auto_role/auto_role_service.rs"]
pub mod auto_role;

#[path = "server_logs/mod.rs"]
pub mod server_logs;

#[path = "config/bot_config.rs"]
pub mod config;
