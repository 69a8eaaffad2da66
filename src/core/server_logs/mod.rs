pub mod server_logs_models;
pub mod server_logs_service;
pub mod server_logs_store;

pub use server_logs_models::{GuildLogEntry, GuildLogEvent};
pub use server_logs_service::ServerLogsService;
pub use server_logs_store::{LogChannelStore, StoreError};
