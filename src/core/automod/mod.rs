pub mod automod_models;
pub mod automod_service;

pub use automod_models::{AutoModConfig, MessageSnapshot, RecentMessage, Violation};
pub use automod_service::AutoModService;
