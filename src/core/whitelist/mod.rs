pub mod whitelist_models;
pub mod whitelist_service;
pub mod whitelist_store;

pub use whitelist_models::{WhitelistData, WhitelistKind};
pub use whitelist_service::WhitelistService;
pub use whitelist_store::{StoreError, WhitelistStore};
