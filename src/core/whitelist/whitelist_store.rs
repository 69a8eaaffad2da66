use super::whitelist_models::WhitelistData;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Whole-document persistence: the whitelist is small, so every change
/// rewrites it.
#[async_trait]
pub trait WhitelistStore: Send + Sync {
    async fn load(&self) -> Result<WhitelistData, StoreError>;
    async fn save(&self, data: &WhitelistData) -> Result<(), StoreError>;
}
