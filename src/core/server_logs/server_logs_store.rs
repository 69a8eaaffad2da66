use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait LogChannelStore: Send + Sync {
    async fn get_log_channel(&self) -> Result<Option<u64>, StoreError>;
    async fn set_log_channel(&self, channel_id: Option<u64>) -> Result<(), StoreError>;
}
