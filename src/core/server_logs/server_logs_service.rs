use super::server_logs_store::{LogChannelStore, StoreError};

pub struct ServerLogsService<S: LogChannelStore> {
    store: S,
}

impl<S: LogChannelStore> ServerLogsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn log_channel(&self) -> Result<Option<u64>, StoreError> {
        self.store.get_log_channel().await
    }

    pub async fn set_log_channel(&self, channel_id: u64) -> Result<(), StoreError> {
        self.store.set_log_channel(Some(channel_id)).await
    }

    pub async fn clear_log_channel(&self) -> Result<(), StoreError> {
        self.store.set_log_channel(None).await
    }
}
