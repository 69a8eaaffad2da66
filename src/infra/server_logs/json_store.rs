use crate::core::server_logs::{LogChannelStore, StoreError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::RwLock;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ServerLogsFile {
    log_channel_id: Option<u64>,
}

/// `{"log_channel_id": <id or null>}` on disk, cached in memory.
pub struct JsonLogChannelStore {
    path: PathBuf,
    cache: RwLock<ServerLogsFile>,
}

impl JsonLogChannelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = std::fs::File::open(&path)
            .ok()
            .and_then(|file| serde_json::from_reader(file).ok())
            .unwrap_or_default();

        Self {
            path,
            cache: RwLock::new(cache),
        }
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let cache = self.cache.read().await;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(&self.path)?;
        serde_json::to_writer_pretty(file, &*cache)?;
        Ok(())
    }
}

#[async_trait]
impl LogChannelStore for JsonLogChannelStore {
    async fn get_log_channel(&self) -> Result<Option<u64>, StoreError> {
        Ok(self.cache.read().await.log_channel_id)
    }

    async fn set_log_channel(&self, channel_id: Option<u64>) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        cache.log_channel_id = channel_id;
        drop(cache); // Release lock before persisting
        self.persist().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::server_logs::ServerLogsService;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_json_persistence_roundtrip() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_owned();
        drop(tmp);

        let service = ServerLogsService::new(JsonLogChannelStore::new(path.clone()));
        assert_eq!(service.log_channel().await.unwrap(), None);
        service.set_log_channel(4242).await.unwrap();

        // Reload from file
        let service2 = ServerLogsService::new(JsonLogChannelStore::new(path.clone()));
        assert_eq!(service2.log_channel().await.unwrap(), Some(4242));

        service2.clear_log_channel().await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"log_channel_id\": null"));
    }
}
