use crate::core::whitelist::{StoreError, WhitelistData, WhitelistStore};
use async_trait::async_trait;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// The whitelist as one JSON document, rewritten on every change.
pub struct JsonWhitelistStore {
    path: PathBuf,
}

impl JsonWhitelistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WhitelistStore for JsonWhitelistStore {
    async fn load(&self) -> Result<WhitelistData, StoreError> {
        if !self.path.exists() {
            return Ok(WhitelistData::default());
        }
        let file = File::open(&self.path)?;
        match serde_json::from_reader(BufReader::new(file)) {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::warn!(
                    "Whitelist file {} is unreadable, starting empty: {}",
                    self.path.display(),
                    e
                );
                Ok(WhitelistData::default())
            }
        }
    }

    async fn save(&self, data: &WhitelistData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(file, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::whitelist::WhitelistService;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonWhitelistStore::new(dir.path().join("whitelist.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_persistence_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("whitelist.json");

        let service = WhitelistService::load(JsonWhitelistStore::new(path.clone()))
            .await
            .unwrap();
        service.toggle_user(11).await.unwrap();
        service.toggle_role(22).await.unwrap();
        service.toggle_channel(33).await.unwrap();

        // Reload from file
        let reloaded = WhitelistService::load(JsonWhitelistStore::new(path.clone()))
            .await
            .unwrap();
        assert_eq!(reloaded.snapshot().await, service.snapshot().await);
        assert!(reloaded.is_immune(11, &[], 0).await);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["users"], serde_json::json!([11]));
        assert_eq!(raw["roles"], serde_json::json!([22]));
        assert_eq!(raw["channels"], serde_json::json!([33]));
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("whitelist.json");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonWhitelistStore::new(path);
        assert!(store.load().await.unwrap().is_empty());
    }
}
