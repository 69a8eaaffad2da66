use super::whitelist_models::{WhitelistData, WhitelistKind};
use super::whitelist_store::{StoreError, WhitelistStore};
use tokio::sync::RwLock;

pub struct WhitelistService<S: WhitelistStore> {
    store: S,
    data: RwLock<WhitelistData>,
}

impl<S: WhitelistStore> WhitelistService<S> {
    /// Load the persisted whitelist once; afterwards the in-memory copy is
    /// authoritative and every toggle writes it back.
    pub async fn load(store: S) -> Result<Self, StoreError> {
        let data = store.load().await?;
        Ok(Self {
            store,
            data: RwLock::new(data),
        })
    }

    /// Flip membership. Returns true if the id is now whitelisted.
    ///
    /// A failed write rolls the in-memory change back so memory and file agree.
    pub async fn toggle(&self, kind: WhitelistKind, id: u64) -> Result<bool, StoreError> {
        let mut data = self.data.write().await;
        let set = match kind {
            WhitelistKind::User => &mut data.users,
            WhitelistKind::Role => &mut data.roles,
            WhitelistKind::Channel => &mut data.channels,
        };
        let added = if set.remove(&id) {
            false
        } else {
            set.insert(id);
            true
        };

        if let Err(e) = self.store.save(&data).await {
            let set = match kind {
                WhitelistKind::User => &mut data.users,
                WhitelistKind::Role => &mut data.roles,
                WhitelistKind::Channel => &mut data.channels,
            };
            if added {
                set.remove(&id);
            } else {
                set.insert(id);
            }
            return Err(e);
        }

        Ok(added)
    }

    pub async fn toggle_user(&self, user_id: u64) -> Result<bool, StoreError> {
        self.toggle(WhitelistKind::User, user_id).await
    }

    pub async fn toggle_role(&self, role_id: u64) -> Result<bool, StoreError> {
        self.toggle(WhitelistKind::Role, role_id).await
    }

    pub async fn toggle_channel(&self, channel_id: u64) -> Result<bool, StoreError> {
        self.toggle(WhitelistKind::Channel, channel_id).await
    }

    pub async fn is_immune(&self, user_id: u64, role_ids: &[u64], channel_id: u64) -> bool {
        let data = self.data.read().await;
        data.users.contains(&user_id)
            || data.channels.contains(&channel_id)
            || role_ids.iter().any(|r| data.roles.contains(r))
    }

    pub async fn snapshot(&self) -> WhitelistData {
        self.data.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct MemoryStore {
        saves: AtomicUsize,
        fail: AtomicBool,
    }

    #[async_trait]
    impl WhitelistStore for MemoryStore {
        async fn load(&self) -> Result<WhitelistData, StoreError> {
            let mut data = WhitelistData::default();
            data.roles.insert(50);
            Ok(data)
        }

        async fn save(&self, _data: &WhitelistData) -> Result<(), StoreError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_toggle_adds_then_removes() {
        let service = WhitelistService::load(MemoryStore::default()).await.unwrap();
        assert!(service.toggle_user(7).await.unwrap());
        assert!(service.is_immune(7, &[], 1).await);

        assert!(!service.toggle_user(7).await.unwrap());
        assert!(!service.is_immune(7, &[], 1).await);
        assert_eq!(service.store.saves.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_immunity_by_role_or_channel() {
        let service = WhitelistService::load(MemoryStore::default()).await.unwrap();
        // Role 50 comes from the loaded data.
        assert!(service.is_immune(1, &[3, 50], 1).await);
        assert!(!service.is_immune(1, &[3], 1).await);

        service.toggle_channel(99).await.unwrap();
        assert!(service.is_immune(1, &[], 99).await);
    }

    #[tokio::test]
    async fn test_failed_save_rolls_back() {
        let service = WhitelistService::load(MemoryStore::default()).await.unwrap();
        service.store.fail.store(true, Ordering::SeqCst);

        assert!(service.toggle_role(60).await.is_err());
        assert!(service.toggle_role(50).await.is_err());

        let snapshot = service.snapshot().await;
        assert!(!snapshot.roles.contains(&60));
        assert!(snapshot.roles.contains(&50));
    }
}
