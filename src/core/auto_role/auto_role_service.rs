// Per-guild auto-role configuration. In memory only; a restart forgets it.

use dashmap::DashMap;

#[derive(Default)]
pub struct AutoRoleService {
    roles: DashMap<u64, u64>,
}

impl AutoRoleService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previously configured role, if any.
    pub fn set(&self, guild_id: u64, role_id: u64) -> Option<u64> {
        self.roles.insert(guild_id, role_id)
    }

    pub fn remove(&self, guild_id: u64) -> Option<u64> {
        self.roles.remove(&guild_id).map(|(_, role)| role)
    }

    pub fn role_for(&self, guild_id: u64) -> Option<u64> {
        self.roles.get(&guild_id).map(|r| *r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replace_remove() {
        let service = AutoRoleService::new();
        assert_eq!(service.set(1, 10), None);
        assert_eq!(service.set(1, 11), Some(10));
        assert_eq!(service.role_for(1), Some(11));
        assert_eq!(service.role_for(2), None);

        assert_eq!(service.remove(1), Some(11));
        assert_eq!(service.remove(1), None);
        assert_eq!(service.role_for(1), None);
    }
}
