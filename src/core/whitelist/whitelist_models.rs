use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Users, roles and channels exempt from auto-moderation.
///
/// Serialized as `{"users": [...], "roles": [...], "channels": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitelistData {
    pub users: BTreeSet<u64>,
    pub roles: BTreeSet<u64>,
    pub channels: BTreeSet<u64>,
}

impl WhitelistData {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.roles.is_empty() && self.channels.is_empty()
    }
}

/// Which set a toggle applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistKind {
    User,
    Role,
    Channel,
}

impl WhitelistKind {
    pub fn label(self) -> &'static str {
        match self {
            WhitelistKind::User => "User",
            WhitelistKind::Role => "Role",
            WhitelistKind::Channel => "Channel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_only_when_every_set_is_empty() {
        let mut data = WhitelistData::default();
        assert!(data.is_empty());

        data.channels.insert(9);
        assert!(!data.is_empty());

        data.channels.clear();
        assert!(data.is_empty());
    }
}
