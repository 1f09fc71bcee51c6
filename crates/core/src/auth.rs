use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Back-office user on whose behalf effective permissions are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_key: Uuid,
    user_group_keys: Vec<Uuid>,
}

impl UserIdentity {
    /// Creates a user identity from its key and group memberships.
    #[must_use]
    pub fn new(user_key: Uuid, mut user_group_keys: Vec<Uuid>) -> Self {
        user_group_keys.sort_unstable();
        user_group_keys.dedup();

        Self {
            user_key,
            user_group_keys,
        }
    }

    /// Returns the stable user key.
    #[must_use]
    pub fn user_key(&self) -> Uuid {
        self.user_key
    }

    /// Returns the distinct user groups the user belongs to.
    #[must_use]
    pub fn user_group_keys(&self) -> &[Uuid] {
        self.user_group_keys.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::UserIdentity;

    #[test]
    fn user_group_keys_are_deduplicated() {
        let group = Uuid::new_v4();
        let user = UserIdentity::new(Uuid::new_v4(), vec![group, group]);
        assert_eq!(user.user_group_keys(), &[group]);
    }
}
