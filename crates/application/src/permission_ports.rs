use std::collections::BTreeSet;

use async_trait::async_trait;
use grantmap_core::{AppResult, UserIdentity};
use grantmap_domain::RawGrant;
use uuid::Uuid;

/// Entity key paired with its hierarchy path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPathEntry {
    /// Entity key.
    pub key: Uuid,
    /// Comma-separated ancestor path, root first, ending with the entity itself.
    pub path: String,
}

/// Effective verbs for a user at one hierarchy path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectivePermissionSet {
    /// Verbs in effect after folding in ancestor grants.
    pub verbs: BTreeSet<String>,
}

/// Granular permission row owned by a user group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserGroupGranularPermission {
    /// Owning user group.
    pub user_group_key: Uuid,
    /// Stored context tag.
    pub context: String,
    /// Entity the grant applies to, if any.
    pub key: Option<Uuid>,
    /// Stored permission value.
    pub permission: String,
}

impl UserGroupGranularPermission {
    /// Returns the context-free grant carried by this row.
    #[must_use]
    pub fn raw_grant(&self) -> RawGrant {
        RawGrant {
            key: self.key,
            permission: self.permission.clone(),
        }
    }
}

/// Lookup port resolving entity keys to hierarchy paths.
#[async_trait]
pub trait EntityLookup: Send + Sync {
    /// Returns path entries for the keys that exist, in one batched call.
    async fn get_all(&self, keys: &[Uuid]) -> AppResult<Vec<EntityPathEntry>>;
}

/// Resolver port computing effective permissions along a hierarchy path.
#[async_trait]
pub trait PermissionResolver: Send + Sync {
    /// Resolves the verbs in effect for the user at the path.
    async fn effective_permissions(
        &self,
        user: &UserIdentity,
        path: &str,
    ) -> AppResult<EffectivePermissionSet>;
}

/// Repository port for stored granular permission rows.
#[async_trait]
pub trait GranularPermissionRepository: Send + Sync {
    /// Lists all rows owned by any of the user groups.
    async fn list_for_user_groups(
        &self,
        user_group_keys: &[Uuid],
    ) -> AppResult<Vec<UserGroupGranularPermission>>;

    /// Replaces every row owned by the user group.
    async fn replace_for_user_group(
        &self,
        user_group_key: Uuid,
        permissions: Vec<UserGroupGranularPermission>,
    ) -> AppResult<()>;
}
