use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use grantmap_application::{EffectivePermissionSet, PermissionResolver};
use grantmap_core::{AppResult, UserIdentity};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[cfg(test)]
mod tests;

#[derive(Debug, Default)]
struct UserGroupPathPermissions {
    default_verbs: BTreeSet<String>,
    node_verbs: HashMap<String, BTreeSet<String>>,
}

/// In-memory resolver folding ancestor grants into effective permissions.
///
/// Paths are comma-separated node ids, root first. Per user group the deepest
/// node with an explicit grant wins, otherwise the group defaults apply. An
/// explicit grant with no verbs still counts as explicit. The result is the
/// union over the user's groups.
#[derive(Debug, Default)]
pub struct InMemoryPathPermissionResolver {
    user_groups: RwLock<HashMap<Uuid, UserGroupPathPermissions>>,
}

impl InMemoryPathPermissionResolver {
    /// Creates a resolver without any user groups.
    #[must_use]
    pub fn new() -> Self {
        Self {
            user_groups: RwLock::new(HashMap::new()),
        }
    }

    /// Sets the verbs a user group holds wherever no explicit grant applies.
    pub async fn set_default_verbs<I, V>(&self, user_group_key: Uuid, verbs: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.user_groups
            .write()
            .await
            .entry(user_group_key)
            .or_default()
            .default_verbs = verbs.into_iter().map(Into::into).collect();
    }

    /// Sets the explicit verbs a user group holds on one node.
    pub async fn grant_node_verbs<I, V>(
        &self,
        user_group_key: Uuid,
        node_id: impl Into<String>,
        verbs: I,
    ) where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.user_groups
            .write()
            .await
            .entry(user_group_key)
            .or_default()
            .node_verbs
            .insert(node_id.into(), verbs.into_iter().map(Into::into).collect());
    }
}

#[async_trait]
impl PermissionResolver for InMemoryPathPermissionResolver {
    async fn effective_permissions(
        &self,
        user: &UserIdentity,
        path: &str,
    ) -> AppResult<EffectivePermissionSet> {
        let node_ids = node_ids_deepest_first(path);
        if node_ids.is_empty() {
            return Ok(EffectivePermissionSet::default());
        }

        let user_groups = self.user_groups.read().await;
        let mut verbs = BTreeSet::new();

        for user_group_key in user.user_group_keys() {
            let Some(group) = user_groups.get(user_group_key) else {
                continue;
            };

            let resolved = node_ids
                .iter()
                .find_map(|node_id| group.node_verbs.get(*node_id))
                .unwrap_or(&group.default_verbs);
            verbs.extend(resolved.iter().cloned());
        }

        debug!(
            user_key = %user.user_key(),
            path,
            verb_count = verbs.len(),
            "resolved effective permissions"
        );

        Ok(EffectivePermissionSet { verbs })
    }
}

fn node_ids_deepest_first(path: &str) -> Vec<&str> {
    path.split(',')
        .map(str::trim)
        .filter(|node_id| !node_id.is_empty())
        .rev()
        .collect()
}
