use std::collections::HashMap;

use async_trait::async_trait;
use grantmap_application::{GranularPermissionRepository, UserGroupGranularPermission};
use grantmap_core::{AppError, AppResult};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory granular permission row store keyed by user group.
#[derive(Debug, Default)]
pub struct InMemoryGranularPermissionRepository {
    rows: RwLock<HashMap<Uuid, Vec<UserGroupGranularPermission>>>,
}

impl InMemoryGranularPermissionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl GranularPermissionRepository for InMemoryGranularPermissionRepository {
    async fn list_for_user_groups(
        &self,
        user_group_keys: &[Uuid],
    ) -> AppResult<Vec<UserGroupGranularPermission>> {
        let rows = self.rows.read().await;

        Ok(user_group_keys
            .iter()
            .filter_map(|user_group_key| rows.get(user_group_key))
            .flatten()
            .cloned()
            .collect())
    }

    async fn replace_for_user_group(
        &self,
        user_group_key: Uuid,
        permissions: Vec<UserGroupGranularPermission>,
    ) -> AppResult<()> {
        if let Some(foreign) = permissions
            .iter()
            .find(|permission| permission.user_group_key != user_group_key)
        {
            return Err(AppError::Validation(format!(
                "row for user group '{}' cannot be stored under user group '{user_group_key}'",
                foreign.user_group_key
            )));
        }

        self.rows.write().await.insert(user_group_key, permissions);
        Ok(())
    }
}
