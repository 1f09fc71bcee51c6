use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use grantmap_core::{AppResult, UserIdentity};
use grantmap_domain::{PermissionPresentationModel, RawGrant};
use tracing::debug;
use uuid::Uuid;

use crate::{GranularPermissionRepository, PermissionMapperRegistry, UserGroupGranularPermission};


/// Application service reading and writing user group granular permissions.
#[derive(Clone)]
pub struct GranularPermissionService {
    registry: Arc<PermissionMapperRegistry>,
    repository: Arc<dyn GranularPermissionRepository>,
}

impl GranularPermissionService {
    /// Creates a new service from a mapper registry and a row repository.
    #[must_use]
    pub fn new(
        registry: Arc<PermissionMapperRegistry>,
        repository: Arc<dyn GranularPermissionRepository>,
    ) -> Self {
        Self {
            registry,
            repository,
        }
    }

    /// Returns the presentation models stored for a user group.
    pub async fn user_group_permissions(
        &self,
        user_group_key: Uuid,
    ) -> AppResult<Vec<PermissionPresentationModel>> {
        let rows = self
            .repository
            .list_for_user_groups(&[user_group_key])
            .await?;

        self.decode_rows(rows)
    }

    /// Replaces the stored rows of a user group with the encoded models.
    pub async fn save_user_group_permissions(
        &self,
        user_group_key: Uuid,
        models: &[PermissionPresentationModel],
    ) -> AppResult<()> {
        let mut seen = HashSet::new();
        let mut rows = Vec::new();

        for model in models {
            let mapper = self.registry.mapper_for_model(model)?;
            let context = mapper.context();

            for grant in mapper.encode(model) {
                let row = UserGroupGranularPermission {
                    user_group_key,
                    context: context.as_str().to_owned(),
                    key: grant.key,
                    permission: grant.permission,
                };
                if seen.insert(row.clone()) {
                    rows.push(row);
                }
            }
        }

        debug!(
            user_group_key = %user_group_key,
            model_count = models.len(),
            row_count = rows.len(),
            "saving user group granular permissions"
        );

        self.repository
            .replace_for_user_group(user_group_key, rows)
            .await
    }

    /// Returns the aggregated permissions in effect for a user across their groups.
    pub async fn current_user_permissions(
        &self,
        user: &UserIdentity,
    ) -> AppResult<Vec<PermissionPresentationModel>> {
        if user.user_group_keys().is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .repository
            .list_for_user_groups(user.user_group_keys())
            .await?;
        let models = self.decode_rows(rows)?;

        self.registry.aggregate(user, models).await
    }

    // Decodes per user group and context so models never mix groups before aggregation.
    fn decode_rows(
        &self,
        rows: Vec<UserGroupGranularPermission>,
    ) -> AppResult<Vec<PermissionPresentationModel>> {
        let mut partitions: BTreeMap<(Uuid, String), Vec<RawGrant>> = BTreeMap::new();
        for row in rows {
            let grant = row.raw_grant();
            partitions
                .entry((row.user_group_key, row.context))
                .or_default()
                .push(grant);
        }

        let mut models = Vec::new();
        for ((_, context), grants) in partitions {
            models.extend(self.registry.decode(context.as_str(), grants.as_slice())?);
        }

        Ok(models)
    }
}
