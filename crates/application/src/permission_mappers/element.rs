use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use grantmap_core::{AppResult, UserIdentity};
use grantmap_domain::{
    EntityPermissionModel, GranularGrant, PermissionContext, PermissionPresentationModel,
    RawGrant,
};
use tracing::warn;
use uuid::Uuid;

use crate::{EntityLookup, PermissionResolver};

use super::entity_grants::{decode_entity_grant, encode_entity_grants, group_entity_grants};
use super::{PermissionAggregator, PermissionMapper};

/// Maps verbs granted on element nodes.
///
/// Aggregation replaces the supplied verbs with the user's effective
/// permissions at each element's path, so ancestor grants are folded in.
#[derive(Clone)]
pub struct ElementPermissionMapper {
    entity_lookup: Arc<dyn EntityLookup>,
    permission_resolver: Arc<dyn PermissionResolver>,
}

impl ElementPermissionMapper {
    /// Creates the element mapper from its lookup and resolver collaborators.
    #[must_use]
    pub fn new(
        entity_lookup: Arc<dyn EntityLookup>,
        permission_resolver: Arc<dyn PermissionResolver>,
    ) -> Self {
        Self {
            entity_lookup,
            permission_resolver,
        }
    }
}

impl PermissionMapper for ElementPermissionMapper {
    fn context(&self) -> PermissionContext {
        PermissionContext::Element
    }

    fn decode(&self, grant: &RawGrant) -> AppResult<Option<GranularGrant>> {
        decode_entity_grant(self.context(), grant).map(Some)
    }

    fn decode_many(&self, grants: &[RawGrant]) -> Vec<PermissionPresentationModel> {
        group_entity_grants(self, grants)
            .into_iter()
            .map(|(entity_key, verbs)| {
                PermissionPresentationModel::Element(EntityPermissionModel::new(entity_key, verbs))
            })
            .collect()
    }

    fn encode(&self, model: &PermissionPresentationModel) -> Vec<RawGrant> {
        match model {
            PermissionPresentationModel::Element(model) => encode_entity_grants(model),
            _ => Vec::new(),
        }
    }

    fn aggregator(&self) -> Option<&dyn PermissionAggregator> {
        Some(self)
    }
}

#[async_trait]
impl PermissionAggregator for ElementPermissionMapper {
    async fn aggregate(
        &self,
        user: &UserIdentity,
        models: Vec<PermissionPresentationModel>,
    ) -> AppResult<Vec<PermissionPresentationModel>> {
        let element_keys: BTreeSet<Uuid> = models
            .iter()
            .filter_map(|model| match model {
                PermissionPresentationModel::Element(model) => Some(model.entity().id()),
                _ => None,
            })
            .collect();

        if element_keys.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<Uuid> = element_keys.iter().copied().collect();
        let entries = self.entity_lookup.get_all(keys.as_slice()).await?;

        let mut found_keys = BTreeSet::new();
        let mut pathless_keys = BTreeSet::new();
        let mut aggregated = Vec::with_capacity(entries.len());

        for entry in entries {
            if !element_keys.contains(&entry.key) || found_keys.contains(&entry.key) {
                continue;
            }

            if entry.path.trim().is_empty() {
                if pathless_keys.insert(entry.key) {
                    warn!(
                        user_key = %user.user_key(),
                        element_key = %entry.key,
                        "skipping element without a hierarchy path"
                    );
                }
                continue;
            }

            found_keys.insert(entry.key);
            let effective = self
                .permission_resolver
                .effective_permissions(user, entry.path.as_str())
                .await?;
            aggregated.push(PermissionPresentationModel::Element(
                EntityPermissionModel::new(entry.key, effective.verbs),
            ));
        }

        for missing_key in element_keys
            .iter()
            .filter(|key| !found_keys.contains(*key) && !pathless_keys.contains(*key))
        {
            warn!(
                user_key = %user.user_key(),
                element_key = %missing_key,
                "skipping element that could not be found"
            );
        }

        Ok(aggregated)
    }
}
