use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use grantmap_core::{AppResult, UserIdentity};
use grantmap_domain::{
    GranularGrant, PermissionContext, PermissionPresentationModel, PropertyPermissionModel,
    RawGrant,
};

use super::property_grants::{
    PropertyGrantKey, decode_property_grant, encode_property_grants, group_property_grants,
    verbs_or_empty,
};
use super::{PermissionAggregator, PermissionMapper};

/// Maps verbs granted on document property values.
///
/// Aggregation merges models that target the same document type property.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentPropertyValuePermissionMapper;

impl DocumentPropertyValuePermissionMapper {
    /// Creates the document property value mapper.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PermissionMapper for DocumentPropertyValuePermissionMapper {
    fn context(&self) -> PermissionContext {
        PermissionContext::DocumentPropertyValue
    }

    fn decode(&self, grant: &RawGrant) -> AppResult<Option<GranularGrant>> {
        decode_property_grant(self.context(), grant)
    }

    fn decode_many(&self, grants: &[RawGrant]) -> Vec<PermissionPresentationModel> {
        group_property_grants(self, grants, |verb| !verb.trim().is_empty())
            .into_iter()
            .map(|(key, verbs)| property_value_model(key, verbs))
            .collect()
    }

    fn encode(&self, model: &PermissionPresentationModel) -> Vec<RawGrant> {
        match model {
            PermissionPresentationModel::DocumentPropertyValue(model) => {
                encode_property_grants(model, verbs_or_empty(model))
            }
            _ => Vec::new(),
        }
    }

    fn aggregator(&self) -> Option<&dyn PermissionAggregator> {
        Some(self)
    }
}

#[async_trait]
impl PermissionAggregator for DocumentPropertyValuePermissionMapper {
    async fn aggregate(
        &self,
        _user: &UserIdentity,
        models: Vec<PermissionPresentationModel>,
    ) -> AppResult<Vec<PermissionPresentationModel>> {
        let mut merged: BTreeMap<PropertyGrantKey, BTreeSet<String>> = BTreeMap::new();

        for model in models {
            let PermissionPresentationModel::DocumentPropertyValue(model) = model else {
                continue;
            };

            merged
                .entry((model.document_type().id(), model.property_type().id()))
                .or_default()
                .extend(model.verbs().iter().cloned());
        }

        Ok(merged
            .into_iter()
            .map(|(key, verbs)| property_value_model(key, verbs))
            .collect())
    }
}

fn property_value_model(
    (document_type_key, property_type_key): PropertyGrantKey,
    verbs: BTreeSet<String>,
) -> PermissionPresentationModel {
    PermissionPresentationModel::DocumentPropertyValue(PropertyPermissionModel::new(
        document_type_key,
        property_type_key,
        verbs,
    ))
}
