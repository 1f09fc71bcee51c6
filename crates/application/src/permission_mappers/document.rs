use grantmap_core::AppResult;
use grantmap_domain::{
    EntityPermissionModel, GranularGrant, PermissionContext, PermissionPresentationModel,
    RawGrant,
};

use super::entity_grants::{decode_entity_grant, encode_entity_grants, group_entity_grants};
use super::{PermissionAggregator, PermissionMapper};

/// Maps verbs granted on document nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentPermissionMapper;

impl DocumentPermissionMapper {
    /// Creates the document mapper.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PermissionMapper for DocumentPermissionMapper {
    fn context(&self) -> PermissionContext {
        PermissionContext::Document
    }

    fn decode(&self, grant: &RawGrant) -> AppResult<Option<GranularGrant>> {
        decode_entity_grant(self.context(), grant).map(Some)
    }

    fn decode_many(&self, grants: &[RawGrant]) -> Vec<PermissionPresentationModel> {
        group_entity_grants(self, grants)
            .into_iter()
            .map(|(entity_key, verbs)| {
                PermissionPresentationModel::Document(EntityPermissionModel::new(entity_key, verbs))
            })
            .collect()
    }

    fn encode(&self, model: &PermissionPresentationModel) -> Vec<RawGrant> {
        match model {
            PermissionPresentationModel::Document(model) => encode_entity_grants(model),
            _ => Vec::new(),
        }
    }

    fn aggregator(&self) -> Option<&dyn PermissionAggregator> {
        None
    }
}
