use grantmap_core::AppResult;
use grantmap_domain::{
    GranularGrant, PermissionContext, PermissionPresentationModel, PropertyPermissionModel,
    RawGrant,
};

use super::property_grants::{
    decode_property_grant, encode_property_grants, group_property_grants, verbs_or_empty,
};
use super::{PermissionAggregator, PermissionMapper};

/// Maps verbs granted on document type property definitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTypePropertyPermissionMapper;

impl DocumentTypePropertyPermissionMapper {
    /// Creates the document type property mapper.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PermissionMapper for DocumentTypePropertyPermissionMapper {
    fn context(&self) -> PermissionContext {
        PermissionContext::DocumentTypeProperty
    }

    fn decode(&self, grant: &RawGrant) -> AppResult<Option<GranularGrant>> {
        decode_property_grant(self.context(), grant)
    }

    // Empty verbs are kept: an encoded empty set decodes back to {""}.
    fn decode_many(&self, grants: &[RawGrant]) -> Vec<PermissionPresentationModel> {
        group_property_grants(self, grants, |_| true)
            .into_iter()
            .map(|((document_type_key, property_type_key), verbs)| {
                PermissionPresentationModel::DocumentTypeProperty(PropertyPermissionModel::new(
                    document_type_key,
                    property_type_key,
                    verbs,
                ))
            })
            .collect()
    }

    fn encode(&self, model: &PermissionPresentationModel) -> Vec<RawGrant> {
        match model {
            PermissionPresentationModel::DocumentTypeProperty(model) => {
                encode_property_grants(model, verbs_or_empty(model))
            }
            _ => Vec::new(),
        }
    }

    fn aggregator(&self) -> Option<&dyn PermissionAggregator> {
        None
    }
}
