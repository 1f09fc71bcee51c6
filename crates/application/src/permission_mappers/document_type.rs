use grantmap_core::AppResult;
use grantmap_domain::{
    GranularGrant, PermissionContext, PermissionPresentationModel, PropertyPermissionModel,
    RawGrant,
};

use super::property_grants::{
    decode_property_grant, encode_property_grants, group_property_grants,
};
use super::{PermissionAggregator, PermissionMapper};

/// Maps verbs granted on property types of document types.
///
/// Encoding emits one row per verb as given, so an empty verb set stores
/// nothing at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTypePermissionMapper;

impl DocumentTypePermissionMapper {
    /// Creates the document type mapper.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PermissionMapper for DocumentTypePermissionMapper {
    fn context(&self) -> PermissionContext {
        PermissionContext::DocumentType
    }

    fn decode(&self, grant: &RawGrant) -> AppResult<Option<GranularGrant>> {
        decode_property_grant(self.context(), grant)
    }

    fn decode_many(&self, grants: &[RawGrant]) -> Vec<PermissionPresentationModel> {
        group_property_grants(self, grants, |verb| !verb.is_empty())
            .into_iter()
            .map(|((document_type_key, property_type_key), verbs)| {
                PermissionPresentationModel::DocumentType(PropertyPermissionModel::new(
                    document_type_key,
                    property_type_key,
                    verbs,
                ))
            })
            .collect()
    }

    fn encode(&self, model: &PermissionPresentationModel) -> Vec<RawGrant> {
        match model {
            PermissionPresentationModel::DocumentType(model) => {
                encode_property_grants(model, model.verbs().iter().map(String::as_str))
            }
            _ => Vec::new(),
        }
    }

    fn aggregator(&self) -> Option<&dyn PermissionAggregator> {
        None
    }
}
