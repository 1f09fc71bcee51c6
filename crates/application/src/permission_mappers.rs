use async_trait::async_trait;
use grantmap_core::{AppError, AppResult, UserIdentity};
use grantmap_domain::{GranularGrant, PermissionContext, PermissionPresentationModel, RawGrant};

mod document;
mod document_property_value;
mod document_type;
mod document_type_property;
mod element;
mod entity_grants;
mod property_grants;


pub use document::DocumentPermissionMapper;
pub use document_property_value::DocumentPropertyValuePermissionMapper;
pub use document_type::DocumentTypePermissionMapper;
pub use document_type_property::DocumentTypePropertyPermissionMapper;
pub use element::ElementPermissionMapper;

/// Translates granular permission rows of one context to presentation models and back.
///
/// Decoding never fails on malformed permission strings; those rows are
/// dropped. Rows without an entity key are skipped by `decode_many` but are a
/// contract violation when passed to `decode` directly.
pub trait PermissionMapper: Send + Sync {
    /// Returns the context whose rows and models this mapper owns.
    fn context(&self) -> PermissionContext;

    /// Decodes one stored row, or `None` when its permission is malformed.
    fn decode(&self, grant: &RawGrant) -> AppResult<Option<GranularGrant>>;

    /// Groups stored rows into one presentation model per entity or entity property.
    fn decode_many(&self, grants: &[RawGrant]) -> Vec<PermissionPresentationModel>;

    /// Encodes a presentation model into stored rows.
    ///
    /// Models of another context encode to nothing.
    fn encode(&self, model: &PermissionPresentationModel) -> Vec<RawGrant>;

    /// Returns the aggregation capability, if this context supports it.
    fn aggregator(&self) -> Option<&dyn PermissionAggregator>;
}

/// Consolidates presentation models of one context for a user.
#[async_trait]
pub trait PermissionAggregator: Send + Sync {
    /// Aggregates the models of this aggregator's context; other models are ignored.
    async fn aggregate(
        &self,
        user: &UserIdentity,
        models: Vec<PermissionPresentationModel>,
    ) -> AppResult<Vec<PermissionPresentationModel>>;
}

fn missing_entity_key(context: PermissionContext) -> AppError {
    AppError::Validation(format!(
        "granular permission row for context '{context}' has no entity key"
    ))
}
