use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PermissionContext, ReferenceById};

/// Verbs granted on one document or element.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityPermissionModel {
    entity: ReferenceById,
    verbs: BTreeSet<String>,
}

impl EntityPermissionModel {
    /// Creates a model for an entity and its verbs.
    #[must_use]
    pub fn new<I, V>(entity_key: Uuid, verbs: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            entity: ReferenceById::new(entity_key),
            verbs: verbs.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the referenced entity.
    #[must_use]
    pub fn entity(&self) -> ReferenceById {
        self.entity
    }

    /// Returns the granted verbs.
    #[must_use]
    pub fn verbs(&self) -> &BTreeSet<String> {
        &self.verbs
    }
}

/// Verbs granted on one property type of a document type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyPermissionModel {
    document_type: ReferenceById,
    property_type: ReferenceById,
    verbs: BTreeSet<String>,
}

impl PropertyPermissionModel {
    /// Creates a model for a document type property and its verbs.
    #[must_use]
    pub fn new<I, V>(document_type_key: Uuid, property_type_key: Uuid, verbs: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            document_type: ReferenceById::new(document_type_key),
            property_type: ReferenceById::new(property_type_key),
            verbs: verbs.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the referenced document type.
    #[must_use]
    pub fn document_type(&self) -> ReferenceById {
        self.document_type
    }

    /// Returns the referenced property type.
    #[must_use]
    pub fn property_type(&self) -> ReferenceById {
        self.property_type
    }

    /// Returns the granted verbs.
    #[must_use]
    pub fn verbs(&self) -> &BTreeSet<String> {
        &self.verbs
    }
}

/// Structured permission view exposed to API callers, one variant per context.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "context", rename_all = "snake_case")]
pub enum PermissionPresentationModel {
    /// Document node permissions.
    Document(EntityPermissionModel),
    /// Document type property permissions.
    DocumentType(PropertyPermissionModel),
    /// Document type property definition permissions.
    DocumentTypeProperty(PropertyPermissionModel),
    /// Document property value permissions.
    DocumentPropertyValue(PropertyPermissionModel),
    /// Element node permissions.
    Element(EntityPermissionModel),
}

impl PermissionPresentationModel {
    /// Returns the context discriminant of this model.
    #[must_use]
    pub fn context(&self) -> PermissionContext {
        match self {
            Self::Document(_) => PermissionContext::Document,
            Self::DocumentType(_) => PermissionContext::DocumentType,
            Self::DocumentTypeProperty(_) => PermissionContext::DocumentTypeProperty,
            Self::DocumentPropertyValue(_) => PermissionContext::DocumentPropertyValue,
            Self::Element(_) => PermissionContext::Element,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use super::{EntityPermissionModel, PermissionPresentationModel, PropertyPermissionModel};
    use crate::PermissionContext;

    #[test]
    fn verbs_have_set_semantics() {
        let model = EntityPermissionModel::new(Uuid::new_v4(), ["read", "read", "update"]);
        assert_eq!(model.verbs().len(), 2);
    }

    #[test]
    fn model_reports_its_context() {
        let model = PermissionPresentationModel::DocumentPropertyValue(
            PropertyPermissionModel::new(Uuid::new_v4(), Uuid::new_v4(), ["read"]),
        );
        assert_eq!(model.context(), PermissionContext::DocumentPropertyValue);
    }

    #[test]
    fn serializes_with_context_tag() {
        let entity_key = Uuid::new_v4();
        let model = PermissionPresentationModel::Element(EntityPermissionModel::new(
            entity_key,
            ["browse"],
        ));

        let value = serde_json::to_value(&model);
        assert!(value.is_ok());
        assert_eq!(
            value.unwrap_or_default(),
            json!({
                "context": "element",
                "entity": { "id": entity_key },
                "verbs": ["browse"],
            })
        );
    }

    #[test]
    fn deserializes_property_model_from_context_tag() {
        let document_type_key = Uuid::new_v4();
        let property_type_key = Uuid::new_v4();
        let parsed = serde_json::from_value::<PermissionPresentationModel>(json!({
            "context": "document_type_property",
            "document_type": { "id": document_type_key },
            "property_type": { "id": property_type_key },
            "verbs": ["view", "edit"],
        }));

        assert!(matches!(
            parsed,
            Ok(PermissionPresentationModel::DocumentTypeProperty(model))
                if model.document_type().id() == document_type_key
                    && model.property_type().id() == property_type_key
                    && model.verbs().len() == 2
        ));
    }
}
