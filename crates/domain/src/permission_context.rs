use std::fmt::{Display, Formatter};
use std::str::FromStr;

use grantmap_core::AppError;
use serde::{Deserialize, Serialize};

/// Storage context a granular permission row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionContext {
    /// Verbs granted on a single document node.
    Document,
    /// Verbs granted on a property type of a document type.
    DocumentType,
    /// Verbs granted on a document type property definition.
    DocumentTypeProperty,
    /// Verbs granted on property values of documents.
    DocumentPropertyValue,
    /// Verbs granted on a single element node.
    Element,
}

impl PermissionContext {
    /// Returns the stable storage tag for this context.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::DocumentType => "document_type",
            Self::DocumentTypeProperty => "document_type_property",
            Self::DocumentPropertyValue => "document_property_value",
            Self::Element => "element",
        }
    }

    /// Returns all known contexts.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionContext] = &[
            PermissionContext::Document,
            PermissionContext::DocumentType,
            PermissionContext::DocumentTypeProperty,
            PermissionContext::DocumentPropertyValue,
            PermissionContext::Element,
        ];

        ALL
    }

    /// Returns whether rows of this context store `"<propertyTypeId>|<verb>"` permissions.
    #[must_use]
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            Self::DocumentType | Self::DocumentTypeProperty | Self::DocumentPropertyValue
        )
    }
}

impl Display for PermissionContext {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for PermissionContext {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "document" => Ok(Self::Document),
            "document_type" => Ok(Self::DocumentType),
            "document_type_property" => Ok(Self::DocumentTypeProperty),
            "document_property_value" => Ok(Self::DocumentPropertyValue),
            "element" => Ok(Self::Element),
            _ => Err(AppError::Validation(format!(
                "unknown permission context '{value}'"
            ))),
        }
    }
}
