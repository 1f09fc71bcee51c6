use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separator between the property type key and the verb in compound permissions.
pub const COMPOUND_PERMISSION_SEPARATOR: char = '|';

/// Granular permission row as it is stored.
///
/// An empty `permission` on a simple context marks an entity that is covered
/// by an explicit but empty verb set, which differs from having no row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawGrant {
    /// Entity the grant applies to, if any.
    pub key: Option<Uuid>,
    /// Verb, empty sentinel, or `"<propertyTypeId>|<verb>"`.
    pub permission: String,
}

impl RawGrant {
    /// Creates a grant for a specific entity.
    #[must_use]
    pub fn for_entity(key: Uuid, permission: impl Into<String>) -> Self {
        Self {
            key: Some(key),
            permission: permission.into(),
        }
    }
}

/// Parsed `"<propertyTypeId>|<verb>"` permission value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompoundPermission {
    property_key: Uuid,
    verb: String,
}

impl CompoundPermission {
    /// Creates a compound permission for a property type and verb.
    #[must_use]
    pub fn new(property_key: Uuid, verb: impl Into<String>) -> Self {
        Self {
            property_key,
            verb: verb.into(),
        }
    }

    /// Parses a stored compound permission.
    ///
    /// Returns `None` unless the value splits into exactly two parts on `|`
    /// and the first part is a UUID. The verb part may be empty.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split(COMPOUND_PERMISSION_SEPARATOR);
        let property_part = parts.next()?;
        let verb = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        let property_key = Uuid::parse_str(property_part).ok()?;
        Some(Self::new(property_key, verb))
    }

    /// Returns the property type key.
    #[must_use]
    pub fn property_key(&self) -> Uuid {
        self.property_key
    }

    /// Returns the verb, possibly empty.
    #[must_use]
    pub fn verb(&self) -> &str {
        self.verb.as_str()
    }

    /// Consumes the permission and returns its verb.
    #[must_use]
    pub fn into_verb(self) -> String {
        self.verb
    }
}

impl Display for CompoundPermission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}{COMPOUND_PERMISSION_SEPARATOR}{}",
            self.property_key.hyphenated(),
            self.verb
        )
    }
}

/// Structured decode of one stored grant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GranularGrant {
    entity_key: Uuid,
    property_key: Option<Uuid>,
    verb: String,
}

impl GranularGrant {
    /// Creates a grant on a whole entity.
    #[must_use]
    pub fn entity(entity_key: Uuid, verb: impl Into<String>) -> Self {
        Self {
            entity_key,
            property_key: None,
            verb: verb.into(),
        }
    }

    /// Creates a grant scoped to one property type of an entity.
    #[must_use]
    pub fn property(entity_key: Uuid, permission: CompoundPermission) -> Self {
        Self {
            entity_key,
            property_key: Some(permission.property_key()),
            verb: permission.into_verb(),
        }
    }

    /// Returns the entity key.
    #[must_use]
    pub fn entity_key(&self) -> Uuid {
        self.entity_key
    }

    /// Returns the property type key for property-scoped grants.
    #[must_use]
    pub fn property_key(&self) -> Option<Uuid> {
        self.property_key
    }

    /// Returns the granted verb, possibly empty.
    #[must_use]
    pub fn verb(&self) -> &str {
        self.verb.as_str()
    }

    /// Consumes the grant and returns its verb.
    #[must_use]
    pub fn into_verb(self) -> String {
        self.verb
    }
}
