use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lightweight reference to an entity by its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReferenceById {
    id: Uuid,
}

impl ReferenceById {
    /// Creates a reference to the entity with the given key.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }

    /// Returns the referenced entity key.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl From<Uuid> for ReferenceById {
    fn from(id: Uuid) -> Self {
        Self::new(id)
    }
}
