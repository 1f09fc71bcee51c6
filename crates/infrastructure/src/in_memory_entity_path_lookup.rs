use std::collections::HashMap;

use async_trait::async_trait;
use grantmap_application::{EntityLookup, EntityPathEntry};
use grantmap_core::AppResult;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory entity key to hierarchy path lookup.
#[derive(Debug, Default)]
pub struct InMemoryEntityPathLookup {
    paths: RwLock<HashMap<Uuid, String>>,
}

impl InMemoryEntityPathLookup {
    /// Creates an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self {
            paths: RwLock::new(HashMap::new()),
        }
    }

    /// Records or replaces the path of an entity.
    pub async fn insert(&self, key: Uuid, path: impl Into<String>) {
        self.paths.write().await.insert(key, path.into());
    }
}

#[async_trait]
impl EntityLookup for InMemoryEntityPathLookup {
    async fn get_all(&self, keys: &[Uuid]) -> AppResult<Vec<EntityPathEntry>> {
        let paths = self.paths.read().await;

        Ok(keys
            .iter()
            .filter_map(|key| {
                paths.get(key).map(|path| EntityPathEntry {
                    key: *key,
                    path: path.clone(),
                })
            })
            .collect())
    }
}
