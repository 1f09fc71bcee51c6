use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;
use std::sync::Arc;

use grantmap_core::{AppError, AppResult, UserIdentity};
use grantmap_domain::{PermissionContext, PermissionPresentationModel, RawGrant};
use tracing::debug;

use crate::{
    DocumentPermissionMapper, DocumentPropertyValuePermissionMapper,
    DocumentTypePermissionMapper, DocumentTypePropertyPermissionMapper, ElementPermissionMapper,
    EntityLookup, PermissionMapper, PermissionResolver,
};


/// Registry selecting a permission mapper by context tag or by presentation model.
#[derive(Clone)]
pub struct PermissionMapperRegistry {
    mappers: HashMap<PermissionContext, Arc<dyn PermissionMapper>>,
}

impl PermissionMapperRegistry {
    /// Creates a registry from mappers that each claim a distinct context.
    pub fn new(
        mappers: impl IntoIterator<Item = Arc<dyn PermissionMapper>>,
    ) -> AppResult<Self> {
        let mut registered: HashMap<PermissionContext, Arc<dyn PermissionMapper>> =
            HashMap::new();

        for mapper in mappers {
            let context = mapper.context();
            if registered.insert(context, mapper).is_some() {
                return Err(AppError::Conflict(format!(
                    "more than one permission mapper registered for context '{context}'"
                )));
            }
        }

        Ok(Self {
            mappers: registered,
        })
    }

    /// Creates a registry holding the mappers for every known context.
    pub fn with_default_mappers(
        entity_lookup: Arc<dyn EntityLookup>,
        permission_resolver: Arc<dyn PermissionResolver>,
    ) -> AppResult<Self> {
        Self::new([
            Arc::new(DocumentPermissionMapper::new()) as Arc<dyn PermissionMapper>,
            Arc::new(DocumentTypePermissionMapper::new()),
            Arc::new(DocumentTypePropertyPermissionMapper::new()),
            Arc::new(DocumentPropertyValuePermissionMapper::new()),
            Arc::new(ElementPermissionMapper::new(
                entity_lookup,
                permission_resolver,
            )),
        ])
    }

    /// Returns the registered contexts in a stable order.
    #[must_use]
    pub fn contexts(&self) -> Vec<PermissionContext> {
        let mut contexts: Vec<PermissionContext> = self.mappers.keys().copied().collect();
        contexts.sort_unstable();
        contexts
    }

    /// Returns the mapper owning rows stored under the context tag.
    pub fn mapper_for_context(&self, context: &str) -> AppResult<Arc<dyn PermissionMapper>> {
        PermissionContext::from_str(context)
            .ok()
            .and_then(|context| self.mappers.get(&context).cloned())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "no permission mapper registered for context '{context}'"
                ))
            })
    }

    /// Returns the mapper that encodes the presentation model.
    pub fn mapper_for_model(
        &self,
        model: &PermissionPresentationModel,
    ) -> AppResult<Arc<dyn PermissionMapper>> {
        self.registered_mapper(model.context())
    }

    /// Decodes rows stored under one context tag into presentation models.
    pub fn decode(
        &self,
        context: &str,
        grants: &[RawGrant],
    ) -> AppResult<Vec<PermissionPresentationModel>> {
        let mapper = self.mapper_for_context(context)?;
        let models = mapper.decode_many(grants);

        debug!(
            context = %mapper.context(),
            grant_count = grants.len(),
            model_count = models.len(),
            "decoded granular permissions"
        );

        Ok(models)
    }

    /// Encodes a presentation model into rows of its context.
    pub fn encode(&self, model: &PermissionPresentationModel) -> AppResult<Vec<RawGrant>> {
        Ok(self.mapper_for_model(model)?.encode(model))
    }

    /// Aggregates models per context for the user.
    ///
    /// Contexts whose mapper has no aggregation capability are returned as
    /// given, minus exact duplicates. They are never dropped, so a user keeps
    /// the document and document type grants of every group they belong to.
    /// Models of an unregistered context fail with `AppError::NotFound`.
    pub async fn aggregate(
        &self,
        user: &UserIdentity,
        models: Vec<PermissionPresentationModel>,
    ) -> AppResult<Vec<PermissionPresentationModel>> {
        let mut by_context: BTreeMap<PermissionContext, Vec<PermissionPresentationModel>> =
            BTreeMap::new();
        for model in models {
            by_context.entry(model.context()).or_default().push(model);
        }

        let mut aggregated = Vec::new();
        for (context, models) in by_context {
            let mapper = self.registered_mapper(context)?;

            match mapper.aggregator() {
                Some(aggregator) => {
                    aggregated.extend(aggregator.aggregate(user, models).await?);
                }
                None => {
                    debug!(
                        context = %context,
                        model_count = models.len(),
                        "context has no aggregation, passing models through"
                    );
                    let distinct: BTreeSet<PermissionPresentationModel> =
                        models.into_iter().collect();
                    aggregated.extend(distinct);
                }
            }
        }

        Ok(aggregated)
    }

    fn registered_mapper(&self, context: PermissionContext) -> AppResult<Arc<dyn PermissionMapper>> {
        self.mappers.get(&context).cloned().ok_or_else(|| {
            AppError::NotFound(format!(
                "no permission mapper registered for presentation model of context '{context}'"
            ))
        })
    }
}
