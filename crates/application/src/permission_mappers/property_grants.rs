use std::collections::{BTreeMap, BTreeSet};

use grantmap_core::AppResult;
use grantmap_domain::{
    CompoundPermission, GranularGrant, PermissionContext, PropertyPermissionModel, RawGrant,
};
use tracing::debug;
use uuid::Uuid;

use super::{PermissionMapper, missing_entity_key};

/// Grouping key of compound rows: document type and property type.
pub(super) type PropertyGrantKey = (Uuid, Uuid);

pub(super) fn decode_property_grant(
    context: PermissionContext,
    grant: &RawGrant,
) -> AppResult<Option<GranularGrant>> {
    let entity_key = grant.key.ok_or_else(|| missing_entity_key(context))?;
    Ok(CompoundPermission::parse(grant.permission.as_str())
        .map(|permission| GranularGrant::property(entity_key, permission)))
}

/// Groups compound rows decoded by `mapper`, keeping only verbs accepted by
/// `keep_verb`.
pub(super) fn group_property_grants(
    mapper: &dyn PermissionMapper,
    grants: &[RawGrant],
    keep_verb: impl Fn(&str) -> bool,
) -> BTreeMap<PropertyGrantKey, BTreeSet<String>> {
    let mut grouped: BTreeMap<PropertyGrantKey, BTreeSet<String>> = BTreeMap::new();

    for (entity_key, grant) in grants
        .iter()
        .filter_map(|grant| grant.key.map(|entity_key| (entity_key, grant)))
    {
        let Some((property_key, decoded)) = mapper
            .decode(grant)
            .ok()
            .flatten()
            .and_then(|decoded| decoded.property_key().map(|key| (key, decoded)))
        else {
            debug!(
                context = %mapper.context(),
                entity_key = %entity_key,
                permission = %grant.permission,
                "dropping malformed compound permission"
            );
            continue;
        };

        let verbs = grouped.entry((entity_key, property_key)).or_default();
        if keep_verb(decoded.verb()) {
            verbs.insert(decoded.into_verb());
        }
    }

    grouped
}

pub(super) fn encode_property_grants<'a>(
    model: &PropertyPermissionModel,
    verbs: impl IntoIterator<Item = &'a str>,
) -> Vec<RawGrant> {
    let document_type_key = model.document_type().id();
    let property_type_key = model.property_type().id();

    verbs
        .into_iter()
        .map(|verb| {
            RawGrant::for_entity(
                document_type_key,
                CompoundPermission::new(property_type_key, verb).to_string(),
            )
        })
        .collect()
}

/// Returns the model's verbs, or a single empty verb when it has none.
pub(super) fn verbs_or_empty(model: &PropertyPermissionModel) -> Vec<&str> {
    if model.verbs().is_empty() {
        return vec![""];
    }

    model.verbs().iter().map(String::as_str).collect()
}
