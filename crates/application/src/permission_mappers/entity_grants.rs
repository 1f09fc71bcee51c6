use std::collections::{BTreeMap, BTreeSet};

use grantmap_core::AppResult;
use grantmap_domain::{EntityPermissionModel, GranularGrant, PermissionContext, RawGrant};
use uuid::Uuid;

use super::{PermissionMapper, missing_entity_key};

pub(super) fn decode_entity_grant(
    context: PermissionContext,
    grant: &RawGrant,
) -> AppResult<GranularGrant> {
    let entity_key = grant.key.ok_or_else(|| missing_entity_key(context))?;
    Ok(GranularGrant::entity(entity_key, grant.permission.as_str()))
}

/// Groups rows decoded by `mapper` by entity key; the empty sentinel keeps the
/// entity with no verbs.
pub(super) fn group_entity_grants(
    mapper: &dyn PermissionMapper,
    grants: &[RawGrant],
) -> BTreeMap<Uuid, BTreeSet<String>> {
    let mut grouped: BTreeMap<Uuid, BTreeSet<String>> = BTreeMap::new();

    for grant in grants.iter().filter(|grant| grant.key.is_some()) {
        let Ok(Some(decoded)) = mapper.decode(grant) else {
            continue;
        };

        let verbs = grouped.entry(decoded.entity_key()).or_default();
        if !decoded.verb().is_empty() {
            verbs.insert(decoded.into_verb());
        }
    }

    grouped
}

pub(super) fn encode_entity_grants(model: &EntityPermissionModel) -> Vec<RawGrant> {
    let entity_key = model.entity().id();
    let grants: Vec<RawGrant> = model
        .verbs()
        .iter()
        .filter(|verb| !verb.is_empty())
        .map(|verb| RawGrant::for_entity(entity_key, verb.as_str()))
        .collect();

    if grants.is_empty() {
        return vec![RawGrant::for_entity(entity_key, String::new())];
    }

    grants
}
