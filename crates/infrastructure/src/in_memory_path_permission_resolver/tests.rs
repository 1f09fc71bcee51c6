use std::collections::BTreeSet;
use std::sync::Arc;

use grantmap_application::{ElementPermissionMapper, PermissionMapper, PermissionResolver};
use grantmap_core::UserIdentity;
use grantmap_domain::{EntityPermissionModel, PermissionPresentationModel};
use uuid::Uuid;

use super::InMemoryPathPermissionResolver;
use crate::InMemoryEntityPathLookup;

fn verbs(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

fn member_of(user_group_keys: Vec<Uuid>) -> UserIdentity {
    UserIdentity::new(Uuid::new_v4(), user_group_keys)
}

async fn resolve(
    resolver: &InMemoryPathPermissionResolver,
    user: &UserIdentity,
    path: &str,
) -> BTreeSet<String> {
    let resolved = resolver.effective_permissions(user, path).await;
    assert!(resolved.is_ok());
    resolved.unwrap_or_default().verbs
}

#[tokio::test]
async fn deepest_explicit_grant_wins() {
    let resolver = InMemoryPathPermissionResolver::new();
    let editors = Uuid::new_v4();
    resolver.set_default_verbs(editors, ["browse"]).await;
    resolver.grant_node_verbs(editors, "1040", ["browse", "update"]).await;
    resolver.grant_node_verbs(editors, "1041", ["delete"]).await;
    let user = member_of(vec![editors]);

    assert_eq!(resolve(&resolver, &user, "-1,1040,1041").await, verbs(&["delete"]));
    assert_eq!(
        resolve(&resolver, &user, "-1,1040,1042").await,
        verbs(&["browse", "update"])
    );
}

#[tokio::test]
async fn falls_back_to_group_defaults_without_explicit_grant() {
    let resolver = InMemoryPathPermissionResolver::new();
    let editors = Uuid::new_v4();
    resolver.set_default_verbs(editors, ["browse", "create"]).await;
    let user = member_of(vec![editors]);

    assert_eq!(
        resolve(&resolver, &user, "-1,2000,2001").await,
        verbs(&["browse", "create"])
    );
}

#[tokio::test]
async fn explicit_empty_grant_overrides_defaults() {
    let resolver = InMemoryPathPermissionResolver::new();
    let editors = Uuid::new_v4();
    resolver.set_default_verbs(editors, ["browse"]).await;
    resolver
        .grant_node_verbs(editors, "3000", Vec::<String>::new())
        .await;
    let user = member_of(vec![editors]);

    assert!(resolve(&resolver, &user, "-1,3000,3001").await.is_empty());
}

#[tokio::test]
async fn effective_permissions_union_across_groups() {
    let resolver = InMemoryPathPermissionResolver::new();
    let writers = Uuid::new_v4();
    let publishers = Uuid::new_v4();
    resolver.set_default_verbs(writers, ["browse"]).await;
    resolver.grant_node_verbs(writers, "4000", ["update"]).await;
    resolver.set_default_verbs(publishers, ["publish"]).await;
    let user = member_of(vec![writers, publishers]);

    assert_eq!(
        resolve(&resolver, &user, "-1,4000,4001").await,
        verbs(&["update", "publish"])
    );
}

#[tokio::test]
async fn empty_path_or_unknown_groups_resolve_to_nothing() {
    let resolver = InMemoryPathPermissionResolver::new();
    let editors = Uuid::new_v4();
    resolver.set_default_verbs(editors, ["browse"]).await;

    assert!(resolve(&resolver, &member_of(vec![editors]), " ").await.is_empty());
    assert!(
        resolve(&resolver, &member_of(vec![Uuid::new_v4()]), "-1,5000")
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn element_aggregation_folds_in_ancestor_grants() {
    let element_key = Uuid::new_v4();
    let unknown_element_key = Uuid::new_v4();
    let editors = Uuid::new_v4();
    let lookup = Arc::new(InMemoryEntityPathLookup::new());
    lookup.insert(element_key, "-1,1040,1041").await;
    let resolver = Arc::new(InMemoryPathPermissionResolver::new());
    resolver.set_default_verbs(editors, ["browse"]).await;
    resolver.grant_node_verbs(editors, "1040", ["read", "update"]).await;
    let mapper = ElementPermissionMapper::new(lookup, resolver);
    let Some(aggregator) = mapper.aggregator() else {
        unreachable!()
    };

    let aggregated = aggregator
        .aggregate(
            &member_of(vec![editors]),
            vec![
                PermissionPresentationModel::Element(EntityPermissionModel::new(
                    element_key,
                    ["delete"],
                )),
                PermissionPresentationModel::Element(EntityPermissionModel::new(
                    unknown_element_key,
                    ["read"],
                )),
            ],
        )
        .await;

    assert!(aggregated.is_ok());
    assert_eq!(
        aggregated.unwrap_or_default(),
        vec![PermissionPresentationModel::Element(
            EntityPermissionModel::new(element_key, ["read", "update"])
        )]
    );
}
