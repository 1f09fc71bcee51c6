use grantmap_application::PermissionMapperRegistry;
use grantmap_core::{AppError, AppResult};
use grantmap_domain::{PermissionContext, PermissionPresentationModel, RawGrant};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct DecodeRequest {
    pub context: Option<String>,
    pub grants: Vec<RawGrant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedGrant {
    pub context: PermissionContext,
    pub key: Option<Uuid>,
    pub permission: String,
}

pub fn decode_input(
    registry: &PermissionMapperRegistry,
    input: &str,
    default_context: Option<PermissionContext>,
) -> AppResult<Vec<PermissionPresentationModel>> {
    let request: DecodeRequest = serde_json::from_str(input)
        .map_err(|error| AppError::Validation(format!("invalid decode input: {error}")))?;

    let context = request
        .context
        .or_else(|| default_context.map(|context| context.as_str().to_owned()))
        .ok_or_else(|| {
            AppError::Validation(
                "decode input has no context and neither --context nor GRANTMAP_CONTEXT is set"
                    .to_owned(),
            )
        })?;

    registry.decode(context.as_str(), request.grants.as_slice())
}

pub fn encode_input(
    registry: &PermissionMapperRegistry,
    input: &str,
) -> AppResult<Vec<EncodedGrant>> {
    let models: Vec<PermissionPresentationModel> = serde_json::from_str(input)
        .map_err(|error| AppError::Validation(format!("invalid encode input: {error}")))?;

    let mut encoded = Vec::new();
    for model in &models {
        let context = model.context();
        encoded.extend(
            registry
                .encode(model)?
                .into_iter()
                .map(|grant| EncodedGrant {
                    context,
                    key: grant.key,
                    permission: grant.permission,
                }),
        );
    }

    Ok(encoded)
}

pub fn render<T: Serialize>(value: &T, pretty: bool) -> AppResult<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };

    rendered.map_err(|error| AppError::Internal(format!("failed to serialize output: {error}")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use grantmap_application::PermissionMapperRegistry;
    use grantmap_core::AppError;
    use grantmap_domain::{EntityPermissionModel, PermissionContext, PermissionPresentationModel};
    use grantmap_infrastructure::{InMemoryEntityPathLookup, InMemoryPathPermissionResolver};
    use serde_json::json;
    use uuid::Uuid;

    use super::{EncodedGrant, decode_input, encode_input, render};

    fn registry() -> PermissionMapperRegistry {
        let registry = PermissionMapperRegistry::with_default_mappers(
            Arc::new(InMemoryEntityPathLookup::new()),
            Arc::new(InMemoryPathPermissionResolver::new()),
        );
        assert!(registry.is_ok());
        registry.unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn decode_uses_context_from_input() {
        let entity_key = Uuid::new_v4();
        let input = json!({
            "context": "document",
            "grants": [
                { "key": entity_key, "permission": "read" },
                { "key": null, "permission": "update" },
            ],
        })
        .to_string();

        let models = decode_input(&registry(), &input, Some(PermissionContext::Element));

        assert!(models.is_ok());
        assert_eq!(
            models.unwrap_or_default(),
            vec![PermissionPresentationModel::Document(
                EntityPermissionModel::new(entity_key, ["read"])
            )]
        );
    }

    #[test]
    fn decode_falls_back_to_configured_context() {
        let entity_key = Uuid::new_v4();
        let input = json!({ "grants": [{ "key": entity_key, "permission": "" }] }).to_string();

        let models = decode_input(&registry(), &input, Some(PermissionContext::Element));

        assert!(matches!(
            models.as_deref(),
            Ok([PermissionPresentationModel::Element(model)]) if model.verbs().is_empty()
        ));
    }

    #[test]
    fn decode_without_any_context_is_rejected() {
        let input = json!({ "grants": [] }).to_string();

        let models = decode_input(&registry(), &input, None);

        assert!(matches!(models, Err(AppError::Validation(_))));
    }

    #[test]
    fn encode_tags_rows_with_their_context() {
        let document_type_key = Uuid::new_v4();
        let property_type_key = Uuid::new_v4();
        let input = json!([{
            "context": "document_property_value",
            "document_type": { "id": document_type_key },
            "property_type": { "id": property_type_key },
            "verbs": [],
        }])
        .to_string();

        let encoded = encode_input(&registry(), &input);

        assert!(encoded.is_ok());
        assert_eq!(
            encoded.unwrap_or_default(),
            vec![EncodedGrant {
                context: PermissionContext::DocumentPropertyValue,
                key: Some(document_type_key),
                permission: format!("{property_type_key}|"),
            }]
        );
    }

    #[test]
    fn compact_rendering_is_single_line() {
        let rendered = render(&json!({ "verbs": ["read"] }), false);

        assert!(matches!(rendered.as_deref(), Ok(r#"{"verbs":["read"]}"#)));
    }
}
