//! Category schema resolution with last-request-wins semantics.
//!
//! A category change may be superseded before its fetch resolves. Every fetch
//! is tagged with a monotonic token; only the response carrying the latest
//! token is applied.

use tracing::{debug, info, warn};

use crate::backend::CatalogBackend;
use crate::error::CatalogError;
use crate::ids::CategoryId;
use crate::schema::AttributeDefinition;
use crate::wire::CategorySchemaResponse;

/// Handle for one in-flight schema fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRequest {
    pub token: u64,
    pub category_id: CategoryId,
}

/// What happened when a fetch result was handed back to the resolver.
#[derive(Debug)]
pub enum ResolveOutcome {
    /// The schema replaced the current definitions.
    Applied { category_id: CategoryId, attributes: usize },
    /// A newer request was issued; the result was discarded.
    Stale,
    /// The fetch failed; the previous definitions are kept.
    Failed(CatalogError),
}

/// Holds the attribute definitions of the currently selected category.
#[derive(Debug, Default)]
pub struct SchemaResolver {
    next_token: u64,
    pending: Option<SchemaRequest>,
    category_id: Option<CategoryId>,
    definitions: Vec<AttributeDefinition>,
}

impl SchemaResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn definitions(&self) -> &[AttributeDefinition] {
        &self.definitions
    }

    pub fn category_id(&self) -> Option<&CategoryId> {
        self.category_id.as_ref()
    }

    /// Whether a fetch is outstanding.
    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Register a new fetch, superseding any outstanding one.
    pub fn begin(&mut self, category_id: CategoryId) -> SchemaRequest {
        self.next_token += 1;
        let request = SchemaRequest {
            token: self.next_token,
            category_id,
        };
        if let Some(previous) = self.pending.replace(request.clone()) {
            debug!(
                superseded = previous.token,
                token = request.token,
                "schema request superseded"
            );
        }
        request
    }

    /// Apply a fetch result if it belongs to the latest request.
    pub fn complete(
        &mut self,
        request: &SchemaRequest,
        result: Result<CategorySchemaResponse, CatalogError>,
    ) -> ResolveOutcome {
        if self.pending.as_ref() != Some(request) {
            debug!(token = request.token, "ignoring stale schema response");
            return ResolveOutcome::Stale;
        }
        self.pending = None;

        match result {
            Ok(response) => {
                self.definitions = build_definitions(response);
                self.category_id = Some(request.category_id.clone());
                info!(
                    category_id = %request.category_id,
                    attributes = self.definitions.len(),
                    "category schema resolved"
                );
                ResolveOutcome::Applied {
                    category_id: request.category_id.clone(),
                    attributes: self.definitions.len(),
                }
            }
            Err(e) => {
                warn!(category_id = %request.category_id, error = %e, "schema fetch failed");
                ResolveOutcome::Failed(e)
            }
        }
    }

    /// Fetch and apply the schema for `category_id` in one step.
    pub async fn resolve(
        &mut self,
        backend: &dyn CatalogBackend,
        category_id: CategoryId,
    ) -> Result<&[AttributeDefinition], CatalogError> {
        let request = self.begin(category_id);
        let result = backend.fetch_category_schema(&request.category_id).await;
        match self.complete(&request, result) {
            ResolveOutcome::Applied { .. } | ResolveOutcome::Stale => Ok(&self.definitions),
            ResolveOutcome::Failed(e) => Err(e),
        }
    }
}

/// Convert a schema response into definitions ordered by `displayOrder`.
///
/// The sort is stable, so ties keep the backend's order.
pub fn build_definitions(response: CategorySchemaResponse) -> Vec<AttributeDefinition> {
    let mut definitions: Vec<AttributeDefinition> = response
        .attribute_configs
        .into_iter()
        .map(AttributeDefinition::from)
        .collect();
    definitions.sort_by_key(|d| d.display_order);
    definitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataType;
    use crate::wire::AttributeConfig;

    fn config(id: &str, order: i32) -> AttributeConfig {
        AttributeConfig {
            id: id.into(),
            code: id.to_string(),
            label: id.to_uppercase(),
            is_required: false,
            is_filterable: false,
            display_order: order,
            unit: None,
            data_type: DataType::Text,
            options_value: Vec::new(),
        }
    }

    fn schema(configs: Vec<AttributeConfig>) -> CategorySchemaResponse {
        CategorySchemaResponse {
            attribute_configs: configs,
        }
    }

    #[test]
    fn test_definitions_sorted_by_display_order() {
        let defs = build_definitions(schema(vec![
            config("c", 3),
            config("a", 1),
            config("b", 1),
        ]));
        let ids: Vec<&str> = defs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut resolver = SchemaResolver::new();
        let first = resolver.begin("phones".into());
        let second = resolver.begin("laptops".into());

        let outcome = resolver.complete(&second, Ok(schema(vec![config("ram", 1)])));
        assert!(matches!(outcome, ResolveOutcome::Applied { attributes: 1, .. }));

        // The older request resolves late and must not overwrite.
        let outcome = resolver.complete(&first, Ok(schema(vec![config("sim", 1)])));
        assert!(matches!(outcome, ResolveOutcome::Stale));
        assert_eq!(resolver.definitions()[0].id.as_str(), "ram");
        assert_eq!(resolver.category_id().unwrap().as_str(), "laptops");
        assert!(!resolver.in_flight());
    }

    #[test]
    fn test_failure_keeps_previous_definitions() {
        let mut resolver = SchemaResolver::new();
        let request = resolver.begin("phones".into());
        resolver.complete(&request, Ok(schema(vec![config("sim", 1)])));

        let request = resolver.begin("tablets".into());
        assert!(resolver.in_flight());
        let outcome = resolver.complete(&request, Err(CatalogError::NotFound("tablets".into())));

        assert!(matches!(outcome, ResolveOutcome::Failed(CatalogError::NotFound(_))));
        assert_eq!(resolver.definitions().len(), 1);
        assert_eq!(resolver.category_id().unwrap().as_str(), "phones");
        assert!(!resolver.in_flight());
    }
}
