//! In-process backend for tests, fixtures and the CLI.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::ids::{CategoryId, IdempotencyKey, ProductId, SkuId};
use crate::media::ImageSource;
use crate::submission::ProductSubmission;
use crate::wire::{
    AttributeDetail, CategorySchemaResponse, GroupValueDetail, ProductDetail, SelectionDetail,
    SkuDetail, SubmissionReceipt, VariantGroupDetail,
};

use super::CatalogBackend;

#[derive(Debug, Default)]
struct State {
    schemas: HashMap<CategoryId, CategorySchemaResponse>,
    products: HashMap<ProductId, ProductDetail>,
    receipts: HashMap<IdempotencyKey, SubmissionReceipt>,
    offline: bool,
}

/// A [`CatalogBackend`] that keeps everything in memory.
///
/// Submissions are stored as product details, so a saved product can be
/// loaded again. A repeated idempotency key replays the first receipt.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: Mutex<State>,
    schema_fetches: AtomicUsize,
    submissions: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_schema(self, category_id: impl Into<CategoryId>, schema: CategorySchemaResponse) -> Self {
        self.insert_schema(category_id.into(), schema);
        self
    }

    pub fn with_product(self, product: ProductDetail) -> Self {
        self.insert_product(product);
        self
    }

    pub fn insert_schema(&self, category_id: CategoryId, schema: CategorySchemaResponse) {
        self.state().schemas.insert(category_id, schema);
    }

    pub fn insert_product(&self, product: ProductDetail) {
        self.state().products.insert(product.id.clone(), product);
    }

    /// Make every call fail with a network error until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    pub fn product(&self, id: &ProductId) -> Option<ProductDetail> {
        self.state().products.get(id).cloned()
    }

    pub fn product_count(&self) -> usize {
        self.state().products.len()
    }

    /// Number of submissions that reached the backend, replays included.
    pub fn submission_count(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    pub fn schema_fetch_count(&self) -> usize {
        self.schema_fetches.load(Ordering::SeqCst)
    }

    fn check_online(state: &State) -> Result<(), CatalogError> {
        if state.offline {
            Err(CatalogError::Network("backend unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl CatalogBackend for InMemoryBackend {
    async fn fetch_category_schema(
        &self,
        category_id: &CategoryId,
    ) -> Result<CategorySchemaResponse, CatalogError> {
        self.schema_fetches.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        Self::check_online(&state)?;
        state
            .schemas
            .get(category_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("schema for category {}", category_id)))
    }

    async fn fetch_product(&self, product_id: &ProductId) -> Result<ProductDetail, CatalogError> {
        let state = self.state();
        Self::check_online(&state)?;
        state
            .products
            .get(product_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("product {}", product_id)))
    }

    async fn submit_product(
        &self,
        submission: &ProductSubmission,
        idempotency_key: &IdempotencyKey,
    ) -> Result<SubmissionReceipt, CatalogError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        Self::check_online(&state)?;

        if let Some(receipt) = state.receipts.get(idempotency_key) {
            debug!(key = %idempotency_key, "replaying submission receipt");
            return Ok(receipt.clone());
        }

        let product_id = match &submission.product_id {
            Some(id) if state.products.contains_key(id) => id.clone(),
            Some(id) => return Err(CatalogError::NotFound(format!("product {}", id))),
            None => ProductId::generate(),
        };
        let (detail, sku_ids) = stored_detail(product_id.clone(), submission);
        state.products.insert(product_id.clone(), detail);

        let receipt = SubmissionReceipt { product_id, sku_ids };
        state
            .receipts
            .insert(idempotency_key.clone(), receipt.clone());
        info!(product_id = %receipt.product_id, skus = receipt.sku_ids.len(), "product stored");
        Ok(receipt)
    }
}

fn stored_url(image: &ImageSource) -> String {
    match image {
        ImageSource::Url { url } => url.clone(),
        ImageSource::File(file) => format!("memory://uploads/{}", file.file_name),
    }
}

/// What a real backend would return when the product is fetched again.
fn stored_detail(product_id: ProductId, submission: &ProductSubmission) -> (ProductDetail, Vec<SkuId>) {
    let skus: Vec<SkuDetail> = submission
        .skus
        .iter()
        .map(|sku| SkuDetail {
            id: sku.id.clone().unwrap_or_else(SkuId::generate),
            sku_code: sku.sku_code.clone(),
            name: sku.name.clone(),
            price: sku.price,
            cost_price: sku.cost_price,
            original_price: sku.original_price,
            stock: sku.stock,
            active: sku.active,
            discontinued: sku.discontinued,
            discontinued_reason: sku.discontinued_reason.clone(),
            thumbnail: sku.image.as_ref().map(stored_url),
            selections: sku
                .specs
                .iter()
                .map(|s| SelectionDetail {
                    group_id: s.group_id.clone(),
                    value_id: s.value_id.clone(),
                })
                .collect(),
        })
        .collect();
    let sku_ids = skus.iter().map(|s| s.id.clone()).collect();

    let detail = ProductDetail {
        id: product_id,
        name: submission.name.clone(),
        slug: submission.slug.clone(),
        brand_id: Some(submission.brand_id.clone()),
        category_id: Some(submission.category_id.clone()),
        description: Some(submission.description.clone()),
        warranty: Some(submission.warranty.clone()),
        thumbnail: submission.thumbnail.as_ref().map(stored_url),
        gallery: submission.gallery.iter().map(stored_url).collect(),
        specs: submission
            .specs
            .iter()
            .map(|s| AttributeDetail {
                id: s.attribute_id.clone(),
                code: Some(s.code.clone()),
                value: s.value.clone(),
            })
            .collect(),
        variant_groups: submission
            .attributes
            .iter()
            .map(|g| VariantGroupDetail {
                id: g.id.clone(),
                label: g.label.clone(),
                values: g
                    .values
                    .iter()
                    .map(|v| GroupValueDetail {
                        id: v.id.clone(),
                        value: v.value.clone(),
                        active: v.active,
                    })
                    .collect(),
            })
            .collect(),
        skus,
    };
    (detail, sku_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_schema_is_not_found() {
        let backend = InMemoryBackend::new();
        let err = backend
            .fetch_category_schema(&"nope".into())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
        assert_eq!(backend.schema_fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_offline_is_network_error() {
        let backend = InMemoryBackend::new().with_schema(
            "c1",
            CategorySchemaResponse {
                attribute_configs: Vec::new(),
            },
        );
        backend.set_offline(true);
        let err = backend.fetch_category_schema(&"c1".into()).await.unwrap_err();
        assert!(err.is_remote());

        backend.set_offline(false);
        assert!(backend.fetch_category_schema(&"c1".into()).await.is_ok());
    }
}
