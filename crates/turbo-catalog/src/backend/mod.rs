//! Admin API boundary.
//!
//! The editor only talks to the backend through [`CatalogBackend`]; the HTTP
//! implementation lives behind the `http` feature.

mod memory;

#[cfg(feature = "http")]
mod http;

pub use memory::InMemoryBackend;

#[cfg(feature = "http")]
pub use http::HttpCatalogBackend;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CatalogError;
use crate::ids::{CategoryId, IdempotencyKey, ProductId};
use crate::submission::ProductSubmission;
use crate::wire::{CategorySchemaResponse, ProductDetail, SubmissionReceipt};

/// Operations the product editor needs from the admin API.
///
/// Implementations report a missing schema/product as
/// [`CatalogError::NotFound`] and transport failures as
/// [`CatalogError::Network`]. Nothing is retried here.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait CatalogBackend: Send + Sync {
    async fn fetch_category_schema(
        &self,
        category_id: &CategoryId,
    ) -> Result<CategorySchemaResponse, CatalogError>;

    async fn fetch_product(&self, product_id: &ProductId) -> Result<ProductDetail, CatalogError>;

    /// Create (no product id) or update a product atomically.
    ///
    /// A repeated `idempotency_key` must not create a second product.
    /// `sku_ids` in the receipt are in the order of `submission.skus`, one
    /// per submitted SKU; the editor assigns them to its rows by position.
    async fn submit_product(
        &self,
        submission: &ProductSubmission,
        idempotency_key: &IdempotencyKey,
    ) -> Result<SubmissionReceipt, CatalogError>;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<T: CatalogBackend + ?Sized> CatalogBackend for Arc<T> {
    async fn fetch_category_schema(
        &self,
        category_id: &CategoryId,
    ) -> Result<CategorySchemaResponse, CatalogError> {
        (**self).fetch_category_schema(category_id).await
    }

    async fn fetch_product(&self, product_id: &ProductId) -> Result<ProductDetail, CatalogError> {
        (**self).fetch_product(product_id).await
    }

    async fn submit_product(
        &self,
        submission: &ProductSubmission,
        idempotency_key: &IdempotencyKey,
    ) -> Result<SubmissionReceipt, CatalogError> {
        (**self).submit_product(submission, idempotency_key).await
    }
}
