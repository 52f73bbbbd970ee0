//! Admin API over HTTP.

use async_trait::async_trait;
use tracing::{debug, info};
use turbo_data::{FetchClient, Multipart, Response};

use crate::error::CatalogError;
use crate::ids::{CategoryId, IdempotencyKey, ProductId};
use crate::submission::{FormPart, ProductSubmission};
use crate::wire::{CategorySchemaResponse, ProductDetail, SubmissionReceipt};

use super::CatalogBackend;

/// [`CatalogBackend`] talking to the admin REST API.
///
/// | operation | request |
/// |---|---|
/// | category schema | `GET /categories/{id}/attributes` |
/// | product detail | `GET /products/{id}` |
/// | create | `POST /products` (multipart) |
/// | update | `PUT /products/{id}` (multipart) |
#[derive(Debug, Clone)]
pub struct HttpCatalogBackend {
    client: FetchClient,
}

impl HttpCatalogBackend {
    /// The client should carry the API base URL and any auth headers.
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }
}

fn encode_form(parts: &[FormPart]) -> Multipart {
    let mut form = Multipart::new();
    for part in parts {
        match part {
            FormPart::Text { name, value } => form.push_text(name.as_str(), value.as_str()),
            FormPart::File { name, file } => form.push_file(
                name.as_str(),
                file.file_name.as_str(),
                file.content_type.as_str(),
                file.bytes.to_vec(),
            ),
        }
    }
    form
}

fn checked(response: Response) -> Result<Response, CatalogError> {
    Ok(response.error_for_status()?)
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl CatalogBackend for HttpCatalogBackend {
    async fn fetch_category_schema(
        &self,
        category_id: &CategoryId,
    ) -> Result<CategorySchemaResponse, CatalogError> {
        let response = self
            .client
            .get(format!("/categories/{}/attributes", category_id.as_str()))
            .send()
            .await?;
        let schema: CategorySchemaResponse = checked(response)?.json()?;
        debug!(
            category_id = %category_id.as_str(),
            attributes = schema.attribute_configs.len(),
            "fetched category schema"
        );
        Ok(schema)
    }

    async fn fetch_product(&self, product_id: &ProductId) -> Result<ProductDetail, CatalogError> {
        let response = self
            .client
            .get(format!("/products/{}", product_id.as_str()))
            .send()
            .await?;
        Ok(checked(response)?.json()?)
    }

    async fn submit_product(
        &self,
        submission: &ProductSubmission,
        idempotency_key: &IdempotencyKey,
    ) -> Result<SubmissionReceipt, CatalogError> {
        let form = encode_form(&submission.to_form_parts());
        let request = match &submission.product_id {
            Some(id) => self.client.put(format!("/products/{}", id.as_str())),
            None => self.client.post("/products"),
        };

        let response = request
            .multipart(&form)
            .idempotency_key(idempotency_key.as_str())
            .send()
            .await?;
        let receipt: SubmissionReceipt = checked(response)?.json()?;
        info!(
            product_id = %receipt.product_id.as_str(),
            skus = receipt.sku_ids.len(),
            parts = form.len(),
            "product submitted"
        );
        Ok(receipt)
    }
}
