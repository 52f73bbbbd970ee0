//! Product editor: one create or edit form, from category choice to save.
//!
//! The editor owns the [`ProductDraft`] and routes every user action through
//! the component that owns the rule: attribute edits through the
//! [`AttributeBinder`], group edits through the [`VariantGroupEditor`]
//! followed by matrix regeneration, and saving through the
//! [`SubmissionAssembler`]. Backend failures become [`Notification`]s; the
//! editor stays usable with whatever state it had.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::attributes::{initial_values, AttrValue, AttributeBinder};
use crate::backend::CatalogBackend;
use crate::config::EditorConfig;
use crate::draft::{ProductBase, ProductDraft};
use crate::error::{CatalogError, FieldError, ValidationErrors};
use crate::ids::{AttributeId, CategoryId, GroupId, IdempotencyKey, OptionValueId, ProductId};
use crate::media::{ImageFile, ImageSource, PreviewRegistry};
use crate::schema::{AttributeDefinition, ResolveOutcome, SchemaRequest, SchemaResolver};
use crate::submission::{ProductSubmission, SubmissionAssembler};
use crate::variant::{
    generate, Deactivation, MatrixReport, MatrixStatus, SkuKey, SkuVariant, VariantGroup,
    VariantGroupEditor,
};
use crate::wire::{AttributeDetail, CategorySchemaResponse, SubmissionReceipt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A dismissible message for the admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// A submission that has been validated and handed out for sending.
///
/// While one exists the editor refuses to start another.
#[derive(Debug)]
pub struct PendingSubmission {
    pub submission: ProductSubmission,
    pub idempotency_key: IdempotencyKey,
}

pub struct ProductEditor<B> {
    backend: B,
    config: EditorConfig,
    resolver: SchemaResolver,
    draft: ProductDraft,
    field_errors: BTreeMap<String, FieldError>,
    notifications: Vec<Notification>,
    idempotency_key: IdempotencyKey,
    submitting: bool,
    previews: PreviewRegistry,
    last_report: Option<MatrixReport>,
}

impl<B: CatalogBackend> ProductEditor<B> {
    /// Editor for a new product.
    pub fn new(backend: B, config: EditorConfig) -> Self {
        Self {
            backend,
            config,
            resolver: SchemaResolver::new(),
            draft: ProductDraft::new(),
            field_errors: BTreeMap::new(),
            notifications: Vec::new(),
            idempotency_key: IdempotencyKey::generate(),
            submitting: false,
            previews: PreviewRegistry::new(),
            last_report: None,
        }
    }

    /// Editor for a saved product.
    ///
    /// Fails only if the product itself cannot be fetched. A failing schema
    /// fetch leaves the attributes empty and raises a notification.
    pub async fn load(
        backend: B,
        config: EditorConfig,
        product_id: &ProductId,
    ) -> Result<Self, CatalogError> {
        let detail = backend.fetch_product(product_id).await?;
        let mut editor = Self::new(backend, config);
        editor.draft = ProductDraft::from_detail(&detail);

        if let Some(category_id) = detail.category_id.clone() {
            let request = editor.begin_category_change(category_id);
            let result = editor
                .backend
                .fetch_category_schema(&request.category_id)
                .await;
            if let ResolveOutcome::Applied { .. } = editor.apply_schema(&request, result) {
                editor.hydrate(&detail.specs);
            }
        }

        if editor.draft.has_variants {
            editor.regenerate();
        }
        info!(
            product_id = %product_id,
            skus = editor.draft.skus.len(),
            groups = editor.draft.variant_groups.len(),
            "product loaded for editing"
        );
        Ok(editor)
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn definitions(&self) -> &[AttributeDefinition] {
        self.resolver.definitions()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    pub fn idempotency_key(&self) -> &IdempotencyKey {
        &self.idempotency_key
    }

    pub fn last_matrix_report(&self) -> Option<&MatrixReport> {
        self.last_report.as_ref()
    }

    /// Base fields (name, slug, prices, images). Free-form; checked on submit.
    pub fn base_mut(&mut self) -> &mut ProductBase {
        &mut self.draft.base
    }

    // ---- notifications and field errors ----

    fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification {
            level,
            message: message.into(),
        });
    }

    /// Drain pending notifications.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn field_error(&self, field: &str) -> Option<&FieldError> {
        self.field_errors.get(field)
    }

    pub fn field_errors(&self) -> impl Iterator<Item = &FieldError> {
        self.field_errors.values()
    }

    fn replace_field_errors(&mut self, errors: ValidationErrors) {
        self.field_errors = errors
            .into_iter()
            .map(|e| (e.field.clone(), e))
            .collect();
    }

    // ---- category and attributes ----

    /// Start switching to `category_id`. Any outstanding fetch is superseded.
    pub fn begin_category_change(&mut self, category_id: CategoryId) -> SchemaRequest {
        self.draft.base.category_id = Some(category_id.clone());
        self.field_errors.remove("categoryId");
        self.resolver.begin(category_id)
    }

    /// Hand a schema fetch result back.
    ///
    /// Only the latest request is applied; it replaces the attribute values
    /// with fresh empty ones. Stale results are dropped and failures become
    /// notifications.
    pub fn apply_schema(
        &mut self,
        request: &SchemaRequest,
        result: Result<CategorySchemaResponse, CatalogError>,
    ) -> ResolveOutcome {
        let outcome = self.resolver.complete(request, result);
        match &outcome {
            ResolveOutcome::Applied { .. } => {
                self.draft.attributes = initial_values(self.resolver.definitions());
                self.field_errors.retain(|field, _| !field.starts_with("specs."));
            }
            ResolveOutcome::Stale => {}
            ResolveOutcome::Failed(e) => {
                let message = format!("Could not load attributes for this category: {}", e);
                self.notify(NotificationLevel::Error, message);
            }
        }
        outcome
    }

    /// Select a category and resolve its schema.
    pub async fn select_category(&mut self, category_id: CategoryId) -> ResolveOutcome {
        let request = self.begin_category_change(category_id);
        let result = self
            .backend
            .fetch_category_schema(&request.category_id)
            .await;
        self.apply_schema(&request, result)
    }

    fn binder(&self) -> AttributeBinder<'_> {
        AttributeBinder::new(self.resolver.definitions(), self.config.required_boolean)
    }

    fn hydrate(&mut self, specs: &[AttributeDetail]) {
        let mut values = std::mem::take(&mut self.draft.attributes);
        let applied = self.binder().hydrate(&mut values, specs);
        self.draft.attributes = values;
        debug!(applied, stored = specs.len(), "stored specs hydrated");
    }

    /// Bind an attribute value and re-validate that field.
    ///
    /// Returns the field's current validation error, if any. A value of the
    /// wrong shape is an error and leaves the draft untouched.
    pub fn set_attribute(
        &mut self,
        id: &AttributeId,
        value: AttrValue,
    ) -> Result<Option<&FieldError>, CatalogError> {
        let mut values = std::mem::take(&mut self.draft.attributes);
        let result = self.binder().set_value(&mut values, id, value);
        self.draft.attributes = values;

        let field = self
            .draft
            .attributes
            .iter()
            .find(|a| &a.id == id)
            .map(|a| a.field_path())
            .ok_or_else(|| CatalogError::UnknownAttribute(id.to_string()))?;
        match result? {
            Some(error) => {
                self.field_errors.insert(field.clone(), error);
            }
            None => {
                self.field_errors.remove(&field);
            }
        }
        Ok(self.field_errors.get(&field))
    }

    // ---- variant groups ----

    pub fn groups(&self) -> &[VariantGroup] {
        &self.draft.variant_groups
    }

    fn group_editor(&mut self) -> VariantGroupEditor<'_> {
        VariantGroupEditor::new(&mut self.draft.variant_groups)
    }

    /// Append an empty group. The matrix is left as is until the group has
    /// values.
    pub fn add_group(&mut self) -> GroupId {
        self.group_editor().add_group()
    }

    pub fn remove_group(&mut self, id: &GroupId) -> Result<&MatrixReport, CatalogError> {
        self.group_editor().remove_group(id)?;
        Ok(self.regenerate())
    }

    /// Rename a group. Names are not part of SKU keys, so the matrix is kept.
    pub fn set_group_name(&mut self, id: &GroupId, name: &str) -> Result<(), CatalogError> {
        let ProductDraft {
            attributes,
            variant_groups,
            ..
        } = &mut self.draft;
        VariantGroupEditor::new(variant_groups).set_group_name(
            id,
            name,
            attributes.iter().map(|a| a.label.as_str()),
        )
    }

    pub fn add_option_value(
        &mut self,
        group_id: &GroupId,
        text: &str,
    ) -> Result<OptionValueId, CatalogError> {
        let id = self.group_editor().add_option_value(group_id, text)?;
        self.regenerate();
        Ok(id)
    }

    /// Change an option's text; its rows keep their identity and pick up the
    /// new text.
    pub fn rename_option_value(
        &mut self,
        group_id: &GroupId,
        value_id: &OptionValueId,
        text: &str,
    ) -> Result<(), CatalogError> {
        self.group_editor()
            .rename_option_value(group_id, value_id, text)?;
        self.regenerate();
        Ok(())
    }

    pub fn deactivate_option_value(
        &mut self,
        group_id: &GroupId,
        value_id: &OptionValueId,
    ) -> Result<Deactivation, CatalogError> {
        let outcome = self
            .group_editor()
            .deactivate_option_value(group_id, value_id)?;
        self.regenerate();
        Ok(outcome)
    }

    // ---- SKU matrix ----

    pub fn skus(&self) -> &[SkuVariant] {
        &self.draft.skus
    }

    /// Editable fields of one row (prices, stock, code, image).
    pub fn sku_mut(&mut self, key: &SkuKey) -> Option<&mut SkuVariant> {
        self.draft.skus.iter_mut().find(|s| &s.key == key)
    }

    pub fn set_has_variants(&mut self, has_variants: bool) {
        self.draft.has_variants = has_variants;
        if has_variants {
            self.regenerate();
        } else {
            self.field_errors.remove("skus");
        }
    }

    /// Rebuild the matrix from the current groups, keeping matched rows.
    pub fn regenerate(&mut self) -> &MatrixReport {
        let was_ready = self
            .last_report
            .as_ref()
            .map_or(true, |r| r.status == MatrixStatus::Ready);

        let matrix = generate(&self.draft.variant_groups, &self.draft.skus);
        // Dropped rows release their image previews here.
        self.draft.skus = matrix.rows;

        if matrix.report.status == MatrixStatus::Ready {
            self.field_errors.remove("skus");
        } else if self.draft.has_variants && was_ready {
            self.notify(
                NotificationLevel::Warning,
                "Variants are incomplete: every group needs at least one active value",
            );
        }
        self.last_report.insert(matrix.report)
    }

    // ---- images ----

    /// Wrap a picked file, acquiring a preview URL for it.
    pub fn pick_image(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: impl Into<Arc<[u8]>>,
    ) -> ImageSource {
        ImageSource::File(ImageFile::new(&self.previews, file_name, content_type, bytes))
    }

    /// Replace the thumbnail; a superseded preview is released.
    pub fn set_thumbnail(&mut self, image: Option<ImageSource>) {
        self.draft.base.thumbnail = image;
        if self.draft.base.thumbnail.is_some() {
            self.field_errors.remove("thumbnail");
        }
    }

    pub fn add_gallery_image(&mut self, image: ImageSource) {
        self.draft.base.gallery.push(image);
        self.field_errors.remove("gallery");
    }

    pub fn remove_gallery_image(&mut self, index: usize) -> Option<ImageSource> {
        (index < self.draft.base.gallery.len()).then(|| self.draft.base.gallery.remove(index))
    }

    // ---- submission ----

    fn assembler(&self) -> SubmissionAssembler {
        SubmissionAssembler::new(self.config.clone())
    }

    /// Whether a submission may start: nothing is in flight.
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.resolver.in_flight()
    }

    /// Full validation pass; the result also becomes the editor's field errors.
    pub fn validate(&mut self) -> &BTreeMap<String, FieldError> {
        let errors = self.assembler().validate(&self.draft);
        self.replace_field_errors(errors);
        &self.field_errors
    }

    /// Validate and assemble without sending.
    pub fn assemble(&mut self) -> Result<ProductSubmission, CatalogError> {
        let result = self.assembler().assemble(&self.draft);
        match &result {
            Ok(_) => self.field_errors.clear(),
            Err(CatalogError::Validation(errors)) => self.replace_field_errors(errors.clone()),
            Err(_) => {}
        }
        result
    }

    /// Validate, assemble and lock the editor for sending.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, CatalogError> {
        if self.submitting {
            return Err(CatalogError::Busy("a submission is already in flight"));
        }
        if self.resolver.in_flight() {
            return Err(CatalogError::Busy("category attributes are still loading"));
        }
        let submission = self.assemble()?;
        self.submitting = true;
        Ok(PendingSubmission {
            submission,
            idempotency_key: self.idempotency_key.clone(),
        })
    }

    /// Unlock the editor with the backend's answer.
    ///
    /// On success the draft takes over the assigned ids, so the next save is
    /// an update, and a fresh idempotency key is minted for it.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
        result: Result<SubmissionReceipt, CatalogError>,
    ) -> Result<SubmissionReceipt, CatalogError> {
        self.submitting = false;
        match result {
            Ok(receipt) => {
                self.adopt_receipt(&pending.submission, &receipt);
                self.idempotency_key = IdempotencyKey::generate();
                let verb = if pending.submission.is_update() { "updated" } else { "created" };
                self.notify(NotificationLevel::Info, format!("Product {}", verb));
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, key = %pending.idempotency_key, "submission failed");
                self.notify(
                    NotificationLevel::Error,
                    format!("Saving failed, please try again: {}", e),
                );
                Err(e)
            }
        }
    }

    /// Validate, assemble and send the product.
    ///
    /// Validation failures never reach the backend. A failed send keeps the
    /// idempotency key, so resubmitting cannot create a duplicate.
    pub async fn submit(&mut self) -> Result<SubmissionReceipt, CatalogError> {
        let pending = self.begin_submit()?;
        let result = self
            .backend
            .submit_product(&pending.submission, &pending.idempotency_key)
            .await;
        self.finish_submit(pending, result)
    }

    fn adopt_receipt(&mut self, submission: &ProductSubmission, receipt: &SubmissionReceipt) {
        self.draft.product_id = Some(receipt.product_id.clone());
        if submission.has_variants {
            if receipt.sku_ids.len() == self.draft.skus.len() {
                for (sku, id) in self.draft.skus.iter_mut().zip(&receipt.sku_ids) {
                    sku.id = Some(id.clone());
                }
            } else {
                warn!(
                    sent = self.draft.skus.len(),
                    returned = receipt.sku_ids.len(),
                    "receipt SKU ids do not line up with the submitted rows"
                );
            }
            // Groups without active values were never sent.
            for group in &mut self.draft.variant_groups {
                let Some(sent) = submission.attributes.iter().find(|g| g.id == group.id) else {
                    continue;
                };
                group.is_old_data = true;
                for value in &mut group.values {
                    if sent.values.iter().any(|v| v.id == value.id) {
                        value.is_old_data = true;
                    }
                }
            }
        } else {
            self.draft.base_sku_id = receipt.sku_ids.first().cloned();
        }
        self.draft.loaded_sku_ids = receipt.sku_ids.clone();
        info!(
            product_id = %receipt.product_id,
            skus = receipt.sku_ids.len(),
            "submission accepted"
        );
    }
}
