//! Draft validation and wire assembly.

use tracing::{info, warn};

use crate::attributes::validate_values;
use crate::config::EditorConfig;
use crate::draft::ProductDraft;
use crate::error::{CatalogError, FieldError, FieldErrorKind, ValidationErrors};
use crate::ids::{BrandId, CategoryId, SkuId};
use crate::variant::{SkuVariant, VariantGroup};

use super::coerce::spec_value;
use super::payload::{
    ProductSubmission, WireAttributeGroup, WireGroupValue, WireSku, WireSkuSpec, WireSpec,
};

/// Turns a [`ProductDraft`] into a [`ProductSubmission`].
///
/// Every problem is collected before anything is returned, so one pass
/// reports all blocking fields at once.
#[derive(Debug, Clone, Default)]
pub struct SubmissionAssembler {
    config: EditorConfig,
}

impl SubmissionAssembler {
    pub fn new(config: EditorConfig) -> Self {
        Self { config }
    }

    /// Validate the draft without building anything.
    pub fn validate(&self, draft: &ProductDraft) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let base = &draft.base;

        for (field, label, value) in [
            ("name", "Product name", base.name.as_str()),
            ("slug", "Slug", base.slug.as_str()),
            ("warranty", "Warranty", base.warranty.as_str()),
        ] {
            if value.trim().is_empty() {
                errors.push(FieldError::required(field, label));
            }
        }
        if base.brand_id.as_ref().map_or(true, BrandId::is_blank) {
            errors.push(FieldError::required("brandId", "Brand"));
        }
        if base.category_id.as_ref().map_or(true, CategoryId::is_blank) {
            errors.push(FieldError::required("categoryId", "Category"));
        }

        for error in validate_values(&draft.attributes, self.config.required_boolean) {
            errors.push(error);
        }

        if self.config.require_thumbnail && base.thumbnail.is_none() {
            errors.push(FieldError::required("thumbnail", "Thumbnail"));
        }
        if self.config.require_gallery && base.gallery.is_empty() {
            errors.push(FieldError::new(
                "gallery",
                FieldErrorKind::Required,
                "At least one gallery image is required",
            ));
        }
        if draft.has_variants && draft.skus.is_empty() {
            errors.push(FieldError::new(
                "skus",
                FieldErrorKind::Incomplete,
                "Variants are incomplete: every group needs at least one active value",
            ));
        }
        errors
    }

    /// Validate and build the submission. Nothing partial is ever returned.
    pub fn assemble(&self, draft: &ProductDraft) -> Result<ProductSubmission, CatalogError> {
        self.validate(draft).into_result()?;

        let base = &draft.base;
        let (Some(brand_id), Some(category_id)) = (base.brand_id.clone(), base.category_id.clone())
        else {
            // validate() already reported both.
            return Err(CatalogError::Validation(
                FieldError::required("categoryId", "Category").into(),
            ));
        };

        let specs = draft
            .attributes
            .iter()
            .map(|attribute| WireSpec {
                attribute_id: attribute.id.clone(),
                code: attribute.code.clone(),
                value: spec_value(attribute),
            })
            .collect();

        let (attributes, skus) = if draft.has_variants {
            let groups = draft
                .variant_groups
                .iter()
                .filter(|g| g.has_active_values())
                .map(wire_group)
                .collect();
            let skus = draft.skus.iter().map(wire_sku).collect();
            (groups, skus)
        } else {
            (Vec::new(), vec![self.single_sku(draft)])
        };

        let orphaned_sku_ids = orphaned(&draft.loaded_sku_ids, &skus);
        if !orphaned_sku_ids.is_empty() {
            warn!(
                orphaned = orphaned_sku_ids.len(),
                "saved skus are no longer part of the product and will not be sent"
            );
        }

        let submission = ProductSubmission {
            product_id: draft.product_id.clone(),
            name: base.name.trim().to_string(),
            slug: base.slug.trim().to_string(),
            brand_id,
            category_id,
            description: base.description.clone(),
            warranty: base.warranty.trim().to_string(),
            has_variants: draft.has_variants,
            thumbnail: base.thumbnail.clone(),
            gallery: base.gallery.clone(),
            specs,
            attributes,
            skus,
            orphaned_sku_ids,
        };
        info!(
            update = submission.is_update(),
            skus = submission.skus.len(),
            groups = submission.attributes.len(),
            files = submission.file_count(),
            "submission assembled"
        );
        Ok(submission)
    }

    fn single_sku(&self, draft: &ProductDraft) -> WireSku {
        let base = &draft.base;
        WireSku {
            id: draft.base_sku_id.clone(),
            sku_code: base.slug.trim().to_string(),
            name: base.name.trim().to_string(),
            price: base.price,
            cost_price: base.cost_price,
            original_price: base.original_price,
            stock: base.stock,
            active: true,
            discontinued: false,
            discontinued_reason: None,
            image: base.thumbnail.clone(),
            specs: Vec::new(),
        }
    }
}

fn wire_group(group: &VariantGroup) -> WireAttributeGroup {
    WireAttributeGroup {
        id: group.id.clone(),
        label: group.name.clone(),
        is_new: !group.is_old_data,
        values: group
            .values
            .iter()
            .map(|v| WireGroupValue {
                id: v.id.clone(),
                value: v.value.clone(),
                active: v.active,
                is_new: !v.is_old_data,
            })
            .collect(),
    }
}

fn wire_sku(sku: &SkuVariant) -> WireSku {
    WireSku {
        id: sku.id.clone(),
        sku_code: sku.sku_code.clone(),
        name: sku.name.clone(),
        price: sku.price,
        cost_price: sku.cost_price,
        original_price: sku.original_price,
        stock: sku.stock,
        active: sku.active,
        discontinued: sku.discontinued,
        discontinued_reason: sku.discontinued_reason.clone(),
        image: sku.image.clone(),
        specs: sku
            .attributes
            .iter()
            .map(|s| WireSkuSpec {
                group_id: s.group_id.clone(),
                value_id: s.option_id.clone(),
                value: s.value.clone(),
            })
            .collect(),
    }
}

fn orphaned(loaded: &[SkuId], skus: &[WireSku]) -> Vec<SkuId> {
    loaded
        .iter()
        .filter(|id| !skus.iter().any(|s| s.id.as_ref() == Some(*id)))
        .cloned()
        .collect()
}
