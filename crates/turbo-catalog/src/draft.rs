//! The product being edited.

use serde::Serialize;
use tracing::{debug, warn};

use crate::attributes::AttributeValue;
use crate::ids::{BrandId, CategoryId, ProductId, SkuId};
use crate::media::ImageSource;
use crate::money::Money;
use crate::variant::{persisted_rows, SkuVariant, VariantGroup};
use crate::wire::ProductDetail;

/// Base product fields, also the source of the synthesized SKU of a
/// product without variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductBase {
    pub name: String,
    pub slug: String,
    pub brand_id: Option<BrandId>,
    pub category_id: Option<CategoryId>,
    pub description: String,
    pub warranty: String,
    pub price: Option<Money>,
    pub cost_price: Option<Money>,
    pub original_price: Option<Money>,
    pub stock: Option<i64>,
    pub thumbnail: Option<ImageSource>,
    pub gallery: Vec<ImageSource>,
}

/// Working state of one product form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductDraft {
    /// `None` while creating.
    pub product_id: Option<ProductId>,
    pub base: ProductBase,
    pub attributes: Vec<AttributeValue>,
    pub variant_groups: Vec<VariantGroup>,
    pub skus: Vec<SkuVariant>,
    pub has_variants: bool,
    /// Id of the single saved SKU of a product without variants.
    pub base_sku_id: Option<SkuId>,
    /// Every SKU id the product had when it was loaded.
    pub loaded_sku_ids: Vec<SkuId>,
}

impl ProductDraft {
    /// Empty draft for the create form.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_edit(&self) -> bool {
        self.product_id.is_some()
    }

    /// Build a draft from a saved product.
    ///
    /// Attribute values are left empty; they are hydrated once the category
    /// schema is known. Saved SKUs become the previous matrix so the first
    /// regeneration keeps their identity.
    pub fn from_detail(detail: &ProductDetail) -> Self {
        let variant_groups: Vec<VariantGroup> = detail
            .variant_groups
            .iter()
            .cloned()
            .map(VariantGroup::from)
            .collect();
        let loaded_sku_ids: Vec<SkuId> = detail.skus.iter().map(|s| s.id.clone()).collect();

        let mut base = ProductBase {
            name: detail.name.clone(),
            slug: detail.slug.clone(),
            brand_id: detail.brand_id.clone(),
            category_id: detail.category_id.clone(),
            description: detail.description.clone().unwrap_or_default(),
            warranty: detail.warranty.clone().unwrap_or_default(),
            thumbnail: detail.thumbnail.clone().map(ImageSource::url),
            gallery: detail.gallery.iter().cloned().map(ImageSource::url).collect(),
            ..ProductBase::default()
        };

        let single = match detail.skus.as_slice() {
            [only] if only.selections.is_empty() && variant_groups.is_empty() => Some(only),
            _ => None,
        };

        if let Some(sku) = single {
            base.price = sku.price;
            base.cost_price = sku.cost_price;
            base.original_price = sku.original_price;
            base.stock = sku.stock;
            debug!(product_id = %detail.id, sku_id = %sku.id, "loaded product without variants");
            return Self {
                product_id: Some(detail.id.clone()),
                base,
                attributes: Vec::new(),
                variant_groups,
                skus: Vec::new(),
                has_variants: false,
                base_sku_id: Some(sku.id.clone()),
                loaded_sku_ids,
            };
        }

        let variant_skus: Vec<_> = detail
            .skus
            .iter()
            .filter(|s| !s.selections.is_empty())
            .cloned()
            .collect();
        if variant_skus.len() != detail.skus.len() {
            warn!(
                product_id = %detail.id,
                skipped = detail.skus.len() - variant_skus.len(),
                "saved skus without selections left out of the variant matrix"
            );
        }
        let (skus, unresolved) = persisted_rows(&variant_groups, &variant_skus);
        if !unresolved.is_empty() {
            warn!(
                product_id = %detail.id,
                skus = unresolved.len(),
                "saved skus could not be placed in the variant matrix"
            );
        }

        Self {
            product_id: Some(detail.id.clone()),
            base,
            attributes: Vec::new(),
            has_variants: !variant_groups.is_empty() || !skus.is_empty(),
            variant_groups,
            skus,
            base_sku_id: None,
            loaded_sku_ids,
        }
    }

    /// Labels of the current attributes, for group-name collision checks.
    pub fn attribute_labels(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{GroupValueDetail, SelectionDetail, SkuDetail, VariantGroupDetail};

    fn sku(id: &str, selections: &[(&str, &str)]) -> SkuDetail {
        SkuDetail {
            id: id.into(),
            sku_code: id.to_uppercase(),
            name: String::new(),
            price: Some(Money::from_major(100)),
            cost_price: Some(Money::from_major(60)),
            original_price: None,
            stock: Some(5),
            active: true,
            discontinued: false,
            discontinued_reason: None,
            thumbnail: None,
            selections: selections
                .iter()
                .map(|(g, v)| SelectionDetail {
                    group_id: (*g).into(),
                    value_id: (*v).into(),
                })
                .collect(),
        }
    }

    fn detail() -> ProductDetail {
        ProductDetail {
            id: "p1".into(),
            name: "Phone".into(),
            slug: "phone".into(),
            brand_id: Some("b1".into()),
            category_id: Some("c1".into()),
            description: None,
            warranty: Some("12 months".into()),
            thumbnail: Some("https://cdn/phone.png".into()),
            gallery: vec!["https://cdn/1.png".into()],
            specs: Vec::new(),
            variant_groups: Vec::new(),
            skus: Vec::new(),
        }
    }

    #[test]
    fn test_single_sku_product_keeps_base_sku() {
        let mut d = detail();
        d.skus.push(sku("s1", &[]));
        let draft = ProductDraft::from_detail(&d);

        assert!(!draft.has_variants);
        assert!(draft.is_edit());
        assert_eq!(draft.base_sku_id, Some(SkuId::new("s1")));
        assert_eq!(draft.base.price, Some(Money::from_major(100)));
        assert_eq!(draft.base.stock, Some(5));
        assert_eq!(draft.base.warranty, "12 months");
        assert_eq!(
            draft.base.thumbnail.as_ref().map(|t| t.display_url()),
            Some("https://cdn/phone.png")
        );
    }

    #[test]
    fn test_variant_product_seeds_matrix() {
        let mut d = detail();
        d.variant_groups.push(VariantGroupDetail {
            id: "color".into(),
            label: "Color".into(),
            values: vec![
                GroupValueDetail { id: "red".into(), value: "Red".into(), active: true },
                GroupValueDetail { id: "blue".into(), value: "Blue".into(), active: true },
            ],
        });
        d.skus.push(sku("s1", &[("color", "red")]));
        d.skus.push(sku("s2", &[("color", "blue")]));
        d.skus.push(sku("s3", &[("color", "green")]));

        let draft = ProductDraft::from_detail(&d);
        assert!(draft.has_variants);
        assert!(draft.base_sku_id.is_none());
        assert_eq!(draft.skus.len(), 2);
        assert_eq!(draft.loaded_sku_ids.len(), 3);
        assert_eq!(draft.skus[0].key.as_str(), "color:red");
        assert!(draft.variant_groups[0].is_old_data);
    }
}
