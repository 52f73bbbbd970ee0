//! Wire shape of a product create/update submission.

use serde::Serialize;

use crate::ids::{AttributeId, BrandId, CategoryId, GroupId, OptionValueId, ProductId, SkuId};
use crate::media::ImageSource;
use crate::money::Money;

/// One flattened attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSpec {
    pub attribute_id: AttributeId,
    pub code: String,
    /// Coerced value: booleans and numbers for scalar text, arrays untouched.
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGroupValue {
    pub id: OptionValueId,
    pub value: String,
    pub active: bool,
    pub is_new: bool,
}

/// A variant group definition ("attributes" on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAttributeGroup {
    pub id: GroupId,
    pub label: String,
    pub is_new: bool,
    pub values: Vec<WireGroupValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSkuSpec {
    pub group_id: GroupId,
    pub value_id: OptionValueId,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSku {
    /// Present on update, absent on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<SkuId>,
    pub sku_code: String,
    pub name: String,
    pub price: Option<Money>,
    pub cost_price: Option<Money>,
    pub original_price: Option<Money>,
    pub stock: Option<i64>,
    pub active: bool,
    pub discontinued: bool,
    pub discontinued_reason: Option<String>,
    pub image: Option<ImageSource>,
    pub specs: Vec<WireSkuSpec>,
}

/// A validated, fully assembled submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSubmission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub name: String,
    pub slug: String,
    pub brand_id: BrandId,
    pub category_id: CategoryId,
    pub description: String,
    pub warranty: String,
    pub has_variants: bool,
    pub thumbnail: Option<ImageSource>,
    pub gallery: Vec<ImageSource>,
    pub specs: Vec<WireSpec>,
    pub attributes: Vec<WireAttributeGroup>,
    pub skus: Vec<WireSku>,
    /// Saved SKUs no longer in the matrix. Reported locally, never sent.
    #[serde(skip)]
    pub orphaned_sku_ids: Vec<SkuId>,
}

impl ProductSubmission {
    pub fn is_update(&self) -> bool {
        self.product_id.is_some()
    }

    /// Files that will be uploaded with this submission.
    pub fn file_count(&self) -> usize {
        let is_file = |image: &ImageSource| matches!(image, ImageSource::File(_));
        usize::from(self.thumbnail.as_ref().is_some_and(is_file))
            + self.gallery.iter().filter(|g| is_file(*g)).count()
            + self
                .skus
                .iter()
                .filter(|s| s.image.as_ref().is_some_and(is_file))
                .count()
    }
}
