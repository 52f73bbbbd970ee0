//! Backend boundary shapes (JSON, camelCase).
//!
//! These mirror what the admin API returns; the editor converts them into its
//! own draft types right after fetching and never mutates them.

use serde::{Deserialize, Serialize};

use crate::ids::{
    AttributeId, AttributeOptionId, BrandId, CategoryId, GroupId, OptionValueId, ProductId, SkuId,
};
use crate::money::Money;
use crate::schema::DataType;

fn default_true() -> bool {
    true
}

/// Response of the category schema fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySchemaResponse {
    #[serde(default)]
    pub attribute_configs: Vec<AttributeConfig>,
}

/// One attribute as configured on a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeConfig {
    pub id: AttributeId,
    pub code: String,
    pub label: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_filterable: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub unit: Option<String>,
    pub data_type: DataType,
    #[serde(default)]
    pub options_value: Vec<AttributeConfigOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeConfigOption {
    pub id: AttributeOptionId,
    /// Machine value; older backends only send `label`.
    #[serde(default)]
    pub value: Option<String>,
    pub label: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Product as returned by the detail endpoint (edit mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub brand_id: Option<BrandId>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub warranty: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub specs: Vec<AttributeDetail>,
    #[serde(default)]
    pub variant_groups: Vec<VariantGroupDetail>,
    #[serde(default)]
    pub skus: Vec<SkuDetail>,
}

/// A stored attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDetail {
    #[serde(alias = "attributeId")]
    pub id: AttributeId,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantGroupDetail {
    pub id: GroupId,
    pub label: String,
    #[serde(default)]
    pub values: Vec<GroupValueDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupValueDetail {
    pub id: OptionValueId,
    pub value: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuDetail {
    pub id: SkuId,
    #[serde(default)]
    pub sku_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub cost_price: Option<Money>,
    #[serde(default)]
    pub original_price: Option<Money>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub discontinued: bool,
    #[serde(default)]
    pub discontinued_reason: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub selections: Vec<SelectionDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionDetail {
    pub group_id: GroupId,
    pub value_id: OptionValueId,
}

/// What the backend returns after a successful create/update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub product_id: ProductId,
    #[serde(default)]
    pub sku_ids: Vec<SkuId>,
}
