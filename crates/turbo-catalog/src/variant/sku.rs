//! SKU rows of the variant matrix.

use serde::Serialize;

use crate::ids::{GroupId, OptionValueId, SkuId};
use crate::media::ImageSource;
use crate::money::Money;

use super::key::SkuKey;

/// One `(group, option)` choice that defines a SKU row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkuSelection {
    pub group_id: GroupId,
    pub option_id: OptionValueId,
    /// Option display text at the time the row was generated.
    pub value: String,
}

/// A row of the variant matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkuVariant {
    /// Identity across regenerations; see [`SkuKey`].
    pub key: SkuKey,
    /// Persisted SKU id; `None` until first saved.
    pub id: Option<SkuId>,
    pub name: String,
    pub sku_code: String,
    pub price: Option<Money>,
    pub cost_price: Option<Money>,
    pub original_price: Option<Money>,
    pub stock: Option<i64>,
    pub active: bool,
    pub discontinued: bool,
    pub discontinued_reason: Option<String>,
    pub image: Option<ImageSource>,
    /// Selections in group-definition order.
    pub attributes: Vec<SkuSelection>,
}

impl SkuVariant {
    /// A brand-new row for a combination that has no saved SKU.
    pub fn draft(attributes: Vec<SkuSelection>) -> Self {
        Self {
            key: key_for(&attributes),
            id: None,
            name: build_name(&attributes),
            sku_code: String::new(),
            price: None,
            cost_price: None,
            original_price: None,
            stock: None,
            active: true,
            discontinued: false,
            discontinued_reason: None,
            image: None,
            attributes,
        }
    }

    /// Carry this row's editable state over onto a freshly generated
    /// combination with the same key.
    pub fn carried_over(&self, attributes: Vec<SkuSelection>) -> Self {
        Self {
            key: self.key.clone(),
            attributes,
            ..self.clone()
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// Composite key for a list of selections.
pub fn key_for(selections: &[SkuSelection]) -> SkuKey {
    SkuKey::from_pairs(selections.iter().map(|s| (&s.group_id, &s.option_id)))
}

/// Default row name built from the option texts ("Red / 128GB").
pub fn build_name(selections: &[SkuSelection]) -> String {
    if selections.is_empty() {
        "Default".to_string()
    } else {
        selections
            .iter()
            .map(|s| s.value.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(group: &str, option: &str, value: &str) -> SkuSelection {
        SkuSelection {
            group_id: group.into(),
            option_id: option.into(),
            value: value.into(),
        }
    }

    #[test]
    fn test_draft_defaults() {
        let sku = SkuVariant::draft(vec![
            selection("color", "red", "Red"),
            selection("storage", "s128", "128GB"),
        ]);
        assert!(sku.is_new());
        assert!(sku.active);
        assert_eq!(sku.name, "Red / 128GB");
        assert_eq!(sku.key.as_str(), "color:red|storage:s128");
        assert!(sku.price.is_none() && sku.stock.is_none() && sku.image.is_none());
    }

    #[test]
    fn test_carried_over_refreshes_attributes_only() {
        let mut saved = SkuVariant::draft(vec![selection("color", "red", "Red")]);
        saved.id = Some("sku-9".into());
        saved.price = Some(Money::from_major(10));

        let next = saved.carried_over(vec![selection("color", "red", "Crimson")]);
        assert_eq!(next.id, saved.id);
        assert_eq!(next.price, saved.price);
        assert_eq!(next.name, "Red");
        assert_eq!(next.attributes[0].value, "Crimson");
    }
}
