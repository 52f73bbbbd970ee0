//! Attribute definitions resolved from a category schema.

use serde::{Deserialize, Serialize};

use crate::ids::{AttributeId, AttributeOptionId};
use crate::wire::AttributeConfig;

/// Data type of an attribute; selects the input and binding rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Text,
    Number,
    Date,
    Boolean,
    Select,
    MultiSelect,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "TEXT",
            DataType::Number => "NUMBER",
            DataType::Date => "DATE",
            DataType::Boolean => "BOOLEAN",
            DataType::Select => "SELECT",
            DataType::MultiSelect => "MULTI_SELECT",
        }
    }

    /// Whether the attribute carries an enumerated option list.
    pub fn has_options(&self) -> bool {
        matches!(self, DataType::Select | DataType::MultiSelect)
    }
}

/// One enumerated option of a SELECT / MULTI_SELECT attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeOption {
    pub id: AttributeOptionId,
    pub value: String,
    pub label: String,
}

/// An attribute that applies to products of the selected category.
///
/// Immutable: a category change replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub id: AttributeId,
    pub code: String,
    pub label: String,
    pub data_type: DataType,
    pub is_required: bool,
    pub is_filterable: bool,
    pub display_order: i32,
    pub unit: Option<String>,
    /// Active options only; empty for non-option types.
    pub options: Vec<AttributeOption>,
}

impl AttributeDefinition {
    pub fn option(&self, id: &AttributeOptionId) -> Option<&AttributeOption> {
        self.options.iter().find(|o| &o.id == id)
    }

    /// Find an option by id, then by value, then by label (case-insensitive).
    ///
    /// Stored product specs are not consistent about which of the three they hold.
    pub fn find_option(&self, needle: &str) -> Option<&AttributeOption> {
        self.options
            .iter()
            .find(|o| o.id.as_str() == needle)
            .or_else(|| self.options.iter().find(|o| o.value == needle))
            .or_else(|| {
                self.options
                    .iter()
                    .find(|o| o.label.eq_ignore_ascii_case(needle))
            })
    }
}

impl From<AttributeConfig> for AttributeDefinition {
    fn from(config: AttributeConfig) -> Self {
        let options = if config.data_type.has_options() {
            config
                .options_value
                .into_iter()
                .filter(|o| o.active)
                .map(|o| AttributeOption {
                    value: o.value.unwrap_or_else(|| o.label.clone()),
                    id: o.id,
                    label: o.label,
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            id: config.id,
            code: config.code,
            label: config.label,
            data_type: config.data_type,
            is_required: config.is_required,
            is_filterable: config.is_filterable,
            display_order: config.display_order,
            unit: config.unit.filter(|u| !u.trim().is_empty()),
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::AttributeConfigOption;

    fn select_config() -> AttributeConfig {
        AttributeConfig {
            id: "a1".into(),
            code: "color".into(),
            label: "Color".into(),
            is_required: false,
            is_filterable: true,
            display_order: 1,
            unit: Some("  ".into()),
            data_type: DataType::Select,
            options_value: vec![
                AttributeConfigOption {
                    id: "o1".into(),
                    value: None,
                    label: "Red".into(),
                    active: true,
                },
                AttributeConfigOption {
                    id: "o2".into(),
                    value: Some("blue".into()),
                    label: "Blue".into(),
                    active: false,
                },
            ],
        }
    }

    #[test]
    fn test_inactive_options_are_dropped() {
        let def = AttributeDefinition::from(select_config());
        assert_eq!(def.options.len(), 1);
        assert_eq!(def.options[0].value, "Red");
        assert!(def.unit.is_none());
    }

    #[test]
    fn test_find_option_by_id_value_or_label() {
        let def = AttributeDefinition::from(select_config());
        assert!(def.find_option("o1").is_some());
        assert!(def.find_option("red").is_some());
        assert!(def.find_option("Blue").is_none());
    }

    #[test]
    fn test_options_ignored_for_plain_types() {
        let mut config = select_config();
        config.data_type = DataType::Text;
        let def = AttributeDefinition::from(config);
        assert!(def.options.is_empty());
    }
}
