//! Editable attribute values.

use serde::{Deserialize, Serialize};

use crate::ids::{AttributeId, AttributeOptionId};
use crate::schema::{AttributeDefinition, DataType};

/// The value bound to one attribute while editing.
///
/// TEXT, NUMBER and DATE are all held as raw input text; NUMBER is only
/// coerced when the submission is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttrValue {
    /// Nothing chosen yet.
    #[default]
    Empty,
    Text(String),
    Bool(bool),
    Option(AttributeOptionId),
    Options(Vec<AttributeOptionId>),
}

impl AttrValue {
    /// Initial value for a freshly resolved attribute.
    ///
    /// BOOLEAN starts unset rather than `false` so an explicit "No" can be told
    /// apart from no choice at all.
    pub fn empty_for(data_type: DataType) -> Self {
        match data_type {
            DataType::Text | DataType::Number | DataType::Date => AttrValue::Text(String::new()),
            DataType::Boolean | DataType::Select => AttrValue::Empty,
            DataType::MultiSelect => AttrValue::Options(Vec::new()),
        }
    }

    /// Whether the value carries no usable content.
    pub fn is_blank(&self) -> bool {
        match self {
            AttrValue::Empty => true,
            AttrValue::Text(s) => s.trim().is_empty(),
            AttrValue::Bool(_) => false,
            AttrValue::Option(id) => id.is_blank(),
            AttrValue::Options(ids) => ids.is_empty(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AttrValue::Empty => "empty",
            AttrValue::Text(_) => "text",
            AttrValue::Bool(_) => "boolean",
            AttrValue::Option(_) => "option",
            AttrValue::Options(_) => "option list",
        }
    }
}

/// One attribute of the product draft, paired with its definition's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub id: AttributeId,
    pub code: String,
    pub label: String,
    pub data_type: DataType,
    pub unit: Option<String>,
    pub display_order: i32,
    pub is_required: bool,
    pub value: AttrValue,
    /// Display label(s) of the chosen option(s), comma-joined for MULTI_SELECT.
    pub selected_label: Option<String>,
}

impl AttributeValue {
    /// Fresh value for a definition.
    pub fn for_definition(definition: &AttributeDefinition) -> Self {
        Self {
            id: definition.id.clone(),
            code: definition.code.clone(),
            label: definition.label.clone(),
            data_type: definition.data_type,
            unit: definition.unit.clone(),
            display_order: definition.display_order,
            is_required: definition.is_required,
            value: AttrValue::empty_for(definition.data_type),
            selected_label: None,
        }
    }

    /// Form field path used in validation errors.
    pub fn field_path(&self) -> String {
        format!("specs.{}", self.code)
    }
}

/// Build one value per definition, all initialized empty.
pub fn initial_values(definitions: &[AttributeDefinition]) -> Vec<AttributeValue> {
    definitions.iter().map(AttributeValue::for_definition).collect()
}
