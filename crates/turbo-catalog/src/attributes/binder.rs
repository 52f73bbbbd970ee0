//! Binding typed values into the draft's attribute list.

use serde_json::Value;
use tracing::warn;

use crate::config::RequiredBooleanPolicy;
use crate::error::{CatalogError, FieldError, FieldErrorKind, ValidationErrors};
use crate::ids::{AttributeId, AttributeOptionId};
use crate::schema::{AttributeDefinition, DataType};
use crate::wire::AttributeDetail;

use super::value::{AttrValue, AttributeValue};

/// Separator used when mirroring MULTI_SELECT labels.
pub const LABEL_SEPARATOR: &str = ", ";

/// A value accepted by a data-type handler, plus its mirrored label.
#[derive(Debug)]
struct Bound {
    value: AttrValue,
    label: Option<String>,
}

/// Binds values against the definitions of the current category.
#[derive(Debug, Clone, Copy)]
pub struct AttributeBinder<'a> {
    definitions: &'a [AttributeDefinition],
    policy: RequiredBooleanPolicy,
}

impl<'a> AttributeBinder<'a> {
    pub fn new(definitions: &'a [AttributeDefinition], policy: RequiredBooleanPolicy) -> Self {
        Self {
            definitions,
            policy,
        }
    }

    fn definition(&self, id: &AttributeId) -> Result<&'a AttributeDefinition, CatalogError> {
        self.definitions
            .iter()
            .find(|d| &d.id == id)
            .ok_or_else(|| CatalogError::UnknownAttribute(id.to_string()))
    }

    /// Bind `value` to attribute `id` and re-validate that field only.
    ///
    /// A value of the wrong shape is rejected and the draft is left unchanged.
    /// On success returns the field's validation error, if any.
    pub fn set_value(
        &self,
        values: &mut [AttributeValue],
        id: &AttributeId,
        value: AttrValue,
    ) -> Result<Option<FieldError>, CatalogError> {
        let definition = self.definition(id)?;
        let slot = values
            .iter_mut()
            .find(|v| &v.id == id)
            .ok_or_else(|| CatalogError::UnknownAttribute(id.to_string()))?;

        let bound = match definition.data_type {
            DataType::Text | DataType::Number | DataType::Date => bind_text(definition, value)?,
            DataType::Boolean => bind_boolean(definition, value)?,
            DataType::Select => bind_select(definition, value)?,
            DataType::MultiSelect => bind_multi_select(definition, value)?,
        };

        slot.value = bound.value;
        slot.selected_label = bound.label;
        Ok(validate_value(slot, self.policy))
    }

    /// Bind stored product specs onto freshly initialized values.
    ///
    /// Returns how many specs were applied. Specs for attributes that are not
    /// in the current schema, or whose value does not fit, are skipped.
    pub fn hydrate(&self, values: &mut [AttributeValue], specs: &[AttributeDetail]) -> usize {
        let mut applied = 0;
        for spec in specs {
            let Ok(definition) = self.definition(&spec.id) else {
                warn!(attribute_id = %spec.id, "stored spec not in category schema");
                continue;
            };
            let Some(value) = value_from_json(definition, &spec.value) else {
                continue;
            };
            match self.set_value(values, &spec.id, value) {
                Ok(_) => applied += 1,
                Err(e) => warn!(attribute_id = %spec.id, error = %e, "stored spec rejected"),
            }
        }
        applied
    }
}

fn mismatch(definition: &AttributeDefinition, value: &AttrValue) -> CatalogError {
    CatalogError::TypeMismatch {
        attribute: definition.code.clone(),
        expected: match definition.data_type {
            DataType::Text | DataType::Number | DataType::Date => "text",
            DataType::Boolean => "boolean",
            DataType::Select => "option",
            DataType::MultiSelect => "option list",
        },
        got: value.kind(),
    }
}

fn unknown_option(definition: &AttributeDefinition, id: &AttributeOptionId) -> CatalogError {
    CatalogError::field(
        format!("specs.{}", definition.code),
        FieldErrorKind::TypeMismatch,
        format!("{} has no option {}", definition.label, id),
    )
}

fn bind_text(definition: &AttributeDefinition, value: AttrValue) -> Result<Bound, CatalogError> {
    match value {
        // Raw input is kept as typed, including surrounding whitespace.
        AttrValue::Text(text) => Ok(Bound {
            value: AttrValue::Text(text),
            label: None,
        }),
        AttrValue::Empty => Ok(Bound {
            value: AttrValue::Text(String::new()),
            label: None,
        }),
        other => Err(mismatch(definition, &other)),
    }
}

fn bind_boolean(definition: &AttributeDefinition, value: AttrValue) -> Result<Bound, CatalogError> {
    match value {
        AttrValue::Bool(_) | AttrValue::Empty => Ok(Bound { value, label: None }),
        other => Err(mismatch(definition, &other)),
    }
}

fn bind_select(definition: &AttributeDefinition, value: AttrValue) -> Result<Bound, CatalogError> {
    match value {
        AttrValue::Option(id) => {
            let option = definition
                .option(&id)
                .ok_or_else(|| unknown_option(definition, &id))?;
            Ok(Bound {
                label: Some(option.label.clone()),
                value: AttrValue::Option(id),
            })
        }
        AttrValue::Empty => Ok(Bound {
            value: AttrValue::Empty,
            label: None,
        }),
        other => Err(mismatch(definition, &other)),
    }
}

fn bind_multi_select(
    definition: &AttributeDefinition,
    value: AttrValue,
) -> Result<Bound, CatalogError> {
    let ids = match value {
        AttrValue::Options(ids) => ids,
        AttrValue::Empty => Vec::new(),
        other => return Err(mismatch(definition, &other)),
    };

    let mut chosen: Vec<AttributeOptionId> = Vec::with_capacity(ids.len());
    let mut labels: Vec<&str> = Vec::with_capacity(ids.len());
    for id in ids {
        if chosen.contains(&id) {
            continue;
        }
        let option = definition
            .option(&id)
            .ok_or_else(|| unknown_option(definition, &id))?;
        labels.push(&option.label);
        chosen.push(id);
    }

    let label = if labels.is_empty() {
        None
    } else {
        Some(labels.join(LABEL_SEPARATOR))
    };
    Ok(Bound {
        value: AttrValue::Options(chosen),
        label,
    })
}

/// Validate a single attribute value.
pub fn validate_value(value: &AttributeValue, policy: RequiredBooleanPolicy) -> Option<FieldError> {
    if !value.is_required {
        return None;
    }

    let satisfied = match (value.data_type, &value.value) {
        (DataType::Boolean, AttrValue::Bool(b)) => match policy {
            RequiredBooleanPolicy::ExplicitChoice => true,
            RequiredBooleanPolicy::MustBeTrue => *b,
        },
        (DataType::Boolean, _) => false,
        (_, v) => !v.is_blank(),
    };

    if satisfied {
        None
    } else {
        Some(FieldError::required(value.field_path(), &value.label))
    }
}

/// Validate every attribute value, in display order.
pub fn validate_values(values: &[AttributeValue], policy: RequiredBooleanPolicy) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for value in values {
        if let Some(error) = validate_value(value, policy) {
            errors.push(error);
        }
    }
    errors
}

fn json_scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Convert a stored spec value into the shape its data type binds.
fn value_from_json(definition: &AttributeDefinition, value: &Value) -> Option<AttrValue> {
    if value.is_null() {
        return None;
    }
    match definition.data_type {
        DataType::Text | DataType::Number | DataType::Date => {
            json_scalar_text(value).map(AttrValue::Text)
        }
        DataType::Boolean => match value {
            Value::Bool(b) => Some(AttrValue::Bool(*b)),
            Value::String(s) if s == "true" => Some(AttrValue::Bool(true)),
            Value::String(s) if s == "false" => Some(AttrValue::Bool(false)),
            _ => None,
        },
        DataType::Select => json_scalar_text(value)
            .and_then(|text| definition.find_option(&text))
            .map(|o| AttrValue::Option(o.id.clone())),
        DataType::MultiSelect => {
            let items = match value {
                Value::Array(items) => items.iter().filter_map(json_scalar_text).collect(),
                other => json_scalar_text(other).into_iter().collect::<Vec<_>>(),
            };
            let ids = items
                .iter()
                .filter_map(|text| definition.find_option(text))
                .map(|o| o.id.clone())
                .collect();
            Some(AttrValue::Options(ids))
        }
    }
}
