//! Assembly-time coercion of attribute values.
//!
//! Values stay typed strings while editing. Only when a submission is built
//! are `"true"`/`"false"` turned into booleans and numeric-looking text into
//! numbers. Option lists are sent as they are.

use serde_json::{Number, Value};

use crate::attributes::{AttrValue, AttributeValue};
use crate::schema::DataType;

/// Wire value for one attribute.
pub fn spec_value(attribute: &AttributeValue) -> Value {
    match &attribute.value {
        AttrValue::Empty if attribute.data_type == DataType::Boolean => Value::Bool(false),
        AttrValue::Empty => Value::Null,
        AttrValue::Bool(b) => Value::Bool(*b),
        AttrValue::Text(text) => coerce_text(text),
        AttrValue::Option(id) => coerce_text(id.as_str()),
        AttrValue::Options(ids) => Value::Array(
            ids.iter()
                .map(|id| Value::String(id.as_str().to_string()))
                .collect(),
        ),
    }
}

/// Coerce one scalar string.
pub fn coerce_text(text: &str) -> Value {
    let trimmed = text.trim();
    match trimmed {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if !looks_numeric(trimmed) {
        return Value::String(text.to_string());
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(text.to_string()))
}

/// Plain decimal notation: optional sign, digits, optional fraction.
///
/// Leading zeros ("007") keep the value textual, as do exponents and
/// thousands separators.
fn looks_numeric(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if int_part.len() > 1 && int_part.starts_with('0') {
        return false;
    }
    match frac_part {
        Some(f) => !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_booleans_and_numbers() {
        assert_eq!(coerce_text("true"), json!(true));
        assert_eq!(coerce_text(" false "), json!(false));
        assert_eq!(coerce_text("6.1"), json!(6.1));
        assert_eq!(coerce_text("128"), json!(128));
        assert_eq!(coerce_text("-3"), json!(-3));
        assert_eq!(coerce_text("0.5"), json!(0.5));
    }

    #[test]
    fn test_text_stays_text() {
        for raw in ["True", "1e3", "007", "1,5", "12.", ".5", "6.1 inch", "", "-"] {
            assert_eq!(coerce_text(raw), json!(raw), "{:?}", raw);
        }
    }

    #[test]
    fn test_option_lists_untouched() {
        let mut attr = AttributeValue {
            id: "a".into(),
            code: "ports".into(),
            label: "Ports".into(),
            data_type: DataType::MultiSelect,
            unit: None,
            display_order: 0,
            is_required: false,
            value: AttrValue::Options(vec!["1".into(), "2".into()]),
            selected_label: None,
        };
        assert_eq!(spec_value(&attr), json!(["1", "2"]));

        attr.data_type = DataType::Boolean;
        attr.value = AttrValue::Empty;
        assert_eq!(spec_value(&attr), json!(false));

        attr.data_type = DataType::Select;
        assert_eq!(spec_value(&attr), json!(null));
        attr.value = AttrValue::Option("42".into());
        assert_eq!(spec_value(&attr), json!(42));
    }
}
