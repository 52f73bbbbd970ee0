//! Product attribute values bound against the category schema.

mod binder;
mod value;

pub use binder::{validate_value, validate_values, AttributeBinder, LABEL_SEPARATOR};
pub use value::{initial_values, AttrValue, AttributeValue};
