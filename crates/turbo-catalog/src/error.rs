//! Catalog editor error types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Why a single field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// A required value is missing.
    Required,
    /// A name or value was blank.
    Empty,
    /// The value collides with an existing one.
    Duplicate,
    /// The value does not have the shape its data type requires.
    TypeMismatch,
    /// A composite structure (the variant matrix) is incomplete.
    Incomplete,
}

/// A field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path of the offending field (`name`, `specs.color`, `skus`).
    pub field: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn required(field: impl Into<String>, label: &str) -> Self {
        Self::new(field, FieldErrorKind::Required, format!("{} is required", label))
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered set of field errors collected during one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// First error reported for `field`, if any.
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), CatalogError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Errors that can occur while editing and submitting a product.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// One or more fields failed validation; submission is blocked.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Category schema or product was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport failure talking to the backend.
    #[error("Network error: {0}")]
    Network(String),

    /// Duplicate group name or option value; state left unchanged.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No attribute with this id in the current schema.
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// No variant group with this id.
    #[error("Unknown variant group: {0}")]
    UnknownGroup(String),

    /// No option value with this id in the group.
    #[error("Unknown option value {value} in group {group}")]
    UnknownOptionValue { group: String, value: String },

    /// A value of the wrong shape was bound to an attribute.
    #[error("Attribute {attribute} expects {expected}, got {got}")]
    TypeMismatch {
        attribute: String,
        expected: &'static str,
        got: &'static str,
    },

    /// A schema fetch or submission is already in flight.
    #[error("Editor is busy: {0}")]
    Busy(&'static str),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CatalogError {
    /// Single-field validation failure.
    pub fn field(field: impl Into<String>, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        CatalogError::Validation(FieldError::new(field, kind, message).into())
    }

    /// Errors that come from talking to the backend rather than from the draft.
    pub fn is_remote(&self) -> bool {
        matches!(self, CatalogError::NotFound(_) | CatalogError::Network(_))
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Serialization(e.to_string())
    }
}

impl From<ValidationErrors> for CatalogError {
    fn from(errors: ValidationErrors) -> Self {
        CatalogError::Validation(errors)
    }
}

#[cfg(feature = "http")]
impl From<turbo_data::FetchError> for CatalogError {
    fn from(e: turbo_data::FetchError) -> Self {
        match e {
            turbo_data::FetchError::HttpError { status: 404, message } => {
                CatalogError::NotFound(message)
            }
            turbo_data::FetchError::JsonError(msg) | turbo_data::FetchError::ParseError(msg) => {
                CatalogError::Serialization(msg)
            }
            other => CatalogError::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_lookup() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::required("name", "Name"));
        errors.push(FieldError::new("skus", FieldErrorKind::Incomplete, "no variants"));

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.for_field("name").unwrap().kind, FieldErrorKind::Required);
        assert!(errors.for_field("slug").is_none());
        assert_eq!(errors.to_string(), "name: Name is required; skus: no variants");
    }

    #[test]
    fn test_empty_errors_into_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
        let err = ValidationErrors::from(FieldError::required("slug", "Slug"))
            .into_result()
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(!err.is_remote());
    }
}
