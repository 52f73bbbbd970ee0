//! Newtype IDs for type-safe identifiers.
//!
//! The editor juggles several string-keyed namespaces at once (attribute ids,
//! option ids, group ids, option-value ids, SKU ids). Newtypes keep a group id
//! from being passed where an option-value id is expected when building
//! composite SKU keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh client-side ID.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }

            /// Whether the ID is blank (backends send `""` for "not saved yet").
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Product category.
    CategoryId
);
define_id!(
    /// Attribute definition within a category schema.
    AttributeId
);
define_id!(
    /// Enumerated option of a SELECT / MULTI_SELECT attribute.
    AttributeOptionId
);
define_id!(
    /// Admin-defined variant group ("Color", "Storage").
    GroupId
);
define_id!(
    /// Option value inside a variant group ("Red", "128GB").
    OptionValueId
);
define_id!(
    /// Persisted SKU.
    SkuId
);
define_id!(ProductId);
define_id!(BrandId);
define_id!(
    /// Client-generated key that lets the backend deduplicate retried submissions.
    IdempotencyKey
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generation_is_unique() {
        let a = GroupId::generate();
        let b = GroupId::generate();
        assert_ne!(a, b);
        assert!(!a.is_blank());
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = SkuId::new("sku-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"sku-1\"");
        let back: SkuId = serde_json::from_str("\"sku-1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_blank_id() {
        assert!(SkuId::new("  ").is_blank());
        assert!(!SkuId::new("42").is_blank());
    }
}
