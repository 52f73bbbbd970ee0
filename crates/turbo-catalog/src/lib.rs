//! Product attribute and SKU variant configuration for the TurboCommerce
//! admin back office.
//!
//! This crate holds everything behind the product create/edit form:
//!
//! - **Schema**: attribute definitions resolved per category, last request wins
//! - **Attributes**: typed value binding with per-field validation
//! - **Variants**: option groups and the SKU matrix reconciled by composite key
//! - **Submission**: validation and assembly of the create/update payload
//! - **Editor**: [`ProductEditor`] tying the above to a [`CatalogBackend`]
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_catalog::prelude::*;
//!
//! let backend = InMemoryBackend::new().with_schema("phones", schema);
//! let mut editor = ProductEditor::new(backend, EditorConfig::default());
//! editor.select_category("phones".into()).await;
//!
//! editor.set_has_variants(true);
//! let color = editor.add_group();
//! editor.set_group_name(&color, "Color")?;
//! editor.add_option_value(&color, "Red")?;
//! editor.add_option_value(&color, "Blue")?;
//! assert_eq!(editor.skus().len(), 2);
//!
//! let receipt = editor.submit().await?;
//! ```

pub mod attributes;
pub mod backend;
pub mod config;
pub mod draft;
pub mod editor;
pub mod error;
pub mod ids;
pub mod media;
pub mod money;
pub mod schema;
pub mod submission;
pub mod variant;
pub mod wire;

pub use backend::{CatalogBackend, InMemoryBackend};
pub use config::{EditorConfig, RequiredBooleanPolicy};
pub use editor::{Notification, NotificationLevel, PendingSubmission, ProductEditor};
pub use error::{CatalogError, FieldError, FieldErrorKind, ValidationErrors};
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::backend::{CatalogBackend, InMemoryBackend};
    pub use crate::config::{EditorConfig, RequiredBooleanPolicy};
    pub use crate::draft::{ProductBase, ProductDraft};
    pub use crate::editor::{Notification, NotificationLevel, ProductEditor};
    pub use crate::error::{CatalogError, FieldError, FieldErrorKind, ValidationErrors};
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Schema and attributes
    pub use crate::attributes::{AttrValue, AttributeBinder, AttributeValue};
    pub use crate::schema::{AttributeDefinition, DataType, SchemaResolver};

    // Variants
    pub use crate::variant::{
        MatrixReport, SkuKey, SkuVariant, VariantGroup, VariantGroupEditor,
    };

    // Submission
    pub use crate::media::{ImageFile, ImageSource, PreviewRegistry};
    pub use crate::submission::{FormPart, ProductSubmission, SubmissionAssembler};
}
