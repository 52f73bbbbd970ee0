//! Variant groups and the SKU matrix built from them.

mod group;
mod key;
mod matrix;
mod sku;

pub use group::{Deactivation, OptionValue, VariantGroup, VariantGroupEditor};
pub use key::SkuKey;
pub use matrix::{combinations, generate, persisted_rows, Matrix, MatrixReport, MatrixStatus};
pub use sku::{build_name, key_for, SkuSelection, SkuVariant};
