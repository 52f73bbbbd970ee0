//! Turning a validated draft into the create/update payload.

mod assembler;
mod coerce;
mod form;
mod payload;

pub use assembler::SubmissionAssembler;
pub use coerce::{coerce_text, spec_value};
pub use form::FormPart;
pub use payload::{
    ProductSubmission, WireAttributeGroup, WireGroupValue, WireSku, WireSkuSpec, WireSpec,
};
