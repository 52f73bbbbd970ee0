//! Editor behavior switches.

use serde::{Deserialize, Serialize};

/// How a required BOOLEAN attribute is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredBooleanPolicy {
    /// The admin must pick yes or no; both satisfy the requirement.
    #[default]
    ExplicitChoice,
    /// Only `true` satisfies the requirement. A required boolean can then
    /// never be saved as "No".
    MustBeTrue,
}

/// Configuration for [`ProductEditor`](crate::ProductEditor) and the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub required_boolean: RequiredBooleanPolicy,

    /// Block submission when no thumbnail is set.
    #[serde(default = "default_true")]
    pub require_thumbnail: bool,

    /// Block submission when the gallery is empty.
    #[serde(default = "default_true")]
    pub require_gallery: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            required_boolean: RequiredBooleanPolicy::default(),
            require_thumbnail: true,
            require_gallery: true,
        }
    }
}
