//! Composite SKU keys.
//!
//! A key is built from the `(group id, option value id)` pairs of a
//! combination: each pair is rendered as `group:option`, the renderings are
//! sorted lexicographically and joined with `|`. Only ids participate, so
//! renaming a group or an option never changes a key, and the input order of
//! the pairs does not matter.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{GroupId, OptionValueId};

const PAIR_SEPARATOR: char = ':';
const KEY_SEPARATOR: &str = "|";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkuKey(String);

impl SkuKey {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a GroupId, &'a OptionValueId)>) -> Self {
        let mut parts: Vec<String> = pairs
            .into_iter()
            .map(|(group, option)| format!("{}{}{}", group, PAIR_SEPARATOR, option))
            .collect();
        parts.sort();
        Self(parts.join(KEY_SEPARATOR))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkuKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_order_independent() {
        let (color, size) = (GroupId::new("Color"), GroupId::new("Size"));
        let (red, m) = (OptionValueId::new("red-1"), OptionValueId::new("m-2"));

        let a = SkuKey::from_pairs([(&color, &red), (&size, &m)]);
        let b = SkuKey::from_pairs([(&size, &m), (&color, &red)]);
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "Color:red-1|Size:m-2");
    }

    #[test]
    fn test_sort_uses_rendered_pair() {
        let (g_b, g_a) = (GroupId::new("b"), GroupId::new("a"));
        let (x, y) = (OptionValueId::new("x"), OptionValueId::new("y"));
        let key = SkuKey::from_pairs([(&g_b, &x), (&g_a, &y)]);
        assert_eq!(key.as_str(), "a:y|b:x");
    }

    #[test]
    fn test_empty_key() {
        let key = SkuKey::from_pairs(std::iter::empty());
        assert_eq!(key.as_str(), "");
    }
}
