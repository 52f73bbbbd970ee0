//! Variant groups and their option values, plus the editor operations on them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CatalogError, FieldErrorKind};
use crate::ids::{GroupId, OptionValueId};
use crate::wire::VariantGroupDetail;

/// One selectable value inside a variant group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValue {
    pub group_id: GroupId,
    pub id: OptionValueId,
    pub value: String,
    /// Soft-delete flag; inactive values never enter the matrix.
    pub active: bool,
    /// Loaded from a saved product. Such values may back persisted SKUs and are
    /// deactivated instead of removed.
    pub is_old_data: bool,
}

/// An admin-defined option axis such as "Color".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantGroup {
    pub id: GroupId,
    pub name: String,
    pub values: Vec<OptionValue>,
    pub is_old_data: bool,
}

impl VariantGroup {
    pub fn new() -> Self {
        Self {
            id: GroupId::generate(),
            name: String::new(),
            values: Vec::new(),
            is_old_data: false,
        }
    }

    pub fn active_values(&self) -> impl Iterator<Item = &OptionValue> {
        self.values.iter().filter(|v| v.active)
    }

    pub fn has_active_values(&self) -> bool {
        self.values.iter().any(|v| v.active)
    }

    pub fn value(&self, id: &OptionValueId) -> Option<&OptionValue> {
        self.values.iter().find(|v| &v.id == id)
    }

    fn has_active_text(&self, text: &str, except: Option<&OptionValueId>) -> bool {
        self.active_values()
            .filter(|v| Some(&v.id) != except)
            .any(|v| v.value.to_lowercase() == text.to_lowercase())
    }
}

impl Default for VariantGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl From<VariantGroupDetail> for VariantGroup {
    fn from(detail: VariantGroupDetail) -> Self {
        let values = detail
            .values
            .into_iter()
            .map(|v| OptionValue {
                group_id: detail.id.clone(),
                id: v.id,
                value: v.value,
                active: v.active,
                is_old_data: true,
            })
            .collect();
        Self {
            id: detail.id,
            name: detail.label,
            values,
            is_old_data: true,
        }
    }
}

/// Outcome of [`VariantGroupEditor::deactivate_option_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deactivation {
    /// Persisted value kept with `active = false`.
    SoftDeactivated,
    /// Unsaved value removed from the group.
    Removed,
}

/// Mutations on a product's variant groups.
///
/// Rejected edits return an error and leave the groups untouched. The caller
/// regenerates the SKU matrix after any edit that changes active values.
pub struct VariantGroupEditor<'a> {
    groups: &'a mut Vec<VariantGroup>,
}

impl<'a> VariantGroupEditor<'a> {
    pub fn new(groups: &'a mut Vec<VariantGroup>) -> Self {
        Self { groups }
    }

    fn group_mut(&mut self, id: &GroupId) -> Result<&mut VariantGroup, CatalogError> {
        self.groups
            .iter_mut()
            .find(|g| &g.id == id)
            .ok_or_else(|| CatalogError::UnknownGroup(id.to_string()))
    }

    /// Append an empty, unnamed group.
    pub fn add_group(&mut self) -> GroupId {
        let group = VariantGroup::new();
        let id = group.id.clone();
        self.groups.push(group);
        debug!(group_id = %id, "variant group added");
        id
    }

    /// Delete a group together with all of its option values.
    pub fn remove_group(&mut self, id: &GroupId) -> Result<VariantGroup, CatalogError> {
        let index = self
            .groups
            .iter()
            .position(|g| &g.id == id)
            .ok_or_else(|| CatalogError::UnknownGroup(id.to_string()))?;
        Ok(self.groups.remove(index))
    }

    /// Rename a group.
    ///
    /// The name must be non-empty and must not match (ignoring case) another
    /// group's name or any attribute label of the current category.
    pub fn set_group_name<'l>(
        &mut self,
        id: &GroupId,
        name: &str,
        attribute_labels: impl IntoIterator<Item = &'l str>,
    ) -> Result<(), CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::field(
                "variantGroups.name",
                FieldErrorKind::Empty,
                "Group name must not be empty",
            ));
        }
        let lowered = name.to_lowercase();

        if !self.groups.iter().any(|g| &g.id == id) {
            return Err(CatalogError::UnknownGroup(id.to_string()));
        }
        if self
            .groups
            .iter()
            .any(|g| &g.id != id && g.name.to_lowercase() == lowered)
        {
            return Err(CatalogError::Conflict(format!(
                "a variant group named \"{}\" already exists",
                name
            )));
        }
        if attribute_labels
            .into_iter()
            .any(|label| label.trim().to_lowercase() == lowered)
        {
            return Err(CatalogError::Conflict(format!(
                "\"{}\" is already an attribute of this category",
                name
            )));
        }

        self.group_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Append a new active value to a group.
    ///
    /// Rejected when blank or when an active value with the same text
    /// (ignoring case) already exists.
    pub fn add_option_value(
        &mut self,
        group_id: &GroupId,
        text: &str,
    ) -> Result<OptionValueId, CatalogError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CatalogError::field(
                "variantGroups.values",
                FieldErrorKind::Empty,
                "Option value must not be empty",
            ));
        }

        let group = self.group_mut(group_id)?;
        if group.has_active_text(text, None) {
            return Err(CatalogError::Conflict(format!(
                "\"{}\" already exists in {}",
                text, group.name
            )));
        }

        let id = OptionValueId::generate();
        group.values.push(OptionValue {
            group_id: group_id.clone(),
            id: id.clone(),
            value: text.to_string(),
            active: true,
            is_old_data: false,
        });
        Ok(id)
    }

    /// Change an option's display text. Its id, and so every SKU key built
    /// from it, stays the same.
    pub fn rename_option_value(
        &mut self,
        group_id: &GroupId,
        value_id: &OptionValueId,
        text: &str,
    ) -> Result<(), CatalogError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CatalogError::field(
                "variantGroups.values",
                FieldErrorKind::Empty,
                "Option value must not be empty",
            ));
        }

        let group = self.group_mut(group_id)?;
        if group.has_active_text(text, Some(value_id)) {
            return Err(CatalogError::Conflict(format!(
                "\"{}\" already exists in {}",
                text, group.name
            )));
        }
        let value = group
            .values
            .iter_mut()
            .find(|v| &v.id == value_id)
            .ok_or_else(|| CatalogError::UnknownOptionValue {
                group: group_id.to_string(),
                value: value_id.to_string(),
            })?;
        value.value = text.to_string();
        Ok(())
    }

    /// Take a value out of the matrix.
    ///
    /// Persisted values are soft-deactivated; unsaved ones are removed.
    pub fn deactivate_option_value(
        &mut self,
        group_id: &GroupId,
        value_id: &OptionValueId,
    ) -> Result<Deactivation, CatalogError> {
        let group = self.group_mut(group_id)?;
        let index = group
            .values
            .iter()
            .position(|v| &v.id == value_id)
            .ok_or_else(|| CatalogError::UnknownOptionValue {
                group: group_id.to_string(),
                value: value_id.to_string(),
            })?;

        if group.values[index].is_old_data {
            group.values[index].active = false;
            Ok(Deactivation::SoftDeactivated)
        } else {
            group.values.remove(index);
            Ok(Deactivation::Removed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::GroupValueDetail;

    const NO_LABELS: [&str; 0] = [];

    fn named_group(groups: &mut Vec<VariantGroup>, name: &str) -> GroupId {
        let mut editor = VariantGroupEditor::new(groups);
        let id = editor.add_group();
        editor.set_group_name(&id, name, NO_LABELS).unwrap();
        id
    }

    #[test]
    fn test_add_group_is_empty_and_unnamed() {
        let mut groups = Vec::new();
        let id = VariantGroupEditor::new(&mut groups).add_group();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, id);
        assert!(groups[0].name.is_empty());
        assert!(!groups[0].has_active_values());
    }

    #[test]
    fn test_group_name_rules() {
        let mut groups = Vec::new();
        let color = named_group(&mut groups, "Color");
        let mut editor = VariantGroupEditor::new(&mut groups);
        let size = editor.add_group();

        assert!(matches!(
            editor.set_group_name(&size, "  ", NO_LABELS),
            Err(CatalogError::Validation(_))
        ));
        assert!(matches!(
            editor.set_group_name(&size, "color", NO_LABELS),
            Err(CatalogError::Conflict(_))
        ));
        assert!(matches!(
            editor.set_group_name(&size, "Screen Size", ["screen size"]),
            Err(CatalogError::Conflict(_))
        ));
        // Renaming a group to its own name (different case) is fine.
        editor.set_group_name(&color, "COLOR", NO_LABELS).unwrap();
        editor.set_group_name(&size, "Size", ["Screen size"]).unwrap();

        assert_eq!(groups[0].name, "COLOR");
        assert_eq!(groups[1].name, "Size");
    }

    #[test]
    fn test_duplicate_value_rejected_case_insensitively() {
        let mut groups = Vec::new();
        let color = named_group(&mut groups, "Color");
        let mut editor = VariantGroupEditor::new(&mut groups);

        editor.add_option_value(&color, "Red").unwrap();
        let err = editor.add_option_value(&color, " red ").unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));
        assert!(matches!(
            editor.add_option_value(&color, ""),
            Err(CatalogError::Validation(_))
        ));
        assert_eq!(groups[0].values.len(), 1);
        assert!(!groups[0].values[0].is_old_data);
    }

    #[test]
    fn test_deactivate_old_value_is_soft() {
        let detail = VariantGroupDetail {
            id: "g1".into(),
            label: "Color".into(),
            values: vec![GroupValueDetail {
                id: "v1".into(),
                value: "Blue".into(),
                active: true,
            }],
        };
        let mut groups = vec![VariantGroup::from(detail)];
        let mut editor = VariantGroupEditor::new(&mut groups);
        let fresh = editor.add_option_value(&"g1".into(), "Green").unwrap();

        assert_eq!(
            editor.deactivate_option_value(&"g1".into(), &"v1".into()).unwrap(),
            Deactivation::SoftDeactivated
        );
        assert_eq!(
            editor.deactivate_option_value(&"g1".into(), &fresh).unwrap(),
            Deactivation::Removed
        );

        assert_eq!(groups[0].values.len(), 1);
        assert!(!groups[0].values[0].active);
        assert!(!groups[0].has_active_values());
    }

    #[test]
    fn test_readding_deactivated_text_gets_new_id() {
        let detail = VariantGroupDetail {
            id: "g1".into(),
            label: "Color".into(),
            values: vec![GroupValueDetail {
                id: "v1".into(),
                value: "Blue".into(),
                active: true,
            }],
        };
        let mut groups = vec![VariantGroup::from(detail)];
        let mut editor = VariantGroupEditor::new(&mut groups);
        editor.deactivate_option_value(&"g1".into(), &"v1".into()).unwrap();

        let id = editor.add_option_value(&"g1".into(), "Blue").unwrap();
        assert_ne!(id.as_str(), "v1");
    }

    #[test]
    fn test_rename_keeps_id() {
        let mut groups = Vec::new();
        let color = named_group(&mut groups, "Color");
        let mut editor = VariantGroupEditor::new(&mut groups);
        let red = editor.add_option_value(&color, "Red").unwrap();
        editor.add_option_value(&color, "Blue").unwrap();

        assert!(matches!(
            editor.rename_option_value(&color, &red, "blue"),
            Err(CatalogError::Conflict(_))
        ));
        editor.rename_option_value(&color, &red, "Crimson").unwrap();
        assert_eq!(groups[0].value(&red).unwrap().value, "Crimson");
    }

    #[test]
    fn test_remove_group_takes_values_with_it() {
        let mut groups = Vec::new();
        let color = named_group(&mut groups, "Color");
        let mut editor = VariantGroupEditor::new(&mut groups);
        editor.add_option_value(&color, "Red").unwrap();

        let removed = editor.remove_group(&color).unwrap();
        assert_eq!(removed.values.len(), 1);
        assert!(matches!(
            editor.remove_group(&color),
            Err(CatalogError::UnknownGroup(_))
        ));
        assert!(groups.is_empty());
    }
}
