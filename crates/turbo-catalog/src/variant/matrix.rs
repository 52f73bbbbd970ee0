//! SKU matrix generation and reconciliation.
//!
//! The matrix is the Cartesian product of the active option values of every
//! group, enumerated in group-definition order (first group varies slowest).
//! Each combination is matched against the previous matrix by [`SkuKey`];
//! matched rows keep their id, prices, stock and image, unmatched ones start
//! as drafts, and previous rows without a combination are dropped.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::ids::{GroupId, SkuId};
use crate::media::ImageSource;
use crate::wire::SkuDetail;

use super::group::VariantGroup;
use super::key::SkuKey;
use super::sku::{build_name, key_for, SkuSelection, SkuVariant};

/// Why a matrix came out empty, or that it did not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatrixStatus {
    Ready,
    /// No variant groups defined.
    NoGroups,
    /// These groups have no active values, so no combination exists.
    Incomplete { empty_groups: Vec<GroupId> },
}

/// Summary of one regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixReport {
    pub status: MatrixStatus,
    /// Rows matched against the previous matrix.
    pub kept: usize,
    /// Rows created as drafts.
    pub created: usize,
    /// Keys of previous rows that no longer exist.
    pub dropped: Vec<SkuKey>,
}

/// Result of [`generate`].
#[derive(Debug, Clone)]
pub struct Matrix {
    pub rows: Vec<SkuVariant>,
    pub report: MatrixReport,
}

/// All combinations of active option values, in enumeration order.
pub fn combinations(groups: &[VariantGroup]) -> Vec<Vec<SkuSelection>> {
    if groups.is_empty() || groups.iter().any(|g| !g.has_active_values()) {
        return Vec::new();
    }

    let mut combos: Vec<Vec<SkuSelection>> = vec![Vec::with_capacity(groups.len())];
    for group in groups {
        let mut next = Vec::with_capacity(combos.len() * group.values.len());
        for existing in &combos {
            for option in group.active_values() {
                let mut combo = existing.clone();
                combo.push(SkuSelection {
                    group_id: group.id.clone(),
                    option_id: option.id.clone(),
                    value: option.value.clone(),
                });
                next.push(combo);
            }
        }
        combos = next;
    }
    combos
}

/// Regenerate the matrix for `groups`, reconciling against `previous`.
///
/// Never fails: invalid group states simply produce an empty matrix, with the
/// reason in [`MatrixReport::status`].
pub fn generate(groups: &[VariantGroup], previous: &[SkuVariant]) -> Matrix {
    let status = if groups.is_empty() {
        MatrixStatus::NoGroups
    } else {
        let empty_groups: Vec<GroupId> = groups
            .iter()
            .filter(|g| !g.has_active_values())
            .map(|g| g.id.clone())
            .collect();
        if empty_groups.is_empty() {
            MatrixStatus::Ready
        } else {
            MatrixStatus::Incomplete { empty_groups }
        }
    };

    let mut lookup: HashMap<&SkuKey, &SkuVariant> = HashMap::with_capacity(previous.len());
    for row in previous {
        lookup.entry(&row.key).or_insert(row);
    }

    let mut rows = Vec::new();
    let mut kept = 0;
    for selections in combinations(groups) {
        let key = key_for(&selections);
        let row = match lookup.remove(&key) {
            Some(prior) => {
                kept += 1;
                prior.carried_over(selections)
            }
            None => SkuVariant::draft(selections),
        };
        rows.push(row);
    }

    // Whatever was not consumed has no combination any more.
    let mut dropped: Vec<SkuKey> = lookup.into_keys().cloned().collect();
    dropped.sort();

    let report = MatrixReport {
        status,
        kept,
        created: rows.len() - kept,
        dropped,
    };
    debug!(
        rows = rows.len(),
        kept = report.kept,
        created = report.created,
        dropped = report.dropped.len(),
        "sku matrix regenerated"
    );
    Matrix { rows, report }
}

/// Rebuild matrix rows from saved SKUs so they can seed reconciliation.
///
/// Each selection is mapped through `groups` to recover the option text and
/// group order, and the key is computed exactly as for generated rows. SKUs
/// whose selections cannot be resolved are returned separately by id.
pub fn persisted_rows(groups: &[VariantGroup], skus: &[SkuDetail]) -> (Vec<SkuVariant>, Vec<SkuId>) {
    let position: HashMap<&GroupId, usize> =
        groups.iter().enumerate().map(|(i, g)| (&g.id, i)).collect();

    let mut rows = Vec::with_capacity(skus.len());
    let mut unresolved = Vec::new();
    'skus: for sku in skus {
        let mut selections = Vec::with_capacity(sku.selections.len());
        for selection in &sku.selections {
            let resolved = position.get(&selection.group_id).and_then(|&index| {
                groups[index]
                    .value(&selection.value_id)
                    .map(|option| (index, option))
            });
            let Some((index, option)) = resolved else {
                warn!(
                    sku_id = %sku.id,
                    group_id = %selection.group_id,
                    value_id = %selection.value_id,
                    "saved sku references an unknown option"
                );
                unresolved.push(sku.id.clone());
                continue 'skus;
            };
            selections.push((
                index,
                SkuSelection {
                    group_id: selection.group_id.clone(),
                    option_id: option.id.clone(),
                    value: option.value.clone(),
                },
            ));
        }
        selections.sort_by_key(|(index, _)| *index);
        let attributes: Vec<SkuSelection> = selections.into_iter().map(|(_, s)| s).collect();

        rows.push(SkuVariant {
            key: key_for(&attributes),
            id: Some(sku.id.clone()),
            name: if sku.name.trim().is_empty() {
                build_name(&attributes)
            } else {
                sku.name.clone()
            },
            sku_code: sku.sku_code.clone(),
            price: sku.price,
            cost_price: sku.cost_price,
            original_price: sku.original_price,
            stock: sku.stock,
            active: sku.active,
            discontinued: sku.discontinued,
            discontinued_reason: sku.discontinued_reason.clone(),
            image: sku.thumbnail.clone().map(ImageSource::url),
            attributes,
        });
    }
    (rows, unresolved)
}
