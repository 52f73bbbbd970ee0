//! Regenerate a product's SKU matrix after variant group edits.

use anyhow::{bail, Context as _, Result};
use serde::Serialize;
use turbo_catalog::variant::{MatrixReport, MatrixStatus, SkuVariant, VariantGroup};
use turbo_catalog::{GroupId, OptionValueId};

use super::{open_editor, Editor, MatrixArgs};
use crate::context::Context;
use crate::output::money_cell;

#[derive(Serialize)]
struct MatrixOutput<'a> {
    groups: &'a [VariantGroup],
    skus: &'a [SkuVariant],
    report: Option<&'a MatrixReport>,
}

/// Run the matrix command.
pub async fn run(args: MatrixArgs, ctx: &Context) -> Result<()> {
    let mut editor = open_editor(&args.source, ctx).await?;
    apply_edits(&mut editor, &args, ctx)?;

    for note in editor.take_notifications() {
        ctx.output.notification(note.level, &note.message);
    }

    if ctx.output.is_json() {
        ctx.output.json(&MatrixOutput {
            groups: editor.groups(),
            skus: editor.skus(),
            report: editor.last_matrix_report(),
        });
        return Ok(());
    }

    print_matrix(&editor, ctx);
    Ok(())
}

fn apply_edits(editor: &mut Editor, args: &MatrixArgs, ctx: &Context) -> Result<()> {
    let edits = args.add_groups.len()
        + args.add_values.len()
        + args.rename_values.len()
        + args.deactivate_values.len()
        + args.remove_groups.len();
    if edits > 0 && !editor.draft().has_variants {
        editor.set_has_variants(true);
    }

    for group in &args.remove_groups {
        let id = find_group(editor, group)?;
        editor.remove_group(&id)?;
        ctx.output.debug(&format!("Removed group {}", group));
    }

    for name in &args.add_groups {
        let id = editor.add_group();
        editor
            .set_group_name(&id, name)
            .with_context(|| format!("Cannot add group {:?}", name))?;
    }

    for spec in &args.add_values {
        let (group, text) = split_pair(spec)?;
        let id = find_group(editor, group)?;
        editor
            .add_option_value(&id, text)
            .with_context(|| format!("Cannot add {:?} to {}", text, group))?;
    }

    for spec in &args.rename_values {
        let (group, rest) = split_pair(spec)?;
        let (value, text) = split_pair(rest)?;
        let group_id = find_group(editor, group)?;
        let value_id = find_value(editor, &group_id, value)?;
        editor.rename_option_value(&group_id, &value_id, text)?;
    }

    for spec in &args.deactivate_values {
        let (group, value) = split_pair(spec)?;
        let group_id = find_group(editor, group)?;
        let value_id = find_value(editor, &group_id, value)?;
        let outcome = editor.deactivate_option_value(&group_id, &value_id)?;
        ctx.output.debug(&format!("{}={}: {:?}", group, value, outcome));
    }

    Ok(())
}

fn split_pair(spec: &str) -> Result<(&str, &str)> {
    match spec.split_once('=') {
        Some((left, right)) if !left.trim().is_empty() => Ok((left.trim(), right)),
        _ => bail!("Expected KEY=VALUE, got {:?}", spec),
    }
}

/// Match a group by id, then by name (case-insensitive).
fn find_group(editor: &Editor, needle: &str) -> Result<GroupId> {
    let groups = editor.groups();
    groups
        .iter()
        .find(|g| g.id.as_str() == needle)
        .or_else(|| groups.iter().find(|g| g.name.eq_ignore_ascii_case(needle)))
        .map(|g| g.id.clone())
        .with_context(|| format!("No variant group {:?}", needle))
}

/// Match an active value by id, then by text (case-insensitive).
fn find_value(editor: &Editor, group_id: &GroupId, needle: &str) -> Result<OptionValueId> {
    let group = editor
        .groups()
        .iter()
        .find(|g| &g.id == group_id)
        .with_context(|| format!("No variant group {}", group_id))?;
    group
        .values
        .iter()
        .find(|v| v.id.as_str() == needle)
        .or_else(|| {
            group
                .active_values()
                .find(|v| v.value.eq_ignore_ascii_case(needle))
        })
        .map(|v| v.id.clone())
        .with_context(|| format!("No value {:?} in group {}", needle, group.name))
}

fn print_matrix(editor: &Editor, ctx: &Context) {
    ctx.output.header("Variant groups");
    for group in editor.groups() {
        let values: Vec<String> = group
            .values
            .iter()
            .map(|v| {
                if v.active {
                    v.value.clone()
                } else {
                    format!("{} (inactive)", v.value)
                }
            })
            .collect();
        ctx.output.kv(&group.name, &values.join(", "));
    }

    ctx.output.header(&format!("{} SKU(s)", editor.skus().len()));
    let widths = [24, 14, 10, 6, 36];
    ctx.output
        .table_row(&["NAME", "CODE", "PRICE", "STOCK", "ID"], &widths);
    for sku in editor.skus() {
        let price = money_cell(sku.price);
        let stock = sku
            .stock
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let id = sku.id.as_ref().map(|id| id.as_str()).unwrap_or("new");
        ctx.output.table_row(
            &[
                sku.name.as_str(),
                sku.sku_code.as_str(),
                price.as_str(),
                stock.as_str(),
                id,
            ],
            &widths,
        );
    }

    if let Some(report) = editor.last_matrix_report() {
        match &report.status {
            MatrixStatus::Ready => ctx.output.success(&format!(
                "kept {}, created {}, dropped {}",
                report.kept,
                report.created,
                report.dropped.len()
            )),
            MatrixStatus::NoGroups => ctx.output.info("No variant groups"),
            MatrixStatus::Incomplete { empty_groups } => ctx.output.warn(&format!(
                "{} group(s) without active values",
                empty_groups.len()
            )),
        }
        for key in &report.dropped {
            ctx.output.list_item(&format!("dropped {}", key.as_str()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pair() {
        assert_eq!(split_pair("Color=Red").unwrap(), ("Color", "Red"));
        assert_eq!(split_pair("Size=v-1=XL").unwrap(), ("Size", "v-1=XL"));
        assert!(split_pair("=Red").is_err());
        assert!(split_pair("Color").is_err());
    }
}
