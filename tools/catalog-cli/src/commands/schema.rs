//! Show the attributes a category asks for.

use anyhow::{Context as _, Result};
use turbo_catalog::schema::{build_definitions, AttributeDefinition, SchemaResolver};
use turbo_catalog::wire::CategorySchemaResponse;
use turbo_catalog::CategoryId;

use super::{http_backend, SchemaArgs};
use crate::context::Context;
use crate::output::flag;

/// Run the schema command.
pub async fn run(args: SchemaArgs, ctx: &Context) -> Result<()> {
    let definitions = match (&args.file, &args.category) {
        (Some(path), _) => {
            let response: CategorySchemaResponse = ctx.read_json(path)?;
            build_definitions(response)
        }
        (None, Some(category)) => {
            let backend = http_backend(ctx)?;
            let mut resolver = SchemaResolver::new();
            resolver
                .resolve(&backend, CategoryId::new(category.as_str()))
                .await
                .with_context(|| format!("Failed to fetch schema for category {}", category))?
                .to_vec()
        }
        (None, None) => anyhow::bail!("Pass a schema file or --category"),
    };

    if ctx.output.is_json() {
        ctx.output.json(&definitions);
        return Ok(());
    }

    print_definitions(&definitions, ctx);
    Ok(())
}

fn print_definitions(definitions: &[AttributeDefinition], ctx: &Context) {
    ctx.output.header(&format!("{} attribute(s)", definitions.len()));
    if definitions.is_empty() {
        ctx.output.info("This category has no attributes");
        return;
    }

    let widths = [6, 20, 24, 13, 9];
    ctx.output
        .table_row(&["ORDER", "CODE", "LABEL", "TYPE", "REQUIRED"], &widths);
    for definition in definitions {
        let order = definition.display_order.to_string();
        let required = flag(definition.is_required);
        ctx.output.table_row(
            &[
                order.as_str(),
                definition.code.as_str(),
                definition.label.as_str(),
                definition.data_type.as_str(),
                required.as_str(),
            ],
            &widths,
        );
        if let Some(unit) = &definition.unit {
            ctx.output.kv("unit", unit);
        }
        if !definition.options.is_empty() {
            let labels: Vec<&str> = definition.options.iter().map(|o| o.label.as_str()).collect();
            ctx.output.kv("options", &labels.join(", "));
        }
    }
}
