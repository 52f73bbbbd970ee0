//! Validate and assemble a product submission, optionally sending it.

use anyhow::{bail, Result};
use serde_json::json;
use turbo_catalog::submission::{FormPart, ProductSubmission};
use turbo_catalog::{CatalogBackend, CatalogError, ValidationErrors};

use super::{http_backend, open_editor, AssembleArgs};
use crate::context::Context;

/// Run the assemble command.
pub async fn run(args: AssembleArgs, ctx: &Context) -> Result<()> {
    let mut editor = open_editor(&args.source, ctx).await?;

    if args.submit {
        let backend = http_backend(ctx)?;
        let pending = match editor.begin_submit() {
            Ok(pending) => pending,
            Err(CatalogError::Validation(errors)) => return invalid(&errors, ctx),
            Err(e) => return Err(e.into()),
        };
        ctx.output.debug(&format!(
            "Sending {} with key {}",
            if pending.submission.is_update() { "update" } else { "create" },
            pending.idempotency_key
        ));
        let result = backend
            .submit_product(&pending.submission, &pending.idempotency_key)
            .await;
        let outcome = editor.finish_submit(pending, result);
        for note in editor.take_notifications() {
            ctx.output.notification(note.level, &note.message);
        }
        let receipt = outcome?;

        if ctx.output.is_json() {
            ctx.output.json(&receipt);
        } else {
            ctx.output.kv("product", receipt.product_id.as_str());
            ctx.output.kv("skus", &receipt.sku_ids.len().to_string());
        }
        return Ok(());
    }

    let submission = match editor.assemble() {
        Ok(submission) => submission,
        Err(CatalogError::Validation(errors)) => return invalid(&errors, ctx),
        Err(e) => return Err(e.into()),
    };

    for id in &submission.orphaned_sku_ids {
        ctx.output.warn(&format!(
            "SKU {} is no longer in the matrix and will not be sent",
            id
        ));
    }

    if args.form {
        print_form(&submission.to_form_parts(), ctx);
    } else if ctx.output.is_json() {
        ctx.output.json(&submission);
    } else {
        print_summary(&submission, ctx);
    }
    Ok(())
}

fn invalid(errors: &ValidationErrors, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(errors);
    } else {
        ctx.output.header("Validation failed");
        for error in errors.iter() {
            ctx.output.list_item(&error.to_string());
        }
    }
    bail!("{} field(s) need attention", errors.len())
}

fn print_form(parts: &[FormPart], ctx: &Context) {
    if ctx.output.is_json() {
        let fields: Vec<_> = parts
            .iter()
            .map(|part| match part {
                FormPart::Text { name, value } => json!({ "name": name, "value": value }),
                FormPart::File { name, file } => json!({
                    "name": name,
                    "file": file.file_name,
                    "contentType": file.content_type,
                    "size": file.bytes.len(),
                }),
            })
            .collect();
        ctx.output.json(&fields);
        return;
    }

    for part in parts {
        match part {
            FormPart::Text { name, value } => println!("{}={}", name, value),
            FormPart::File { name, file } => {
                println!("{}=@{} ({} bytes)", name, file.file_name, file.bytes.len())
            }
        }
    }
}

fn print_summary(submission: &ProductSubmission, ctx: &Context) {
    let mode = if submission.is_update() { "update" } else { "create" };
    ctx.output.header(&format!("Submission ({})", mode));
    ctx.output.kv("name", &submission.name);
    ctx.output.kv("slug", &submission.slug);
    ctx.output.kv("specs", &submission.specs.len().to_string());
    ctx.output.kv("variant groups", &submission.attributes.len().to_string());
    ctx.output.kv("skus", &submission.skus.len().to_string());
    ctx.output.kv("files", &submission.file_count().to_string());
    ctx.output.success("Ready to submit");
}
