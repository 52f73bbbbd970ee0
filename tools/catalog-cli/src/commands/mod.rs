//! CLI command implementations.

pub mod assemble;
pub mod config;
pub mod matrix;
pub mod schema;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use turbo_catalog::backend::HttpCatalogBackend;
use turbo_catalog::wire::{CategorySchemaResponse, ProductDetail};
use turbo_catalog::{CatalogBackend, InMemoryBackend, ProductEditor, ProductId};

use crate::context::Context;

/// Arguments for the schema command.
#[derive(Args)]
pub struct SchemaArgs {
    /// Category schema JSON file.
    #[arg(required_unless_present = "category")]
    pub file: Option<String>,

    /// Fetch the schema of this category from the configured API.
    #[arg(long, conflicts_with = "file")]
    pub category: Option<String>,
}

/// Where a product (and its category schema) is read from.
#[derive(Args)]
pub struct ProductSource {
    /// Product detail JSON file, or a product id with --remote.
    pub product: String,

    /// Category schema JSON file for the product's category.
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Load product and schema from the configured API.
    #[arg(long, conflicts_with = "schema")]
    pub remote: bool,
}

/// Arguments for the matrix command.
#[derive(Args)]
pub struct MatrixArgs {
    #[command(flatten)]
    pub source: ProductSource,

    /// Append a variant group with this name.
    #[arg(long = "add-group", value_name = "NAME")]
    pub add_groups: Vec<String>,

    /// Append an option value: GROUP=TEXT.
    #[arg(long = "add", value_name = "GROUP=TEXT")]
    pub add_values: Vec<String>,

    /// Rename an option value: GROUP=VALUE=TEXT.
    #[arg(long = "rename", value_name = "GROUP=VALUE=TEXT")]
    pub rename_values: Vec<String>,

    /// Deactivate an option value by id or text: GROUP=VALUE.
    #[arg(long = "deactivate", value_name = "GROUP=VALUE")]
    pub deactivate_values: Vec<String>,

    /// Remove a variant group by name or id.
    #[arg(long = "remove-group", value_name = "GROUP")]
    pub remove_groups: Vec<String>,
}

/// Arguments for the assemble command.
#[derive(Args)]
pub struct AssembleArgs {
    #[command(flatten)]
    pub source: ProductSource,

    /// Print the flattened multipart form fields instead of the payload.
    #[arg(long)]
    pub form: bool,

    /// Send the submission to the configured API.
    #[arg(long)]
    pub submit: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// Editor type shared by the commands.
pub type Editor = ProductEditor<Arc<dyn CatalogBackend>>;

/// HTTP backend for the configured API.
pub fn http_backend(ctx: &Context) -> Result<HttpCatalogBackend> {
    Ok(HttpCatalogBackend::new(ctx.config.api.client()?))
}

/// Load a product into an editor, from fixtures or from the API.
pub async fn open_editor(source: &ProductSource, ctx: &Context) -> Result<Editor> {
    let backend: Arc<dyn CatalogBackend>;
    let product_id;
    if source.remote {
        backend = Arc::new(http_backend(ctx)?);
        product_id = ProductId::new(source.product.as_str());
    } else {
        let detail: ProductDetail = ctx.read_json(&source.product)?;
        if detail.id.is_blank() {
            anyhow::bail!("{} has no product id", source.product);
        }
        product_id = detail.id.clone();
        let memory = InMemoryBackend::new();
        if let (Some(path), Some(category_id)) = (&source.schema, &detail.category_id) {
            let schema: CategorySchemaResponse = ctx.read_json(path)?;
            memory.insert_schema(category_id.clone(), schema);
        }
        memory.insert_product(detail);
        backend = Arc::new(memory);
    }

    ctx.output.debug(&format!("Loading product {}", product_id));
    let mut editor = ProductEditor::load(backend, ctx.config.editor.clone(), &product_id)
        .await
        .with_context(|| format!("Failed to load product {}", product_id))?;

    // Without a schema fixture the category lookup is expected to fail.
    let schema_missing = !source.remote && source.schema.is_none();
    for note in editor.take_notifications() {
        if schema_missing {
            ctx.output.debug(&note.message);
        } else {
            ctx.output.notification(note.level, &note.message);
        }
    }
    Ok(editor)
}
