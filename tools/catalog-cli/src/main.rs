//! Catalog CLI - inspect category schemas and product variant matrices.
//!
//! Commands:
//! - `catalog schema` - Show the attributes a category asks for
//! - `catalog matrix` - Regenerate a product's SKU matrix after group edits
//! - `catalog assemble` - Validate and assemble a create/update submission
//! - `catalog config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{AssembleArgs, ConfigArgs, MatrixArgs, SchemaArgs};

/// Catalog CLI - Work with TurboCommerce product attributes and SKU variants
#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a category's attribute definitions
    Schema(SchemaArgs),

    /// Regenerate a product's SKU matrix
    Matrix(MatrixArgs),

    /// Validate and assemble a product submission
    Assemble(AssembleArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::EnvFilter;

    let default_directive = if verbose {
        "catalog_cli=debug,turbo_catalog=debug,turbo_data=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Schema(args) => commands::schema::run(args, &ctx).await,
        Commands::Matrix(args) => commands::matrix::run(args, &ctx).await,
        Commands::Assemble(args) => commands::assemble::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
