//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use serde_json::Value;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;
use crate::output::flag;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let editor = &ctx.config.editor;
    ctx.output.info("[editor]");
    ctx.output.kv(
        "required_boolean",
        &config_value(&ctx.config, "editor.required_boolean")?,
    );
    ctx.output.kv("require_thumbnail", &flag(editor.require_thumbnail));
    ctx.output.kv("require_gallery", &flag(editor.require_gallery));

    let api = &ctx.config.api;
    ctx.output.info("[api]");
    ctx.output.kv("base_url", api.base_url.as_deref().unwrap_or("(not set)"));
    ctx.output.kv("timeout_ms", &api.timeout_ms.to_string());
    if api.token.is_some() {
        ctx.output.kv("token", "********");
    }
    for (key, value) in &api.default_headers {
        ctx.output.kv(key, value);
    }

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("catalog.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let api = &ctx.config.api;
    match api.base_url.as_deref() {
        None => warnings.push("api.base_url is not set; --remote and --submit will fail".to_string()),
        Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
            errors.push(format!("api.base_url must be an http(s) URL, got '{}'", url));
        }
        Some(_) => {}
    }
    if api.timeout_ms == 0 {
        errors.push("api.timeout_ms must be greater than 0".to_string());
    }
    if api.token.is_some() {
        warnings.push("api.token is stored in plain text; prefer CATALOG_API_TOKEN".to_string());
    }

    let editor = &ctx.config.editor;
    if !editor.require_thumbnail && !editor.require_gallery {
        warnings.push("products can be saved without any image".to_string());
    }

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Look up a dot-separated key in the serialized config.
fn config_value(config: &CliConfig, key: &str) -> Result<String> {
    let root = serde_json::to_value(config)?;
    let mut current = &root;
    for part in key.split('.') {
        current = current
            .get(part)
            .with_context(|| format!("Unknown config key: {}", key))?;
    }

    Ok(match current {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}
