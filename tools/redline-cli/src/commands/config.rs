//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand, ConfigFormat};
use crate::config::{generate_default_config, RedlineConfig, ServiceConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Path => show_path(ctx),
        ConfigCommand::Init { force, format } => init_config(force, format, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    let config = &ctx.config;

    // Pricing section
    ctx.output.info("");
    ctx.output.info("[pricing]");
    ctx.output.kv("currency", config.pricing.currency.code());
    ctx.output.kv("free_shipping_threshold", &config.pricing.free_shipping_threshold().display());
    ctx.output.kv("flat_shipping", &config.pricing.flat_shipping().display());
    ctx.output.kv("tax_rate", &config.pricing.tax_rate.as_fraction().to_string());

    // Service sections
    show_service(ctx, "catalog", &config.catalog);
    show_service(ctx, "payment", &config.payment);

    // Storage section
    ctx.output.info("");
    ctx.output.info("[storage]");
    ctx.output.kv("state_dir", &ctx.state_dir().display().to_string());
    ctx.output.kv("cart_id", &config.storage.cart_id);

    Ok(())
}

fn show_service(ctx: &Context, name: &str, service: &ServiceConfig) {
    ctx.output.info("");
    ctx.output.info(&format!("[{}]", name));
    ctx.output.kv("base_url", service.base_url.as_deref().unwrap_or("(not set)"));
    let key = match &service.api_key {
        Some(_) => "(set)",
        None => "(not set)",
    };
    ctx.output.kv("api_key", key);
    ctx.output.kv("timeout_secs", &service.timeout_secs.to_string());
    ctx.output.kv("retries", &service.retries.to_string());
}

fn show_path(ctx: &Context) -> Result<()> {
    match &ctx.config_path {
        Some(path) => println!("{}", path.display()),
        None => ctx.output.info("No config file found; using defaults"),
    }
    Ok(())
}

fn init_config(force: bool, format: ConfigFormat, ctx: &Context) -> Result<()> {
    let config_path = match format {
        ConfigFormat::Toml => ctx.cwd.join("redline.toml"),
        ConfigFormat::Json => ctx.cwd.join("redline.json"),
    };

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    match format {
        ConfigFormat::Toml => fs::write(&config_path, generate_default_config())?,
        ConfigFormat::Json => RedlineConfig::default().save(&config_path)?,
    }
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");
    if let Some(path) = &ctx.config_path {
        ctx.output.kv("File", &path.display().to_string());
    }

    let (errors, warnings) = ctx.config.check();

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
