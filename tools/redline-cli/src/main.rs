//! Redline CLI - command line shell over the storefront core.
//!
//! Commands:
//! - `redline cart` - Show and edit the persisted cart
//! - `redline filters` - Resolve the filter list for a category slug
//! - `redline brands` - List brands for a category
//! - `redline query` - Build and parse catalog query strings
//! - `redline format` - Run a checkout field formatter
//! - `redline checkout` - Check out the cart
//! - `redline order` - Find a placed order
//! - `redline catalog` - Query the catalog service
//! - `redline config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    BrandsArgs, CartArgs, CatalogArgs, CheckoutArgs, ConfigArgs, FiltersArgs, FormatArgs, OrderArgs, QueryArgs,
};

/// Redline - motorcycle-parts storefront core
#[derive(Parser)]
#[command(name = "redline")]
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
    /// Show and edit the cart
    Cart(CartArgs),

    /// Resolve the filter list for a category slug
    Filters(FiltersArgs),

    /// List brands for a category, prioritized first
    Brands(BrandsArgs),

    /// Build and parse catalog query strings
    Query(QueryArgs),

    /// Format a checkout field as the shopper types it
    Format(FormatArgs),

    /// Check out the cart
    Checkout(CheckoutArgs),

    /// Find a placed order
    Order(OrderArgs),

    /// Query the catalog service
    Catalog(CatalogArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(&ctx.config.logging, cli.verbose) {
        ctx.output.warn(&format!("{:#}", e));
    }
    if let Some(path) = &ctx.config_path {
        ctx.output.debug(&format!("Using config {}", path.display()));
    }

    // Execute command
    let result = match cli.command {
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Filters(args) => commands::filters::run(args, &ctx).await,
        Commands::Brands(args) => commands::brands::run(args, &ctx).await,
        Commands::Query(args) => commands::query::run(args, &ctx).await,
        Commands::Format(args) => commands::format::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Order(args) => commands::order::run(args, &ctx).await,
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
