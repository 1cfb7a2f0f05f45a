//! CLI command implementations.

pub mod brands;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod filters;
pub mod format;
pub mod order;
pub mod query;

use clap::{Args, Subcommand, ValueEnum};
use redline_commerce::checkout::CheckoutField;

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

/// Cart subcommands.
#[derive(Subcommand)]
pub enum CartCommand {
    /// Show lines and totals
    Show,

    /// Add an item. Without --price the item is looked up in the catalog.
    Add {
        /// Catalog item id.
        id: i64,

        /// Quantity to add.
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Unit price as a decimal, e.g. 45.50.
        #[arg(long, requires = "name")]
        price: Option<String>,

        /// Item name (with --price).
        #[arg(long)]
        name: Option<String>,

        /// Stock keeping unit (with --price).
        #[arg(long, default_value = "")]
        sku: String,
    },

    /// Set a line's quantity. Zero or less removes the line.
    Update {
        /// Catalog item id.
        id: i64,

        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a line
    Remove {
        /// Catalog item id.
        id: i64,
    },

    /// Empty the cart
    Clear {
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the filters command.
#[derive(Args)]
pub struct FiltersArgs {
    /// Category slug, e.g. `helmets` or `dirt-bike-parts`.
    pub slug: String,
}

/// Arguments for the brands command.
#[derive(Args)]
pub struct BrandsArgs {
    /// Category slug used for prioritization.
    pub slug: String,

    /// Filter brands by name.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Expand the other-brands list.
    #[arg(short, long)]
    pub all: bool,

    /// Selected brands, listed first.
    #[arg(long = "selected", value_name = "BRAND")]
    pub selected: Vec<String>,
}

/// Listing selection shared by `query build` and `catalog search`.
#[derive(Args)]
pub struct ListingArgs {
    /// Category slug.
    #[arg(short, long)]
    pub category: Option<String>,

    /// Filter entry as key=value; repeat to toggle multi-select values.
    #[arg(short, long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,

    /// Seed selections with each filter's default (in-stock).
    #[arg(long)]
    pub defaults: bool,

    /// Sort option, e.g. price_asc.
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Page number.
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Items per page.
    #[arg(long, default_value_t = 24)]
    pub per_page: u32,
}

/// Arguments for the query command.
#[derive(Args)]
pub struct QueryArgs {
    #[command(subcommand)]
    pub command: QueryCommand,
}

/// Query subcommands.
#[derive(Subcommand)]
pub enum QueryCommand {
    /// Build the catalog query string for a selection
    Build(ListingArgs),

    /// Parse a query string back into a selection
    Parse {
        /// Query string, with or without the leading '?'.
        query_string: String,
    },
}

/// Checkout field selector.
#[derive(Clone, Copy, ValueEnum)]
pub enum FieldArg {
    CardNumber,
    Expiry,
    Cvv,
    Phone,
    Zip,
    Name,
}

impl From<FieldArg> for CheckoutField {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::CardNumber => CheckoutField::CardNumber,
            FieldArg::Expiry => CheckoutField::Expiry,
            FieldArg::Cvv => CheckoutField::Cvv,
            FieldArg::Phone => CheckoutField::Phone,
            FieldArg::Zip => CheckoutField::Zip,
            FieldArg::Name => CheckoutField::Name,
        }
    }
}

/// Arguments for the format command.
#[derive(Args)]
pub struct FormatArgs {
    /// Field to format.
    #[arg(value_enum)]
    pub field: FieldArg,

    /// Raw input.
    pub raw: String,

    /// Value before this keystroke (expiry only).
    #[arg(short, long)]
    pub previous: Option<String>,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Customer full name.
    #[arg(long)]
    pub name: String,

    /// Customer email.
    #[arg(long)]
    pub email: String,

    /// Customer phone.
    #[arg(long)]
    pub phone: Option<String>,

    /// Street address.
    #[arg(long)]
    pub address: String,

    /// Apartment, suite, etc.
    #[arg(long)]
    pub address2: Option<String>,

    /// City.
    #[arg(long)]
    pub city: String,

    /// State or province code.
    #[arg(long)]
    pub state: Option<String>,

    /// ZIP code.
    #[arg(long)]
    pub zip: String,

    /// Card number.
    #[arg(long, required_unless_present = "po_number")]
    pub card: Option<String>,

    /// Card expiry as MM/YY.
    #[arg(long, required_unless_present = "po_number")]
    pub expiry: Option<String>,

    /// Card security code.
    #[arg(long, required_unless_present = "po_number")]
    pub cvv: Option<String>,

    /// Pay by purchase order instead of card.
    #[arg(long, conflicts_with_all = ["card", "expiry", "cvv"])]
    pub po_number: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the order command.
#[derive(Args)]
pub struct OrderArgs {
    /// Order id, order number or payment reference.
    pub reference: String,

    /// Customer email, to search order history.
    #[arg(short, long)]
    pub email: Option<String>,
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

/// Catalog subcommands.
#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Search the catalog service
    Search(ListingArgs),

    /// Look up one item
    Item {
        /// Catalog item id.
        id: i64,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config file format for `config init`.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// Commented redline.toml.
    Toml,
    /// redline.json with every default spelled out.
    Json,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Print the path of the config file in use
    Path,

    /// Create a config file in the current directory
    Init {
        /// Overwrite existing config.
        #[arg(short, long)]
        force: bool,

        /// File format.
        #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },

    /// Validate configuration
    Validate,
}
