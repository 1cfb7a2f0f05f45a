//! Brand listing for a category.

use anyhow::Result;
use redline_commerce::catalog::BRANDS;
use redline_commerce::search::{list_brands, resolve_filters, BrandQuery};

use super::BrandsArgs;
use crate::context::Context;

/// Run the brands command.
pub async fn run(args: BrandsArgs, ctx: &Context) -> Result<()> {
    let resolved = resolve_filters(&args.slug);
    let query = BrandQuery {
        search: args.search,
        show_all: args.all,
        selected: args.selected,
    };
    let listing = list_brands(BRANDS, resolved.product_types(), &query);

    if ctx.output.is_json() {
        ctx.output.json(&listing);
        return Ok(());
    }

    let is_selected = |name: &str| query.selected.iter().any(|s| s.eq_ignore_ascii_case(name));
    let print = |names: &[String]| {
        for name in names {
            if is_selected(name) {
                ctx.output.list_item(&format!("{} ✓", name));
            } else {
                ctx.output.list_item(name);
            }
        }
    };

    ctx.output.header(&format!("Brands for '{}'", resolved.slug));
    if !listing.prioritized.is_empty() {
        ctx.output.info("Popular for this category");
        print(&listing.prioritized);
    }
    if !listing.other.is_empty() {
        ctx.output.info("Other brands");
        print(&listing.other);
    }
    if listing.hidden_other > 0 {
        ctx.output.info(&format!("{} more brands (use --all)", listing.hidden_other));
    }
    if listing.visible().next().is_none() {
        ctx.output.warn("No brands match");
    }
    Ok(())
}
