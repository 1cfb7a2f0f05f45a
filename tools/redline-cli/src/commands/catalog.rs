//! Catalog service queries.

use anyhow::{bail, Result};
use redline_commerce::catalog::CatalogItem;
use redline_commerce::ids::CatalogItemId;
use redline_data::FetchError;

use super::query::build_query;
use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let client = ctx.catalog_client()?;

    match args.command {
        CatalogCommand::Search(listing) => {
            let query = build_query(&listing, ctx)?;
            ctx.output.debug(&client.search_url(&query));

            let spinner = ctx.output.spinner("Searching catalog...");
            let result = client.search(&query).await;
            spinner.finish_and_clear();
            let page = result.map_err(explain)?;

            if ctx.output.is_json() {
                ctx.output.json(&page);
                return Ok(());
            }

            ctx.output.header(&format!(
                "{} results (page {} of {})",
                page.pagination.total, page.pagination.page, page.pagination.total_pages
            ));
            if page.is_empty() {
                ctx.output.info("No items match these filters");
                return Ok(());
            }
            let widths = [8, 36, 16, 10, 8];
            ctx.output.table_row(&["ID", "Item", "Brand", "Price", "Stock"], &widths);
            for item in &page.items {
                print_row(item, &widths, ctx);
            }
            if page.pagination.has_next() {
                ctx.output.info(&format!("More results: --page {}", page.pagination.page + 1));
            }
            Ok(())
        }
        CatalogCommand::Item { id } => {
            let spinner = ctx.output.spinner(&format!("Looking up item {}...", id));
            let result = client.item(CatalogItemId(id)).await;
            spinner.finish_and_clear();

            let Some(item) = result.map_err(explain)? else {
                bail!("Item {} not found in the catalog", id);
            };
            if ctx.output.is_json() {
                ctx.output.json(&item);
                return Ok(());
            }
            ctx.output.header(&item.name);
            ctx.output.kv("ID", &item.id.to_string());
            if !item.sku.is_empty() {
                ctx.output.kv("SKU", &item.sku);
            }
            if let Some(brand) = &item.brand {
                ctx.output.kv("Brand", brand);
            }
            ctx.output.kv("Price", &item.price.display());
            ctx.output.kv("In stock", if item.in_stock { "yes" } else { "no" });
            Ok(())
        }
    }
}

fn print_row(item: &CatalogItem, widths: &[usize], ctx: &Context) {
    ctx.output.table_row(
        &[
            &item.id.to_string(),
            &item.name,
            item.brand.as_deref().unwrap_or("-"),
            &item.price.display(),
            if item.in_stock { "yes" } else { "no" },
        ],
        widths,
    );
}

fn explain(e: FetchError) -> anyhow::Error {
    anyhow::anyhow!("{} ({})", e.user_message(), e)
}
