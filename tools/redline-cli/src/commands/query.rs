//! Catalog query strings.

use anyhow::{bail, Result};
use redline_commerce::search::{resolve_filters, CatalogQuery, SelectedFilters, SortOption};

use super::{ListingArgs, QueryArgs, QueryCommand};
use crate::context::Context;

/// Run the query command.
pub async fn run(args: QueryArgs, ctx: &Context) -> Result<()> {
    match args.command {
        QueryCommand::Build(listing) => {
            let query = build_query(&listing, ctx)?;
            let qs = query.to_params().to_query_string();
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({ "query": query, "query_string": qs }));
            } else {
                println!("?{}", qs);
                ctx.output.debug(&format!("{} active filter(s)", query.filters.active_count()));
            }
            Ok(())
        }
        QueryCommand::Parse { query_string } => {
            let query = CatalogQuery::from_query_string(&query_string);
            show(&query, ctx);
            Ok(())
        }
    }
}

/// Build a listing query from command-line selections.
///
/// Entries for keys the category's schema knows are applied by kind, so a
/// repeated multi-select key toggles values and price presets resolve by
/// label. Unknown keys are passed through as-is.
pub fn build_query(args: &ListingArgs, ctx: &Context) -> Result<CatalogQuery> {
    let resolved = resolve_filters(args.category.as_deref().unwrap_or(""));

    let mut selected = if args.defaults {
        SelectedFilters::with_defaults(&resolved.filters)
    } else {
        SelectedFilters::new()
    };
    for entry in &args.filters {
        let Some((key, value)) = entry.split_once('=') else {
            bail!("Filter must be KEY=VALUE, got '{}'", entry);
        };
        let key = key.trim();
        match resolved.filters.get(key) {
            Some(schema) => selected.apply(schema, value),
            None => {
                ctx.output.debug(&format!("'{}' is not a filter for this category", key));
                selected.set(key, value);
            }
        }
    }

    let mut query = CatalogQuery::new()
        .with_filters(selected)
        .with_pagination(args.page, args.per_page);
    if let Some(category) = &args.category {
        query = query.with_category(category.as_str());
    }
    if let Some(sort) = &args.sort {
        let option = SortOption::from_param(sort);
        if option.as_param() != sort.trim() {
            ctx.output.warn(&format!("Unknown sort '{}', using relevance", sort));
        }
        query = query.with_sort(option);
    }
    Ok(query)
}

fn show(query: &CatalogQuery, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(query);
        return;
    }

    ctx.output.header("Catalog query");
    ctx.output.kv("Category", query.category.as_deref().unwrap_or("(none)"));
    ctx.output.kv("Sort", query.sort.display_name());
    ctx.output.kv("Page", &format!("{} ({} per page)", query.page, query.per_page));

    if query.filters.is_empty() {
        ctx.output.info("No filters selected");
        return;
    }
    println!();
    for (key, value) in query.filters.iter() {
        ctx.output.list_item(&format!("{} = {}", key, value.values().join(", ")));
    }
}
