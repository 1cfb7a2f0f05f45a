//! Filter list resolution.

use anyhow::Result;
use redline_commerce::search::{resolve_filters, FilterSchema, Resolution};

use super::FiltersArgs;
use crate::context::Context;

/// Run the filters command.
pub async fn run(args: FiltersArgs, ctx: &Context) -> Result<()> {
    let resolved = resolve_filters(&args.slug);

    if ctx.output.is_json() {
        ctx.output.json(&resolved);
        return Ok(());
    }

    let matched = match (&resolved.resolution, resolved.category) {
        (Resolution::Exact, Some(category)) => format!("category {}", category.name),
        (Resolution::Keyword(bucket), Some(category)) => {
            format!("keyword {} → {}", bucket, category.name)
        }
        _ => "no match, generic filters".to_string(),
    };
    ctx.output.header(&format!("Filters for '{}'", resolved.slug));
    ctx.output.kv("Matched", &matched);
    if !resolved.product_types().is_empty() {
        let types: Vec<&str> = resolved.product_types().iter().map(|t| t.as_str()).collect();
        ctx.output.kv("Product types", &types.join(", "));
    }

    println!();
    for filter in resolved.filters.iter() {
        ctx.output.list_item(&describe(filter));
    }
    Ok(())
}

fn describe(filter: &FilterSchema) -> String {
    let mut line = format!("{} ({}, {})", filter.label, filter.key, filter.kind.as_str());
    if !filter.options.is_empty() {
        let shown: Vec<&str> = filter.options.iter().take(6).map(|o| o.label.as_str()).collect();
        line.push_str(&format!(": {}", shown.join(", ")));
        if filter.options.len() > shown.len() {
            line.push_str(&format!(" +{} more", filter.options.len() - shown.len()));
        }
    }
    if let Some(default) = &filter.default_value {
        line.push_str(&format!(" [default {}]", default));
    }
    line
}
