//! Checkout field formatting.

use anyhow::Result;
use chrono::{Datelike, Local};
use redline_commerce::checkout::{CheckoutField, YearMonth};
use serde::Serialize;

use super::FormatArgs;
use crate::context::Context;

#[derive(Serialize)]
struct Formatted<'a> {
    field: CheckoutField,
    raw: &'a str,
    formatted: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the format command.
pub async fn run(args: FormatArgs, ctx: &Context) -> Result<()> {
    let field = CheckoutField::from(args.field);
    let formatted = field.format(&args.raw, args.previous.as_deref());
    let error = field.validate(&formatted, today()).err().map(|e| e.to_string());

    if ctx.output.is_json() {
        ctx.output.json(&Formatted {
            field,
            raw: &args.raw,
            formatted,
            error,
        });
        return Ok(());
    }

    println!("{}", formatted);
    match error {
        Some(e) => ctx.output.warn(&format!("{}: {}", field.display_name(), e)),
        None => ctx.output.debug(&format!("{} is valid", field.display_name())),
    }
    Ok(())
}

/// The current month, for card expiry checks.
pub fn today() -> YearMonth {
    let now = Local::now();
    YearMonth::new(
        u16::try_from(now.year()).unwrap_or(u16::MAX),
        u8::try_from(now.month()).unwrap_or(12),
    )
}
