//! Order lookup.

use anyhow::{bail, Result};
use redline_commerce::checkout::{locate_order, Order};
use serde::Serialize;

use super::OrderArgs;
use crate::context::Context;
use crate::output::format_timestamp;

#[derive(Serialize)]
struct OrderView<'a> {
    source: &'static str,
    order: &'a Order,
}

/// Run the order command.
pub async fn run(args: OrderArgs, ctx: &Context) -> Result<()> {
    let store = ctx.order_store()?;
    let email = args.email.as_deref().map(str::trim).filter(|e| !e.is_empty());

    let Some(located) = locate_order(&store, args.reference.trim(), email) else {
        bail!("No order found for '{}'", args.reference.trim());
    };

    if ctx.output.is_json() {
        ctx.output.json(&OrderView {
            source: located.source.as_str(),
            order: &located.order,
        });
        return Ok(());
    }

    let order = &located.order;
    ctx.output.header(&format!("Order {}", order.order_number));
    ctx.output.kv("Order id", order.id.as_str());
    ctx.output.kv("Found via", located.source.as_str());
    ctx.output.kv("Placed", &format_timestamp(order.created_at));
    ctx.output.kv("Payment", &order.payment.to_string());
    ctx.output.kv("Customer", &order.customer.name);
    if !order.customer.email.is_empty() {
        ctx.output.kv("Email", &order.customer.email);
    }
    if let Some(address) = &order.shipping_address {
        ctx.output.kv("Ship to", &address.one_line());
    }

    println!();
    for item in &order.items {
        ctx.output.list_item(&format!(
            "{} × {} @ {} = {}",
            item.quantity,
            item.name,
            item.unit_price.display(),
            item.total().display()
        ));
    }
    println!();
    ctx.output.kv("Subtotal", &order.totals.subtotal.display());
    ctx.output.kv("Shipping", &order.totals.shipping.display());
    ctx.output.kv("Tax", &order.totals.tax.display());
    ctx.output.kv("Total", &order.totals.grand_total.display());
    Ok(())
}
