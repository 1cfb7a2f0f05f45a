//! Cart commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use redline_commerce::cart::{Cart, CartSession, CartTotals};
use redline_commerce::catalog::CatalogItem;
use redline_commerce::ids::CatalogItemId;
use redline_commerce::money::Money;
use serde::Serialize;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::format_timestamp;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.cart_session()?;

    match args.command {
        CartCommand::Show => {}
        CartCommand::Add {
            id,
            quantity,
            price,
            name,
            sku,
        } => {
            let item = match price {
                Some(price) => {
                    let price = Money::parse_decimal(&price, ctx.config.pricing.currency)
                        .with_context(|| format!("Invalid price: {}", price))?;
                    CatalogItem::new(id, name.unwrap_or_default(), sku, price)
                }
                None => fetch_item(ctx, CatalogItemId(id)).await?,
            };
            if session.add_item(&item, quantity) {
                ctx.output.success(&format!("Added {} × {}", quantity, item.name));
            } else {
                ctx.output.warn("Cart unchanged");
            }
        }
        CartCommand::Update { id, quantity } => {
            if session.update_quantity(CatalogItemId(id), quantity) {
                ctx.output.success("Quantity updated");
            } else {
                ctx.output.warn(&format!("No change for item {}", id));
            }
        }
        CartCommand::Remove { id } => {
            if session.remove_item(CatalogItemId(id)) {
                ctx.output.success(&format!("Removed item {}", id));
            } else {
                ctx.output.warn(&format!("Item {} is not in the cart", id));
            }
        }
        CartCommand::Clear { yes } => {
            if session.cart().is_empty() {
                ctx.output.info("Cart is already empty");
            } else if yes || confirm_clear(&session)? {
                session.clear();
                ctx.output.success("Cart cleared");
            } else {
                ctx.output.warn("Clear cancelled");
                return Ok(());
            }
        }
    }

    if session.is_dirty() {
        ctx.output.warn("Cart could not be saved; retrying on exit");
    }
    let cart = session.close().context("Failed to save cart")?;
    show(&cart, ctx);
    Ok(())
}

fn confirm_clear(session: &CartSession) -> Result<bool> {
    let prompt = format!("Remove all {} items from the cart?", session.cart().item_count());
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

async fn fetch_item(ctx: &Context, id: CatalogItemId) -> Result<CatalogItem> {
    let client = ctx.catalog_client()?;
    let spinner = ctx.output.spinner(&format!("Looking up item {}...", id));
    let result = client.item(id).await;
    spinner.finish_and_clear();

    match result {
        Ok(Some(item)) if !item.in_stock => {
            ctx.output.warn(&format!("{} is out of stock", item.name));
            Ok(item)
        }
        Ok(Some(item)) => Ok(item),
        Ok(None) => bail!("Item {} not found in the catalog", id),
        Err(e) => bail!("{} ({})", e.user_message(), e),
    }
}

#[derive(Serialize)]
struct CartView<'a> {
    cart: &'a Cart,
    totals: CartTotals,
}

/// Print the cart with its totals.
pub fn show(cart: &Cart, ctx: &Context) {
    let totals = cart.totals(&ctx.config.pricing);

    if ctx.output.is_json() {
        ctx.output.json(&CartView { cart, totals });
        return;
    }

    ctx.output.header(&format!("Cart {}", cart.id));
    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return;
    }

    let widths = [8, 32, 5, 10, 10];
    ctx.output.table_row(&["ID", "Item", "Qty", "Price", "Total"], &widths);
    for item in &cart.items {
        ctx.output.table_row(
            &[
                &item.id.to_string(),
                &item.name,
                &item.quantity.to_string(),
                &item.unit_price.display(),
                &item.total().display(),
            ],
            &widths,
        );
    }

    println!();
    ctx.output.kv("Items", &totals.item_count.to_string());
    ctx.output.kv("Subtotal", &totals.subtotal.display());
    if totals.has_free_shipping() {
        ctx.output.kv("Shipping", "Free");
    } else {
        ctx.output.kv("Shipping", &totals.shipping.display());
    }
    ctx.output.kv(
        &format!("Tax ({}%)", f64::from(ctx.config.pricing.tax_rate.basis_points()) / 100.0),
        &totals.tax.display(),
    );
    ctx.output.kv("Total", &totals.grand_total.display());
    ctx.output.kv("Updated", &format_timestamp(cart.updated_at));

    if !totals.has_free_shipping() {
        ctx.output.info(&format!(
            "Add {} more for free shipping",
            totals.free_shipping_remaining.display()
        ));
    }
}
