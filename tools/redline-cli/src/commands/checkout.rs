//! Check out the cart.

use anyhow::{anyhow, bail, Context as _, Result};
use dialoguer::Confirm;
use redline_cache::{cache_key, Cache};
use redline_commerce::cart::{Cart, CartSession, LineItem};
use redline_commerce::checkout::{Address, CheckoutFlow, Order, OrderStore, PaymentReference};
use serde::{Deserialize, Serialize};

use super::format::today;
use super::CheckoutArgs;
use crate::context::Context;
use crate::output::{format_timestamp, status_badge};

/// An attempt saved right before payment, so a rerun after a failure sends
/// the same idempotency key.
#[derive(Debug, Serialize, Deserialize)]
struct PendingCheckout {
    flow: CheckoutFlow,
    amount: i64,
    #[serde(default)]
    items: Vec<LineItem>,
}

impl PendingCheckout {
    /// Same lines and same total as the cart being checked out.
    fn matches(&self, cart: &Cart, amount: i64) -> bool {
        self.amount == amount && self.items == cart.items && !self.flow.is_complete()
    }
}

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let pricing = &ctx.config.pricing;
    let cache = ctx.cache()?;
    let mut session = CartSession::open(cache.clone(), ctx.cart_id(), pricing.currency);
    let cart = session.cart().clone();
    let mut flow = CheckoutFlow::start(&cart).context("Nothing to check out")?;

    ctx.output.header("Checkout");

    // Step 1: Contact
    ctx.output.step(1, 5, "Contact");
    flow.advance()?;
    flow.set_contact(&args.name, &args.email, args.phone.as_deref());
    flow.advance().context("Contact details are incomplete")?;

    // Step 2: Shipping
    ctx.output.step(2, 5, "Shipping address");
    flow.set_shipping_address(shipping_address(&args));
    flow.advance().context("Shipping address is incomplete")?;

    // Step 3: Payment method
    ctx.output.step(3, 5, "Payment method");
    match (&args.po_number, &args.card, &args.expiry, &args.cvv) {
        (Some(number), ..) => {
            if !flow.set_purchase_order(number) {
                bail!("Purchase order number is empty");
            }
        }
        (None, Some(card), Some(expiry), Some(cvv)) => {
            flow.set_card(card, expiry, cvv, today())
                .map_err(|e| anyhow!("Card details: {}", e))?;
        }
        _ => bail!("Card number, expiry and security code are required"),
    }
    flow.advance().context("Payment details are incomplete")?;

    // Step 4: Review
    ctx.output.step(4, 5, "Review");
    let amount = cart.totals(pricing).grand_total.amount_cents;
    let pending_key = cache_key!("checkout", cart.id);
    resume_attempt(&cache, &pending_key, &mut flow, &cart, amount);
    review(&flow, &cart, ctx);

    if !args.yes {
        if ctx.output.is_json() {
            bail!("--yes is required with --json");
        }
        let confirmed = Confirm::new()
            .with_prompt("Place order?")
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.warn("Checkout cancelled");
            return Ok(());
        }
    }

    // Step 5: Payment
    ctx.output.step(5, 5, "Payment");
    let reference = match &flow.purchase_order {
        Some(number) => PaymentReference::PurchaseOrder { number: number.clone() },
        None => {
            let pending = PendingCheckout {
                flow: flow.clone(),
                amount,
                items: cart.items.clone(),
            };
            if let Err(e) = cache.set(&pending_key, &pending) {
                tracing::warn!(key = %pending_key, error = %e, "could not save checkout attempt");
            }
            create_intent(ctx, &flow, &cart).await?
        }
    };

    flow.complete(reference)?;
    let order = Order::from_checkout(&flow, &cart, pricing)?;
    OrderStore::new(cache.clone(), pricing.currency)
        .save(&order)
        .context("Failed to save order")?;
    if let Err(e) = cache.delete(&pending_key) {
        tracing::warn!(key = %pending_key, error = %e, "could not clear checkout attempt");
    }

    session.clear();
    session.close().context("Failed to clear cart")?;

    tracing::info!(order_id = %order.id, order_number = %order.order_number, payment = %order.payment, "order placed");
    show_confirmation(&order, ctx);
    Ok(())
}

fn shipping_address(args: &CheckoutArgs) -> Address {
    let name = args.name.trim();
    let (first, last) = name.split_once(' ').unwrap_or((name, ""));
    let mut address = Address::new(first, last, args.address.as_str(), args.city.as_str(), args.state.as_deref(), &args.zip);
    address.address2 = args
        .address2
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(String::from);
    match args.phone.as_deref() {
        Some(phone) => address.with_phone(phone),
        None => address,
    }
}

/// Reuse the previous attempt's id and idempotency key when the cart lines
/// and total have not changed since it was saved.
fn resume_attempt(cache: &Cache, key: &str, flow: &mut CheckoutFlow, cart: &Cart, amount: i64) {
    match cache.get::<PendingCheckout>(key) {
        Ok(Some(pending)) if pending.matches(cart, amount) => {
            tracing::debug!(checkout_id = %pending.flow.id, "resuming checkout attempt");
            flow.id = pending.flow.id;
            flow.idempotency_key = pending.flow.idempotency_key;
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(%key, error = %e, "ignoring unreadable checkout attempt"),
    }
}

async fn create_intent(ctx: &Context, flow: &CheckoutFlow, cart: &Cart) -> Result<PaymentReference> {
    let client = ctx.payment_client()?;
    let request = flow.payment_request(cart, &ctx.config.pricing)?;

    let spinner = ctx.output.spinner("Creating payment...");
    let result = client.create_intent(&request).await;
    spinner.finish_and_clear();

    let intent = match result {
        Ok(intent) => intent,
        Err(e) => {
            ctx.output.info("Run the same command again to retry; you will not be charged twice.");
            bail!("{} ({})", e.user_message(), e);
        }
    };
    ctx.output.kv("Payment", &format!("{} {}", intent.id, status_badge(&intent.status)));
    if !intent.is_succeeded() {
        ctx.output.warn("Payment still needs confirmation with the processor");
    }
    Ok(intent.reference())
}

fn review(flow: &CheckoutFlow, cart: &Cart, ctx: &Context) {
    if ctx.output.is_json() {
        return;
    }
    let totals = cart.totals(&ctx.config.pricing);

    ctx.output.kv("Customer", &format!("{} <{}>", flow.customer.name, flow.customer.email));
    if let Some(address) = &flow.shipping_address {
        ctx.output.kv("Ship to", &address.one_line());
    }
    match (&flow.card, &flow.purchase_order) {
        (Some(card), _) => ctx.output.kv("Card", &card.display()),
        (None, Some(number)) => ctx.output.kv("Purchase order", number),
        (None, None) => {}
    }
    ctx.output.kv("Items", &totals.item_count.to_string());
    ctx.output.kv("Subtotal", &totals.subtotal.display());
    ctx.output.kv("Shipping", &totals.shipping.display());
    ctx.output.kv("Tax", &totals.tax.display());
    ctx.output.kv("Total", &totals.grand_total.display());
}

fn show_confirmation(order: &Order, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(order);
        return;
    }
    ctx.output.success(&format!("Order {} placed", order.order_number));
    ctx.output.kv("Order id", order.id.as_str());
    ctx.output.kv("Payment", &order.payment.to_string());
    ctx.output.kv("Total", &order.totals.grand_total.display());
    ctx.output.kv("Placed", &format_timestamp(order.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_commerce::catalog::CatalogItem;
    use redline_commerce::money::{Currency, Money};

    fn cart_with(id: i64, cents: i64, quantity: u32) -> Cart {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(&CatalogItem::new(id, "Part", "SKU", Money::new(cents, Currency::USD)), quantity);
        cart
    }

    fn save_attempt(cache: &Cache, key: &str, cart: &Cart) -> CheckoutFlow {
        let flow = CheckoutFlow::start(cart).unwrap();
        let pending = PendingCheckout {
            flow: flow.clone(),
            amount: 5000,
            items: cart.items.clone(),
        };
        cache.set(key, &pending).unwrap();
        flow
    }

    #[test]
    fn test_resume_same_cart_reuses_key() {
        let cache = Cache::in_memory();
        let cart = cart_with(1, 2500, 2);
        let saved = save_attempt(&cache, "checkout:c", &cart);

        let mut flow = CheckoutFlow::start(&cart).unwrap();
        resume_attempt(&cache, "checkout:c", &mut flow, &cart, 5000);
        assert_eq!(flow.idempotency_key, saved.idempotency_key);
        assert_eq!(flow.id, saved.id);
    }

    #[test]
    fn test_resume_different_lines_same_total_starts_fresh() {
        let cache = Cache::in_memory();
        let saved = save_attempt(&cache, "checkout:c", &cart_with(1, 2500, 2));

        let other = cart_with(2, 5000, 1);
        let mut flow = CheckoutFlow::start(&other).unwrap();
        let fresh_key = flow.idempotency_key.clone();
        resume_attempt(&cache, "checkout:c", &mut flow, &other, 5000);
        assert_ne!(flow.idempotency_key, saved.idempotency_key);
        assert_eq!(flow.idempotency_key, fresh_key);
    }
}
