//! Cart totals: subtotal, shipping, tax and grand total.

use serde::{Deserialize, Serialize};

use crate::cart::LineItem;
use crate::config::PricingConfig;
use crate::ids::CatalogItemId;
use crate::money::{Currency, Money};

/// Derived pricing for a cart. Never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Zero at or above the free-shipping threshold, flat rate otherwise.
    pub shipping: Money,
    /// Subtotal times the tax rate, rounded half-up to the cent.
    pub tax: Money,
    /// Subtotal + shipping + tax.
    pub grand_total: Money,
    /// Sum of quantities.
    pub item_count: u32,
    /// Spend still needed for free shipping; zero once reached.
    pub free_shipping_remaining: Money,
    /// Per-line breakdown.
    pub lines: Vec<LineTotal>,
}

impl CartTotals {
    /// Compute totals for a set of lines.
    pub fn compute(items: &[LineItem], currency: Currency, config: &PricingConfig) -> Self {
        let lines: Vec<LineTotal> = items
            .iter()
            .map(|item| LineTotal {
                id: item.id,
                unit_price: item.unit_price,
                quantity: item.quantity,
                total: item.total(),
            })
            .collect();

        let subtotal_cents = lines
            .iter()
            .fold(0i64, |acc, line| acc.saturating_add(line.total.amount_cents));
        let subtotal = Money::new(subtotal_cents, currency);

        let threshold = config.free_shipping_threshold_cents;
        let shipping_cents = if subtotal_cents >= threshold {
            0
        } else {
            config.flat_shipping_cents
        };
        let tax = subtotal.apply_basis_points(config.tax_rate.basis_points());

        let grand_total_cents = subtotal_cents
            .saturating_add(shipping_cents)
            .saturating_add(tax.amount_cents);

        Self {
            subtotal,
            shipping: Money::new(shipping_cents, currency),
            tax,
            grand_total: Money::new(grand_total_cents, currency),
            item_count: items.iter().map(|i| i.quantity).sum(),
            free_shipping_remaining: Money::new(threshold.saturating_sub(subtotal_cents).max(0), currency),
            lines,
        }
    }

    /// Whether shipping is waived.
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero() && !self.lines.is_empty()
    }
}

/// Pricing for a single line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineTotal {
    pub id: CatalogItemId,
    pub unit_price: Money,
    pub quantity: u32,
    /// `unit_price × quantity`.
    pub total: Money,
}
