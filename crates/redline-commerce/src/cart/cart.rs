//! Cart and line item types.
//!
//! Every mutation is total: bad input is ignored and reported through the
//! `bool` return, never as an error.

use serde::{Deserialize, Serialize};

use crate::cart::CartTotals;
use crate::catalog::CatalogItem;
use crate::config::PricingConfig;
use crate::ids::{CartId, CatalogItemId};
use crate::money::{Currency, Money};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: u32 = 99;

/// A shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Items in insertion order.
    pub items: Vec<LineItem>,
    /// Cart currency.
    pub currency: Currency,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self::with_id(CartId::generate(), currency)
    }

    /// Create an empty cart with a known id.
    pub fn with_id(id: CartId, currency: Currency) -> Self {
        let now = current_timestamp();
        Self {
            id,
            items: Vec::new(),
            currency,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a catalog item, merging into an existing line with the same id.
    ///
    /// A zero quantity or a price in another currency is ignored. The line
    /// quantity is capped at [`MAX_QUANTITY_PER_ITEM`].
    pub fn add_item(&mut self, item: &CatalogItem, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        if item.price.currency != self.currency {
            tracing::debug!(
                item_id = %item.id,
                expected = %self.currency,
                got = %item.price.currency,
                "ignoring item priced in another currency"
            );
            return false;
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            let quantity = existing.quantity.saturating_add(quantity).min(MAX_QUANTITY_PER_ITEM);
            if quantity == existing.quantity {
                return false;
            }
            existing.quantity = quantity;
        } else {
            self.items.push(LineItem::from_catalog(item, quantity));
        }

        self.touch();
        true
    }

    /// Set a line's quantity.
    ///
    /// Quantities of zero or less are ignored; use [`Cart::remove_item`] to
    /// drop a line. Unknown ids are a no-op.
    pub fn update_quantity(&mut self, id: CatalogItemId, quantity: i64) -> bool {
        if quantity <= 0 {
            return false;
        }
        let quantity = u32::try_from(quantity)
            .unwrap_or(u32::MAX)
            .min(MAX_QUANTITY_PER_ITEM);

        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                self.touch();
                true
            }
            _ => false,
        }
    }

    /// Remove a line. Unknown ids are a no-op.
    pub fn remove_item(&mut self, id: CatalogItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.id != id);
        let removed = self.items.len() < len_before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Remove every line. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.items.clear();
        self.touch();
        true
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a line by catalog id.
    pub fn get_item(&self, id: CatalogItemId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// `unit_price × quantity` for one line.
    pub fn line_total(&self, id: CatalogItemId) -> Option<Money> {
        self.get_item(id).map(LineItem::total)
    }

    /// Derive totals. Always recomputed from the lines.
    pub fn totals(&self, config: &PricingConfig) -> CartTotals {
        CartTotals::compute(&self.items, self.currency, config)
    }

    fn touch(&mut self) {
        self.updated_at = current_timestamp();
    }
}

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    /// Catalog item id; unique within a cart.
    pub id: CatalogItemId,
    /// Display name captured when the item was added.
    pub name: String,
    /// Stock keeping unit.
    pub sku: String,
    /// Unit price captured when the item was added.
    pub unit_price: Money,
    /// Quantity, at least 1.
    pub quantity: u32,
}

impl LineItem {
    fn from_catalog(item: &CatalogItem, quantity: u32) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            sku: item.sku.clone(),
            unit_price: item.price,
            quantity: quantity.min(MAX_QUANTITY_PER_ITEM),
        }
    }

    /// `unit_price × quantity`, saturating.
    pub fn total(&self) -> Money {
        Money::new(
            self.unit_price.amount_cents.saturating_mul(i64::from(self.quantity)),
            self.unit_price.currency,
        )
    }
}

/// Get current Unix timestamp.
pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
