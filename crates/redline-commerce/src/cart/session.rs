//! Cart persistence across reloads.
//!
//! A [`CartSession`] owns one cart, hydrates it from the cache on open and
//! writes it back after every mutation that changed something.

use redline_cache::{cache_key, Cache};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartTotals};
use crate::catalog::CatalogItem;
use crate::config::PricingConfig;
use crate::error::CommerceError;
use crate::ids::{CartId, CatalogItemId};
use crate::legacy::{migrate_lines, LegacyLineItem};
use crate::money::Currency;

/// Current version of the persisted cart record.
pub const CART_RECORD_VERSION: u32 = 1;

/// Persisted cart shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartRecord {
    pub version: u32,
    pub cart: Cart,
}

impl CartRecord {
    pub fn new(cart: Cart) -> Self {
        Self {
            version: CART_RECORD_VERSION,
            cart,
        }
    }

    /// Decode a stored cart, migrating the legacy bare item list.
    ///
    /// Legacy lines that cannot be priced or have no positive quantity are
    /// dropped; the rest keep their order and merge by id.
    pub fn decode(bytes: &[u8], id: &CartId, currency: Currency) -> Result<(Cart, bool), CommerceError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        match value {
            serde_json::Value::Array(_) => {
                let legacy: Vec<LegacyLineItem> = serde_json::from_value(value)?;
                Ok((migrate_legacy(legacy, id, currency), true))
            }
            serde_json::Value::Object(ref map) => {
                let version = map
                    .get("version")
                    .and_then(serde_json::Value::as_u64)
                    .ok_or_else(|| CommerceError::SerializationError("cart record without version".into()))?;
                if version != u64::from(CART_RECORD_VERSION) {
                    return Err(CommerceError::UnsupportedVersion(
                        u32::try_from(version).unwrap_or(u32::MAX),
                    ));
                }
                let record: CartRecord = serde_json::from_value(value)?;
                Ok((record.cart, false))
            }
            _ => Err(CommerceError::SerializationError(
                "cart record is neither an object nor a list".into(),
            )),
        }
    }
}

fn migrate_legacy(legacy: Vec<LegacyLineItem>, id: &CartId, currency: Currency) -> Cart {
    let mut cart = Cart::with_id(id.clone(), currency);
    cart.items = migrate_lines(legacy, currency);
    cart
}

/// A cart bound to its storage slot.
pub struct CartSession {
    cache: Cache,
    key: String,
    cart: Cart,
    dirty: bool,
}

impl CartSession {
    /// Open the cart stored under `id`, or start an empty one.
    ///
    /// Unreadable records degrade to an empty cart with a warning. Legacy
    /// records are rewritten in the current shape right away.
    pub fn open(cache: Cache, id: CartId, currency: Currency) -> Self {
        let key = cache_key!("cart", id);

        let (cart, migrated) = match cache.get_raw(&key) {
            Ok(Some(bytes)) => match CartRecord::decode(&bytes, &id, currency) {
                Ok(decoded) => decoded,
                Err(e) => {
                    tracing::warn!(%key, error = %e, "discarding unreadable cart record");
                    (Cart::with_id(id, currency), false)
                }
            },
            Ok(None) => (Cart::with_id(id, currency), false),
            Err(e) => {
                tracing::warn!(%key, error = %e, "cart storage unavailable, starting empty");
                (Cart::with_id(id, currency), false)
            }
        };

        let mut session = Self {
            cache,
            key,
            cart,
            dirty: false,
        };
        if migrated {
            tracing::debug!(key = %session.key, "migrated legacy cart record");
            session.persist();
        }
        session
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Storage key of this cart.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether a write failed and the stored copy is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn add_item(&mut self, item: &CatalogItem, quantity: u32) -> bool {
        let changed = self.cart.add_item(item, quantity);
        self.after_mutation(changed)
    }

    pub fn update_quantity(&mut self, id: CatalogItemId, quantity: i64) -> bool {
        let changed = self.cart.update_quantity(id, quantity);
        self.after_mutation(changed)
    }

    pub fn remove_item(&mut self, id: CatalogItemId) -> bool {
        let changed = self.cart.remove_item(id);
        self.after_mutation(changed)
    }

    pub fn clear(&mut self) -> bool {
        let changed = self.cart.clear();
        self.after_mutation(changed)
    }

    pub fn totals(&self, config: &PricingConfig) -> CartTotals {
        self.cart.totals(config)
    }

    /// Flush any pending write and release the session.
    pub fn close(mut self) -> Result<Cart, CommerceError> {
        if self.dirty {
            self.write()?;
            self.dirty = false;
        }
        Ok(self.cart)
    }

    fn after_mutation(&mut self, changed: bool) -> bool {
        if changed {
            tracing::debug!(
                key = %self.key,
                lines = self.cart.unique_item_count(),
                items = self.cart.item_count(),
                "cart updated"
            );
            self.persist();
        }
        changed
    }

    fn persist(&mut self) {
        match self.write() {
            Ok(()) => self.dirty = false,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to persist cart");
                self.dirty = true;
            }
        }
    }

    fn write(&self) -> Result<(), CommerceError> {
        self.cache.set(&self.key, &CartRecord::new(self.cart.clone()))?;
        Ok(())
    }
}

impl std::fmt::Debug for CartSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartSession")
            .field("key", &self.key)
            .field("items", &self.cart.items.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}
