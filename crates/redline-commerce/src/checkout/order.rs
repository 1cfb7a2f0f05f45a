//! Placed orders, their persistence record, and confirmation lookup.

use std::fmt;

use redline_cache::{cache_key, Cache};
use serde::{Deserialize, Serialize};

use crate::cart::{current_timestamp, Cart, CartTotals, LineItem};
use crate::checkout::{Address, CheckoutFlow, CheckoutStep};
use crate::config::PricingConfig;
use crate::error::CommerceError;
use crate::ids::OrderId;
use crate::legacy::{migrate_lines, LegacyLineItem, LegacyPrice};
use crate::money::{Currency, Money};

/// Current version of the persisted order record.
pub const ORDER_RECORD_VERSION: u32 = 1;

/// How an order was paid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentReference {
    /// Card payment through the processor.
    Intent { id: String },
    /// Invoiced against a purchase order.
    PurchaseOrder { number: String },
}

impl PaymentReference {
    /// The processor intent id or the PO number.
    pub fn value(&self) -> &str {
        match self {
            PaymentReference::Intent { id } => id,
            PaymentReference::PurchaseOrder { number } => number,
        }
    }
}

impl fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentReference::Intent { id } => write!(f, "payment {id}"),
            PaymentReference::PurchaseOrder { number } => write!(f, "PO {number}"),
        }
    }
}

/// Who placed the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Money totals frozen at the time the order was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub grand_total: Money,
}

impl From<&CartTotals> for OrderTotals {
    fn from(totals: &CartTotals) -> Self {
        Self {
            subtotal: totals.subtotal,
            shipping: totals.shipping,
            tax: totals.tax,
            grand_total: totals.grand_total,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Human-facing number shown on the confirmation page.
    pub order_number: String,
    pub payment: PaymentReference,
    pub customer: Customer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    pub items: Vec<LineItem>,
    pub totals: OrderTotals,
    pub currency: Currency,
    /// Unix timestamp of placement.
    pub created_at: i64,
}

impl Order {
    /// Build the order for a completed checkout of `cart`.
    pub fn from_checkout(flow: &CheckoutFlow, cart: &Cart, config: &PricingConfig) -> Result<Self, CommerceError> {
        if flow.step != CheckoutStep::Complete {
            return Err(CommerceError::CheckoutIncomplete(flow.missing().join(", ")));
        }
        let payment = flow
            .payment_reference
            .clone()
            .ok_or_else(|| CommerceError::CheckoutIncomplete("payment reference".to_string()))?;
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let totals = cart.totals(config);
        Ok(Self {
            id: OrderId::generate(),
            order_number: generate_order_number(),
            payment,
            customer: flow.customer.clone(),
            shipping_address: flow.shipping_address.clone(),
            items: cart.items.clone(),
            totals: OrderTotals::from(&totals),
            currency: cart.currency,
            created_at: current_timestamp(),
        })
    }

    /// Get total item count.
    pub fn item_count(&self) -> u32 {
        self.items.iter().fold(0u32, |n, i| n.saturating_add(i.quantity))
    }

    /// Whether `reference` names this order by id, number or payment.
    pub fn matches(&self, reference: &str) -> bool {
        let reference = reference.trim();
        !reference.is_empty()
            && (self.id.as_str() == reference
                || self.order_number.eq_ignore_ascii_case(reference)
                || self.payment.value() == reference)
    }
}

/// `ORD-` followed by the placement second and a short random suffix.
pub fn generate_order_number() -> String {
    use rand::Rng;
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!("ORD-{}-{:03}", current_timestamp(), suffix)
}

/// Persisted order shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderRecord {
    pub version: u32,
    pub order: Order,
}

impl OrderRecord {
    pub fn new(order: Order) -> Self {
        Self {
            version: ORDER_RECORD_VERSION,
            order,
        }
    }

    /// Decode a stored order, migrating an unversioned confirmation snapshot.
    ///
    /// Returns the order and whether it was migrated.
    pub fn decode(bytes: &[u8], currency: Currency) -> Result<(Order, bool), CommerceError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        let Some(map) = value.as_object() else {
            return Err(CommerceError::SerializationError("order record is not an object".into()));
        };
        match map.get("version").and_then(serde_json::Value::as_u64) {
            Some(version) if version == u64::from(ORDER_RECORD_VERSION) => {
                let record: OrderRecord = serde_json::from_value(value)?;
                Ok((record.order, false))
            }
            Some(version) => Err(CommerceError::UnsupportedVersion(
                u32::try_from(version).unwrap_or(u32::MAX),
            )),
            None => {
                let snapshot: LegacySnapshot = serde_json::from_value(value)?;
                Ok((snapshot.into_order(currency)?, true))
            }
        }
    }
}

/// Confirmation snapshot written before orders were versioned.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySnapshot {
    #[serde(default)]
    order_id: Option<String>,
    #[serde(default)]
    order_number: Option<String>,
    #[serde(default)]
    payment_intent_id: Option<String>,
    #[serde(default)]
    po_number: Option<String>,
    #[serde(default, alias = "customerName")]
    name: String,
    #[serde(default, alias = "customerEmail")]
    email: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    shipping_address: Option<Address>,
    #[serde(default)]
    items: Vec<LegacyLineItem>,
    subtotal: LegacyPrice,
    #[serde(default)]
    shipping: Option<LegacyPrice>,
    #[serde(default)]
    tax: Option<LegacyPrice>,
    total: LegacyPrice,
    #[serde(default)]
    created_at: Option<i64>,
}

impl LegacySnapshot {
    fn into_order(self, currency: Currency) -> Result<Order, CommerceError> {
        let payment = match (self.payment_intent_id, self.po_number) {
            (Some(id), _) if !id.trim().is_empty() => PaymentReference::Intent { id },
            (_, Some(number)) if !number.trim().is_empty() => PaymentReference::PurchaseOrder { number },
            _ => {
                return Err(CommerceError::SerializationError(
                    "order snapshot has no payment reference".into(),
                ))
            }
        };

        let price = |p: &LegacyPrice, field: &str| {
            p.to_money(currency)
                .ok_or_else(|| CommerceError::InvalidAmount(format!("snapshot {field}")))
        };
        let optional = |p: Option<&LegacyPrice>, field: &str| match p {
            Some(p) => price(p, field),
            None => Ok(Money::zero(currency)),
        };
        let totals = OrderTotals {
            subtotal: price(&self.subtotal, "subtotal")?,
            shipping: optional(self.shipping.as_ref(), "shipping")?,
            tax: optional(self.tax.as_ref(), "tax")?,
            grand_total: price(&self.total, "total")?,
        };

        let id = self
            .order_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| payment.value().to_string());
        // Browser snapshots used milliseconds.
        let created_at = match self.created_at {
            Some(ts) if ts > 100_000_000_000 => ts / 1000,
            Some(ts) => ts,
            None => 0,
        };

        Ok(Order {
            order_number: self.order_number.unwrap_or_else(|| id.clone()),
            id: OrderId::new(id),
            payment,
            customer: Customer {
                name: self.name,
                email: self.email,
                phone: self.phone,
            },
            shipping_address: self.shipping_address,
            items: migrate_lines(self.items, currency),
            totals,
            currency,
            created_at,
        })
    }
}

/// The sources an order confirmation is looked up in.
pub trait OrderLookup {
    /// Look an order up by its id.
    fn by_id(&self, id: &OrderId) -> Result<Option<Order>, CommerceError>;

    /// Orders placed by `email`, newest first.
    fn history(&self, email: &str) -> Result<Vec<Order>, CommerceError>;

    /// The snapshot written by the most recent checkout on this device.
    fn last_snapshot(&self) -> Result<Option<Order>, CommerceError>;
}

/// Where [`locate_order`] found an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    Direct,
    History,
    Snapshot,
}

impl OrderSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSource::Direct => "direct",
            OrderSource::History => "history",
            OrderSource::Snapshot => "snapshot",
        }
    }
}

/// An order and the source it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedOrder {
    pub order: Order,
    pub source: OrderSource,
}

/// Find the order named by `reference` (id, number or payment reference).
///
/// Sources are tried in order: direct lookup, the history of `email`, then
/// the local snapshot. A failing source is logged and skipped.
pub fn locate_order(lookup: &impl OrderLookup, reference: &str, email: Option<&str>) -> Option<LocatedOrder> {
    let found = |order: Order, source: OrderSource| {
        tracing::debug!(order_id = %order.id, source = source.as_str(), "order located");
        Some(LocatedOrder { order, source })
    };

    match lookup.by_id(&OrderId::new(reference.trim())) {
        Ok(Some(order)) => return found(order, OrderSource::Direct),
        Ok(None) => {}
        Err(e) => tracing::warn!(%reference, error = %e, "direct order lookup failed"),
    }

    if let Some(email) = email.filter(|e| !e.trim().is_empty()) {
        match lookup.history(email) {
            Ok(orders) => {
                if let Some(order) = orders.into_iter().find(|o| o.matches(reference)) {
                    return found(order, OrderSource::History);
                }
            }
            Err(e) => tracing::warn!(%reference, error = %e, "order history lookup failed"),
        }
    }

    match lookup.last_snapshot() {
        Ok(Some(order)) if order.matches(reference) => found(order, OrderSource::Snapshot),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(%reference, error = %e, "order snapshot lookup failed");
            None
        }
    }
}

/// Orders persisted in the local store.
///
/// Keys: `order:<id>`, `orders:history:<email>` (ids, newest first) and
/// `orders:last`, which no order id can reach. Legacy records are rewritten on first read.
#[derive(Clone)]
pub struct OrderStore {
    cache: Cache,
    currency: Currency,
}

const LAST_ORDER_KEY: &str = "orders:last";

impl OrderStore {
    pub fn new(cache: Cache, currency: Currency) -> Self {
        Self { cache, currency }
    }

    /// Persist `order`, index it under its customer and make it the last snapshot.
    pub fn save(&self, order: &Order) -> Result<(), CommerceError> {
        let record = OrderRecord::new(order.clone());
        self.cache.set(&cache_key!("order", order.id), &record)?;
        self.cache.set(LAST_ORDER_KEY, &record)?;

        if !order.customer.email.trim().is_empty() {
            let key = history_key(&order.customer.email);
            let mut ids: Vec<String> = self.cache.get(&key)?.unwrap_or_default();
            ids.retain(|id| id != order.id.as_str());
            ids.insert(0, order.id.to_string());
            self.cache.set(&key, &ids)?;
        }
        tracing::debug!(order_id = %order.id, "order saved");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Order>, CommerceError> {
        let Some(bytes) = self.cache.get_raw(key)? else {
            return Ok(None);
        };
        let (order, migrated) = OrderRecord::decode(&bytes, self.currency)?;
        if migrated {
            tracing::debug!(%key, order_id = %order.id, "migrated legacy order snapshot");
            self.cache.set(key, &OrderRecord::new(order.clone()))?;
        }
        Ok(Some(order))
    }
}

impl OrderLookup for OrderStore {
    fn by_id(&self, id: &OrderId) -> Result<Option<Order>, CommerceError> {
        if id.as_str().is_empty() {
            return Ok(None);
        }
        self.load(&cache_key!("order", id))
    }

    fn history(&self, email: &str) -> Result<Vec<Order>, CommerceError> {
        let ids: Vec<String> = self.cache.get(&history_key(email))?.unwrap_or_default();
        let mut orders = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(order) = self.by_id(&OrderId::new(id))? {
                orders.push(order);
            }
        }
        Ok(orders)
    }

    fn last_snapshot(&self) -> Result<Option<Order>, CommerceError> {
        self.load(LAST_ORDER_KEY)
    }
}

impl fmt::Debug for OrderStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderStore").field("currency", &self.currency).finish()
    }
}

fn history_key(email: &str) -> String {
    cache_key!("orders", "history", email.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;
    use crate::checkout::YearMonth;

    fn order(id: &str, email: &str) -> Order {
        Order {
            id: OrderId::new(id),
            order_number: format!("ORD-{id}"),
            payment: PaymentReference::Intent { id: format!("pi_{id}") },
            customer: Customer {
                name: "Ada Rider".into(),
                email: email.into(),
                phone: None,
            },
            shipping_address: None,
            items: Vec::new(),
            totals: OrderTotals {
                subtotal: Money::new(1000, Currency::USD),
                shipping: Money::new(1299, Currency::USD),
                tax: Money::new(85, Currency::USD),
                grand_total: Money::new(2384, Currency::USD),
            },
            currency: Currency::USD,
            created_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_payment_reference_serde() {
        let json = serde_json::to_value(PaymentReference::PurchaseOrder { number: "PO-7".into() }).unwrap();
        assert_eq!(json, serde_json::json!({"type": "purchase_order", "number": "PO-7"}));
    }

    #[test]
    fn test_legacy_snapshot_migrated() {
        let bytes = serde_json::to_vec(&serde_json::json!({
            "paymentIntentId": "pi_123",
            "name": "Ada Rider",
            "email": "ada@example.com",
            "items": [{"id": 4, "name": "Visor", "unitPrice": "45.50", "quantity": 2}],
            "subtotal": "91.00",
            "shipping": 12.99,
            "tax": "7.74",
            "total": "111.73",
            "createdAt": 1_700_000_000_123i64
        }))
        .unwrap();

        let (order, migrated) = OrderRecord::decode(&bytes, Currency::USD).unwrap();
        assert!(migrated);
        assert_eq!(order.id.as_str(), "pi_123");
        assert_eq!(order.payment, PaymentReference::Intent { id: "pi_123".into() });
        assert_eq!(order.items[0].unit_price.amount_cents, 4550);
        assert_eq!(order.totals.shipping.amount_cents, 1299);
        assert_eq!(order.totals.grand_total.amount_cents, 11173);
        assert_eq!(order.created_at, 1_700_000_000);
    }

    #[test]
    fn test_legacy_po_snapshot() {
        let bytes = br#"{"orderId":"o-9","poNumber":"PO-55","subtotal":"10","total":"10"}"#;
        let (order, _) = OrderRecord::decode(bytes, Currency::USD).unwrap();
        assert_eq!(order.id.as_str(), "o-9");
        assert_eq!(order.payment, PaymentReference::PurchaseOrder { number: "PO-55".into() });
        assert!(order.totals.tax.is_zero());
    }

    #[test]
    fn test_snapshot_without_payment_rejected() {
        let bytes = br#"{"orderId":"o-1","subtotal":"10","total":"10"}"#;
        assert!(OrderRecord::decode(bytes, Currency::USD).is_err());
    }

    #[test]
    fn test_unknown_order_version() {
        let bytes = br#"{"version": 3, "order": {}}"#;
        let err = OrderRecord::decode(bytes, Currency::USD).unwrap_err();
        assert!(matches!(err, CommerceError::UnsupportedVersion(3)));
    }

    #[test]
    fn test_store_lookup_sources() {
        let store = OrderStore::new(Cache::in_memory(), Currency::USD);
        store.save(&order("a", "Ada@Example.com")).unwrap();
        store.save(&order("b", "ada@example.com")).unwrap();

        let direct = locate_order(&store, "a", None).unwrap();
        assert_eq!(direct.source, OrderSource::Direct);

        let history = locate_order(&store, "ORD-a", Some("ada@example.com")).unwrap();
        assert_eq!(history.source, OrderSource::History);
        assert_eq!(history.order.id.as_str(), "a");

        let snapshot = locate_order(&store, "pi_b", None).unwrap();
        assert_eq!(snapshot.source, OrderSource::Snapshot);

        assert!(locate_order(&store, "pi_a", None).is_none());
        assert_eq!(store.history("ADA@example.com").unwrap().len(), 2);
    }

    #[test]
    fn test_snapshot_not_reachable_by_id() {
        let store = OrderStore::new(Cache::in_memory(), Currency::USD);
        store.save(&order("a", "ada@example.com")).unwrap();

        assert!(store.by_id(&OrderId::new("last")).unwrap().is_none());
        assert!(locate_order(&store, "last", None).is_none());

        store.save(&order("last", "ada@example.com")).unwrap();
        store.save(&order("b", "ada@example.com")).unwrap();
        assert_eq!(store.by_id(&OrderId::new("last")).unwrap().unwrap().id.as_str(), "last");
        assert_eq!(store.last_snapshot().unwrap().unwrap().id.as_str(), "b");
    }

    #[test]
    fn test_legacy_last_snapshot_rewritten() {
        let cache = Cache::in_memory();
        cache
            .set(
                LAST_ORDER_KEY,
                &serde_json::json!({"poNumber": "PO-1", "subtotal": 5, "total": 5}),
            )
            .unwrap();
        let store = OrderStore::new(cache.clone(), Currency::USD);
        let located = locate_order(&store, "PO-1", None).unwrap();
        assert_eq!(located.source, OrderSource::Snapshot);

        let record: OrderRecord = cache.get(LAST_ORDER_KEY).unwrap().unwrap();
        assert_eq!(record.version, ORDER_RECORD_VERSION);
    }

    #[test]
    fn test_from_checkout() {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(&CatalogItem::new(1, "Chain", "CH-1", Money::new(4000, Currency::USD)), 2);
        cart.add_item(&CatalogItem::new(2, "Lube", "LB-1", Money::new(2500, Currency::USD)), 1);

        let mut flow = CheckoutFlow::start(&cart).unwrap();
        assert!(Order::from_checkout(&flow, &cart, &PricingConfig::default()).is_err());

        flow.advance().unwrap();
        flow.set_contact("Ada Rider", "ada@example.com", None);
        flow.advance().unwrap();
        flow.set_shipping_address(Address::new("Ada", "Rider", "1 Pit Ln", "Austin", Some("TX"), "78701"));
        flow.advance().unwrap();
        flow.set_card("4242 4242 4242 4242", "12/30", "123", YearMonth::new(2026, 10)).unwrap();
        flow.advance().unwrap();
        flow.complete(PaymentReference::Intent { id: "pi_9".into() }).unwrap();

        let order = Order::from_checkout(&flow, &cart, &PricingConfig::default()).unwrap();
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.totals.grand_total.amount_cents, 11393);
        assert!(order.matches("pi_9"));
        assert!(order.order_number.starts_with("ORD-"));
    }
}
