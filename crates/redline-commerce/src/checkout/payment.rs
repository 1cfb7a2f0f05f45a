//! Payment-intent request and response shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartTotals};
use crate::checkout::PaymentReference;
use crate::error::CommerceError;
use crate::ids::IdempotencyKey;

/// Metadata key holding the JSON cart snapshot.
pub const CART_METADATA_KEY: &str = "cart";
/// Metadata key echoing the idempotency key.
pub const IDEMPOTENCY_METADATA_KEY: &str = "idempotency_key";
/// Metadata key holding the checkout id.
pub const CHECKOUT_METADATA_KEY: &str = "checkout_id";

/// Body of a payment-intent creation request.
///
/// The cart snapshot in `metadata` is an audit aid for the processor's
/// dashboard; the amount is what gets charged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentIntentRequest {
    /// Amount in minor units.
    pub amount: i64,
    /// Lowercase ISO currency code.
    pub currency: String,
    pub metadata: BTreeMap<String, String>,
}

/// Cart line as it appears in the metadata snapshot.
#[derive(Debug, Serialize)]
struct SnapshotLine<'a> {
    id: i64,
    name: &'a str,
    quantity: u32,
    unit_price: i64,
}

impl PaymentIntentRequest {
    /// Build the request for charging `totals.grand_total`.
    pub fn new(cart: &Cart, totals: &CartTotals, key: &IdempotencyKey) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        if !totals.grand_total.is_positive() {
            return Err(CommerceError::InvalidAmount(totals.grand_total.display_amount()));
        }

        let lines: Vec<SnapshotLine<'_>> = cart
            .items
            .iter()
            .map(|item| SnapshotLine {
                id: item.id.0,
                name: &item.name,
                quantity: item.quantity,
                unit_price: item.unit_price.amount_cents,
            })
            .collect();

        let mut metadata = BTreeMap::new();
        metadata.insert(CART_METADATA_KEY.to_string(), serde_json::to_string(&lines)?);
        metadata.insert(IDEMPOTENCY_METADATA_KEY.to_string(), key.to_string());

        Ok(Self {
            amount: totals.grand_total.amount_cents,
            currency: totals.grand_total.currency.code().to_ascii_lowercase(),
            metadata,
        })
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Idempotency key carried in metadata, for the request header.
    pub fn idempotency_key(&self) -> Option<&str> {
        self.metadata.get(IDEMPOTENCY_METADATA_KEY).map(String::as_str)
    }
}

/// Payment intent as returned by the processor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl PaymentIntent {
    pub fn reference(&self) -> PaymentReference {
        PaymentReference::Intent { id: self.id.clone() }
    }

    pub fn is_succeeded(&self) -> bool {
        self.status == "succeeded"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;
    use crate::config::PricingConfig;
    use crate::money::{Currency, Money};

    fn cart() -> Cart {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(&CatalogItem::new(1, "Chain", "CH-1", Money::new(4000, Currency::USD)), 2);
        cart.add_item(&CatalogItem::new(2, "Lube", "LB-1", Money::new(2500, Currency::USD)), 1);
        cart
    }

    #[test]
    fn test_request_from_cart() {
        let cart = cart();
        let totals = cart.totals(&PricingConfig::default());
        let key = IdempotencyKey::from("idem_test");
        let request = PaymentIntentRequest::new(&cart, &totals, &key).unwrap();

        assert_eq!(request.amount, 11393);
        assert_eq!(request.currency, "usd");
        assert_eq!(request.idempotency_key(), Some("idem_test"));

        let snapshot: serde_json::Value = serde_json::from_str(&request.metadata[CART_METADATA_KEY]).unwrap();
        assert_eq!(snapshot[0]["id"], 1);
        assert_eq!(snapshot[0]["quantity"], 2);
        assert_eq!(snapshot[1]["unit_price"], 2500);
    }

    #[test]
    fn test_empty_cart_rejected() {
        let cart = Cart::new(Currency::USD);
        let totals = cart.totals(&PricingConfig::default());
        let err = PaymentIntentRequest::new(&cart, &totals, &IdempotencyKey::generate()).unwrap_err();
        assert!(matches!(err, CommerceError::EmptyCart));
    }

    #[test]
    fn test_body_shape() {
        let cart = cart();
        let totals = cart.totals(&PricingConfig::default());
        let request = PaymentIntentRequest::new(&cart, &totals, &IdempotencyKey::from("k"))
            .unwrap()
            .with_metadata(CHECKOUT_METADATA_KEY, "co_1");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["metadata"]["checkout_id"], "co_1");
        assert!(body["metadata"]["cart"].is_string());
    }

    #[test]
    fn test_intent_reference() {
        let intent: PaymentIntent =
            serde_json::from_str(r#"{"id":"pi_1","amount":100,"currency":"usd","status":"succeeded"}"#).unwrap();
        assert!(intent.is_succeeded());
        assert_eq!(intent.reference(), PaymentReference::Intent { id: "pi_1".into() });
    }
}
