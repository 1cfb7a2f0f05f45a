//! Shapes written by the storefront before its records were versioned.
//!
//! Only read at the persistence boundary; nothing is ever written in these
//! shapes.

use serde::Deserialize;

use crate::cart::{LineItem, MAX_QUANTITY_PER_ITEM};
use crate::ids::CatalogItemId;
use crate::money::{Currency, Money};

/// One cart or order line, camelCase.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LegacyLineItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(alias = "price")]
    pub unit_price: LegacyPrice,
    pub quantity: i64,
}

/// Prices were stored as either a decimal string or a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum LegacyPrice {
    Text(String),
    Number(serde_json::Number),
}

impl LegacyPrice {
    pub fn to_money(&self, currency: Currency) -> Option<Money> {
        let text = match self {
            LegacyPrice::Text(s) => s.clone(),
            LegacyPrice::Number(n) => n.to_string(),
        };
        Money::parse_decimal(&text, currency).ok()
    }
}

/// Convert legacy lines into current line items.
///
/// Lines that cannot be priced or have no positive quantity are dropped;
/// the rest keep their order and merge by id, capped per item.
pub(crate) fn migrate_lines(legacy: Vec<LegacyLineItem>, currency: Currency) -> Vec<LineItem> {
    let mut items: Vec<LineItem> = Vec::with_capacity(legacy.len());
    for line in legacy {
        let Some(unit_price) = line.unit_price.to_money(currency) else {
            tracing::warn!(item_id = line.id, "dropping legacy line with unreadable price");
            continue;
        };
        if line.quantity <= 0 {
            continue;
        }
        let quantity = u32::try_from(line.quantity)
            .unwrap_or(u32::MAX)
            .min(MAX_QUANTITY_PER_ITEM);

        match items.iter_mut().find(|i| i.id.0 == line.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(quantity).min(MAX_QUANTITY_PER_ITEM)
            }
            None => items.push(LineItem {
                id: CatalogItemId(line.id),
                name: line.name,
                sku: line.sku,
                unit_price,
                quantity,
            }),
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_forms() {
        let text = LegacyPrice::Text("19.99".into());
        assert_eq!(text.to_money(Currency::USD).unwrap().amount_cents, 1999);

        let number: LegacyPrice = serde_json::from_str("7").unwrap();
        assert_eq!(number.to_money(Currency::USD).unwrap().amount_cents, 700);

        assert!(LegacyPrice::Text("free".into()).to_money(Currency::USD).is_none());
    }

    #[test]
    fn test_merge_and_cap() {
        let lines: Vec<LegacyLineItem> = serde_json::from_value(serde_json::json!([
            {"id": 1, "name": "Grips", "price": "10", "quantity": 60},
            {"id": 1, "name": "Grips", "price": "10", "quantity": 60},
            {"id": 2, "name": "Levers", "unitPrice": "30", "quantity": -1}
        ]))
        .unwrap();
        let items = migrate_lines(lines, Currency::USD);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, MAX_QUANTITY_PER_ITEM);
    }
}
