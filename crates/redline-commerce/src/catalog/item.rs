//! The catalog item shape the cart consumes.

use serde::{Deserialize, Serialize};

use crate::ids::CatalogItemId;
use crate::money::Money;

/// An item as returned by the catalog service, after boundary validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Catalog identifier.
    pub id: CatalogItemId,
    /// Display name.
    pub name: String,
    /// Stock keeping unit.
    pub sku: String,
    /// Current unit price.
    pub price: Money,
    /// Brand name, when the catalog reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Whether the catalog reports stock on hand.
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

impl CatalogItem {
    /// Create an in-stock item with no brand.
    pub fn new(id: impl Into<CatalogItemId>, name: impl Into<String>, sku: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sku: sku.into(),
            price,
            brand: None,
            in_stock: true,
        }
    }
}
