//! Storefront domain types and logic for Redline.
//!
//! This crate holds everything the motorcycle-parts storefront computes
//! locally, independent of any UI or network layer:
//!
//! - **Cart**: line items, quantity mutations, derived totals, persistence
//! - **Search**: category filter schemas, selections, catalog query strings
//! - **Checkout**: field formatters and validation, the checkout flow, orders
//! - **Catalog**: the static category, product-type and brand tables
//!
//! # Example
//!
//! ```rust
//! use redline_commerce::prelude::*;
//!
//! let mut cart = Cart::new(Currency::USD);
//! cart.add_item(&CatalogItem::new(1, "Chain", "CH-520", Money::new(4000, Currency::USD)), 2);
//! cart.add_item(&CatalogItem::new(2, "Chain lube", "LB-1", Money::new(2500, Currency::USD)), 1);
//!
//! let totals = cart.totals(&PricingConfig::default());
//! assert_eq!(totals.subtotal.display(), "$105.00");
//! assert!(totals.shipping.is_zero());
//!
//! let resolved = resolve_filters("dirt-bike-parts");
//! assert!(resolved.filters.get(SEARCH_KEY).is_some());
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod search;

mod legacy;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{PricingConfig, TaxRate};
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{find_category, Brand, CatalogItem, Category, ProductType, BRANDS, CATEGORIES};

    // Cart
    pub use crate::cart::{Cart, CartSession, CartTotals, LineItem, MAX_QUANTITY_PER_ITEM};

    // Checkout
    pub use crate::checkout::{
        locate_order, Address, CheckoutField, CheckoutFlow, CheckoutStep, Customer, FieldError, Order, OrderStore,
        PaymentIntentRequest, PaymentReference, YearMonth,
    };

    // Search
    pub use crate::search::{
        list_brands, resolve_filters, BrandQuery, CatalogQuery, FilterKind, FilterSchema, FilterSet,
        FilterValue, PriceRange, QueryParams, SelectedFilters, SortOption, SEARCH_KEY,
    };
}
