//! Pricing configuration shared by cart, checkout and order views.

use serde::{Deserialize, Serialize};

use crate::money::{Currency, Money};

/// Subtotal at or above which shipping is free, in cents.
pub const FREE_SHIPPING_THRESHOLD_CENTS: i64 = 9_900;

/// Flat shipping fee below the threshold, in cents.
pub const FLAT_SHIPPING_CENTS: i64 = 1_299;

/// Default sales tax rate.
///
/// Cart and checkout historically charged 8.5% while order confirmation
/// recomputed with 8%. Every view now reads this one value; which figure is
/// authoritative is still waiting on the product owner.
pub const DEFAULT_TAX_RATE: TaxRate = TaxRate::from_basis_points(850);

/// A tax rate in basis points (850 = 8.5%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Create a rate from basis points.
    pub const fn from_basis_points(bps: u32) -> Self {
        Self(bps)
    }

    /// Create a rate from a fraction such as `0.085`.
    ///
    /// Negative and non-finite values collapse to zero.
    pub fn from_fraction(fraction: f64) -> Self {
        if !fraction.is_finite() || fraction <= 0.0 {
            return Self(0);
        }
        Self((fraction * 10_000.0).round().min(f64::from(u32::MAX)) as u32)
    }

    /// The rate in basis points.
    pub fn basis_points(&self) -> u32 {
        self.0
    }

    /// The rate as a fraction.
    pub fn as_fraction(&self) -> f64 {
        f64::from(self.0) / 10_000.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        DEFAULT_TAX_RATE
    }
}

// Config files carry the human-friendly fraction (0.085), not basis points.
impl Serialize for TaxRate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_fraction())
    }
}

impl<'de> Deserialize<'de> for TaxRate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fraction = f64::deserialize(deserializer)?;
        Ok(TaxRate::from_fraction(fraction))
    }
}

/// Parameters for deriving cart totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Storefront currency.
    pub currency: Currency,
    /// Subtotal at or above which shipping is free, in cents.
    pub free_shipping_threshold_cents: i64,
    /// Flat shipping fee below the threshold, in cents.
    pub flat_shipping_cents: i64,
    /// Sales tax rate as a fraction.
    pub tax_rate: TaxRate,
}

impl PricingConfig {
    /// Free-shipping threshold as money.
    pub fn free_shipping_threshold(&self) -> Money {
        Money::new(self.free_shipping_threshold_cents, self.currency)
    }

    /// Flat shipping fee as money.
    pub fn flat_shipping(&self) -> Money {
        Money::new(self.flat_shipping_cents, self.currency)
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: Currency::USD,
            free_shipping_threshold_cents: FREE_SHIPPING_THRESHOLD_CENTS,
            flat_shipping_cents: FLAT_SHIPPING_CENTS,
            tax_rate: DEFAULT_TAX_RATE,
        }
    }
}
