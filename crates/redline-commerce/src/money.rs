//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations. Catalog prices arrive
//! as decimal strings and are parsed digit by digit, never through `f64`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CommerceError;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    CAD,
    EUR,
    GBP,
    AUD,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::CAD => "CAD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::AUD => "AUD",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::CAD => "CA$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::AUD => "A$",
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "CAD" => Some(Currency::CAD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "AUD" => Some(Currency::AUD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Parse a non-negative decimal amount such as `"40.00"`, `"12.5"` or `"$1,299.99"`.
    ///
    /// Digits past the cent are rounded half-up.
    ///
    /// ```
    /// use redline_commerce::money::{Money, Currency};
    /// let price = Money::parse_decimal("49.99", Currency::USD).unwrap();
    /// assert_eq!(price.amount_cents, 4999);
    /// ```
    pub fn parse_decimal(input: &str, currency: Currency) -> Result<Self, CommerceError> {
        let invalid = || CommerceError::InvalidAmount(input.to_string());

        let cleaned: String = input
            .trim()
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();
        if cleaned.is_empty() {
            return Err(invalid());
        }

        let (whole, fraction) = match cleaned.split_once('.') {
            Some((w, f)) => (w, f),
            None => (cleaned.as_str(), ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let mut cents: i64 = 0;
        for digit in whole.bytes() {
            cents = cents
                .checked_mul(10)
                .and_then(|c| c.checked_add(i64::from(digit - b'0')))
                .ok_or(CommerceError::Overflow)?;
        }
        cents = cents.checked_mul(100).ok_or(CommerceError::Overflow)?;

        let mut digits = fraction.bytes().map(|d| i64::from(d - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|d| d >= 5);

        cents = cents
            .checked_add(tenths * 10 + hundredths + i64::from(round_up))
            .ok_or(CommerceError::Overflow)?;

        Ok(Self::new(cents, currency))
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }

    /// Try to add another Money value, returning None on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Try to multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Apply a rate expressed in basis points (1/100 of a percent), rounding half-up.
    ///
    /// ```
    /// use redline_commerce::money::{Money, Currency};
    /// let subtotal = Money::new(10500, Currency::USD);
    /// assert_eq!(subtotal.apply_basis_points(850).amount_cents, 893);
    /// ```
    pub fn apply_basis_points(&self, basis_points: u32) -> Money {
        let scaled = i128::from(self.amount_cents) * i128::from(basis_points);
        let half = if scaled < 0 { -5_000 } else { 5_000 };
        let cents = (scaled + half) / 10_000;
        Money::new(i64::try_from(cents).unwrap_or(i64::MAX), self.currency)
    }

    /// Sum money values, returning None on currency mismatch or overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_cents() {
        let m = Money::new(4999, Currency::USD);
        assert_eq!(m.amount_cents, 4999);
        assert_eq!(m.currency, Currency::USD);
    }

    #[test]
    fn test_parse_decimal() {
        let parse = |s| Money::parse_decimal(s, Currency::USD).unwrap().amount_cents;
        assert_eq!(parse("40.00"), 4000);
        assert_eq!(parse("40"), 4000);
        assert_eq!(parse("12.5"), 1250);
        assert_eq!(parse(".99"), 99);
        assert_eq!(parse("$1,299.99"), 129999);
        assert_eq!(parse("12.345"), 1235);
        assert_eq!(parse("12.344"), 1234);
        assert_eq!(parse(" 7.10 "), 710);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        for bad in ["", "-5.00", "abc", "1.2.3", ".", "$"] {
            assert!(
                Money::parse_decimal(bad, Currency::USD).is_err(),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(4999, Currency::USD).display(), "$49.99");
        assert_eq!(Money::new(5, Currency::USD).display(), "$0.05");
        assert_eq!(Money::new(-1299, Currency::USD).display_amount(), "-12.99");
        assert_eq!(Money::new(100, Currency::EUR).display(), "\u{20ac}1.00");
    }

    #[test]
    fn test_money_addition() {
        let a = Money::new(1000, Currency::USD);
        let b = Money::new(500, Currency::USD);
        assert_eq!(a.try_add(&b).unwrap().amount_cents, 1500);
    }

    #[test]
    fn test_money_currency_mismatch() {
        let usd = Money::new(1000, Currency::USD);
        let eur = Money::new(1000, Currency::EUR);
        assert!(usd.try_add(&eur).is_none());
    }

    #[test]
    fn test_try_sum() {
        let prices = [Money::new(4000, Currency::USD), Money::new(2500, Currency::USD)];
        assert_eq!(Money::try_sum(prices.iter(), Currency::USD).unwrap().amount_cents, 6500);
        assert!(Money::try_sum(std::iter::empty(), Currency::USD).unwrap().is_zero());

        let mixed = [Money::new(100, Currency::USD), Money::new(100, Currency::CAD)];
        assert!(Money::try_sum(mixed.iter(), Currency::USD).is_none());
    }

    #[test]
    fn test_money_multiply_overflow() {
        let m = Money::new(i64::MAX / 2, Currency::USD);
        assert!(m.try_multiply(3).is_none());
        assert_eq!(Money::new(1000, Currency::USD).try_multiply(2).unwrap().amount_cents, 2000);
    }

    #[test]
    fn test_basis_points_rounding() {
        let m = Money::new(10000, Currency::USD);
        assert_eq!(m.apply_basis_points(850).amount_cents, 850);
        assert_eq!(m.apply_basis_points(800).amount_cents, 800);
        assert_eq!(Money::new(1, Currency::USD).apply_basis_points(850).amount_cents, 0);
        assert_eq!(Money::new(6, Currency::USD).apply_basis_points(850).amount_cents, 1);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
