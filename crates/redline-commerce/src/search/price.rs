//! Price-range presets and the shared `"<min>-<max>"` encoding.

use serde::{Deserialize, Serialize};

use crate::money::{Currency, Money};

/// A named price bracket offered in the price filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePreset {
    pub id: &'static str,
    pub label: &'static str,
    pub min_dollars: u32,
    pub max_dollars: Option<u32>,
}

impl PricePreset {
    pub fn range(&self) -> PriceRange {
        PriceRange::new(
            i64::from(self.min_dollars) * 100,
            self.max_dollars.map(|d| i64::from(d) * 100),
        )
    }
}

/// Preset table, cheapest first.
pub static PRICE_PRESETS: &[PricePreset] = &[
    PricePreset { id: "under-25", label: "Under $25", min_dollars: 0, max_dollars: Some(25) },
    PricePreset { id: "25-50", label: "$25\u{2013}$50", min_dollars: 25, max_dollars: Some(50) },
    PricePreset { id: "50-100", label: "$50\u{2013}$100", min_dollars: 50, max_dollars: Some(100) },
    PricePreset { id: "100-250", label: "$100\u{2013}$250", min_dollars: 100, max_dollars: Some(250) },
    PricePreset { id: "250-500", label: "$250\u{2013}$500", min_dollars: 250, max_dollars: Some(500) },
    PricePreset { id: "500-plus", label: "$500 & Up", min_dollars: 500, max_dollars: None },
];

/// Find a preset by id, label or encoded value.
pub fn find_preset(needle: &str) -> Option<&'static PricePreset> {
    let needle = needle.trim();
    PRICE_PRESETS.iter().find(|p| {
        p.id.eq_ignore_ascii_case(needle) || p.label == needle || p.range().encode() == needle
    })
}

/// A price window in cents. `max_cents == None` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    pub min_cents: i64,
    pub max_cents: Option<i64>,
}

impl PriceRange {
    /// Build a range, clamping negatives to zero and swapping reversed bounds.
    pub fn new(min_cents: i64, max_cents: Option<i64>) -> Self {
        let min = min_cents.max(0);
        match max_cents.map(|m| m.max(0)) {
            Some(max) if max < min => Self { min_cents: max, max_cents: Some(min) },
            max => Self { min_cents: min, max_cents: max },
        }
    }

    /// Build a range from free-form min/max inputs.
    ///
    /// Blank or unparseable bounds are treated as absent. Returns `None` when
    /// neither bound survives, which callers treat as "filter not set".
    pub fn custom(min: &str, max: &str) -> Option<Self> {
        let parse = |s: &str| {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            Money::parse_decimal(s, Currency::USD).ok().map(|m| m.amount_cents)
        };
        match (parse(min), parse(max)) {
            (None, None) => None,
            (min, max) => Some(Self::new(min.unwrap_or(0), max)),
        }
    }

    /// Encode as `"<min>-<max>"` in dollars; an open max encodes as `"<min>-"`.
    pub fn encode(&self) -> String {
        match self.max_cents {
            Some(max) => format!("{}-{}", format_dollars(self.min_cents), format_dollars(max)),
            None => format!("{}-", format_dollars(self.min_cents)),
        }
    }

    /// Decode the encoding produced by [`PriceRange::encode`].
    pub fn decode(encoded: &str) -> Option<Self> {
        let (min, max) = encoded.trim().split_once('-')?;
        let min = if min.is_empty() {
            0
        } else {
            Money::parse_decimal(min, Currency::USD).ok()?.amount_cents
        };
        let max = if max.is_empty() {
            None
        } else {
            Some(Money::parse_decimal(max, Currency::USD).ok()?.amount_cents)
        };
        Some(Self::new(min, max))
    }

    /// Whether a price falls inside the window, inclusive.
    pub fn contains(&self, price: &Money) -> bool {
        price.amount_cents >= self.min_cents && self.max_cents.map_or(true, |max| price.amount_cents <= max)
    }

    /// The preset this range corresponds to, if any.
    pub fn preset(&self) -> Option<&'static PricePreset> {
        PRICE_PRESETS.iter().find(|p| p.range() == *self)
    }
}

/// `2500 -> "25"`, `1999 -> "19.99"`, `1950 -> "19.50"`.
fn format_dollars(cents: i64) -> String {
    if cents % 100 == 0 {
        format!("{}", cents / 100)
    } else {
        format!("{}.{:02}", cents / 100, cents % 100)
    }
}
