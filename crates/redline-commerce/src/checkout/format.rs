//! Keystroke formatters for checkout inputs.
//!
//! Each formatter takes the raw input value (and, for expiry, the value it
//! replaced) and returns the display value. They are total and idempotent:
//! feeding a formatted value back in returns it unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const CARD_DIGITS: usize = 16;
const EXPIRY_DIGITS: usize = 4;
const CVV_DIGITS: usize = 4;
const PHONE_DIGITS: usize = 10;
const ZIP_DIGITS: usize = 9;
const NAME_CHARS: usize = 50;

/// A formatted checkout input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckoutField {
    CardNumber,
    Expiry,
    Cvv,
    Phone,
    Zip,
    Name,
}

impl CheckoutField {
    pub const ALL: [CheckoutField; 6] = [
        CheckoutField::CardNumber,
        CheckoutField::Expiry,
        CheckoutField::Cvv,
        CheckoutField::Phone,
        CheckoutField::Zip,
        CheckoutField::Name,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutField::CardNumber => "card-number",
            CheckoutField::Expiry => "expiry",
            CheckoutField::Cvv => "cvv",
            CheckoutField::Phone => "phone",
            CheckoutField::Zip => "zip",
            CheckoutField::Name => "name",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutField::CardNumber => "Card number",
            CheckoutField::Expiry => "Expiration date",
            CheckoutField::Cvv => "Security code",
            CheckoutField::Phone => "Phone",
            CheckoutField::Zip => "ZIP code",
            CheckoutField::Name => "Name",
        }
    }

    /// Format `raw`. `previous` is the value before this keystroke and only
    /// matters for expiry, where it distinguishes typing from deleting.
    pub fn format(&self, raw: &str, previous: Option<&str>) -> String {
        match self {
            CheckoutField::CardNumber => format_card_number(raw),
            CheckoutField::Expiry => format_expiry(raw, previous),
            CheckoutField::Cvv => format_cvv(raw),
            CheckoutField::Phone => format_phone(raw),
            CheckoutField::Zip => format_zip(raw),
            CheckoutField::Name => format_name(raw),
        }
    }
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for CheckoutField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('_', "-");
        match needle.as_str() {
            "card" | "card-number" => Ok(CheckoutField::CardNumber),
            "expiry" | "exp" => Ok(CheckoutField::Expiry),
            "cvv" | "cvc" => Ok(CheckoutField::Cvv),
            "phone" => Ok(CheckoutField::Phone),
            "zip" | "postal-code" => Ok(CheckoutField::Zip),
            "name" => Ok(CheckoutField::Name),
            _ => Err(format!("unknown checkout field: {s}")),
        }
    }
}

/// Up to `max` ASCII digits from `raw`.
pub(crate) fn digits(raw: &str, max: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// `"4242424242424242"` → `"4242 4242 4242 4242"`.
pub fn format_card_number(raw: &str) -> String {
    let digits = digits(raw, CARD_DIGITS);
    let mut out = String::with_capacity(digits.len() + 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// `MM/YY`, inserting the slash as soon as the month is typed.
///
/// When the new value is shorter than `previous` the user is deleting:
/// a trailing slash is dropped rather than re-added, and deleting the
/// auto-inserted slash itself also removes the digit before it.
pub fn format_expiry(raw: &str, previous: Option<&str>) -> String {
    let digits = digits(raw, EXPIRY_DIGITS);
    let deleting = previous.is_some_and(|p| raw.len() < p.len());

    if deleting {
        if raw.ends_with('/') {
            return digits;
        }
        let removed_slash = previous.is_some_and(|p| p.ends_with('/') && p.trim_end_matches('/') == raw);
        if removed_slash {
            let mut digits = digits;
            digits.pop();
            return digits;
        }
        return match digits.len() {
            0..=2 => digits,
            _ => format!("{}/{}", &digits[..2], &digits[2..]),
        };
    }

    match digits.len() {
        0 | 1 => digits,
        2 => format!("{digits}/"),
        _ => format!("{}/{}", &digits[..2], &digits[2..]),
    }
}

/// Up to four digits.
pub fn format_cvv(raw: &str) -> String {
    digits(raw, CVV_DIGITS)
}

/// Progressive `(xxx) xxx-xxxx`.
pub fn format_phone(raw: &str) -> String {
    let digits = digits(raw, PHONE_DIGITS);
    match digits.len() {
        0..=3 => digits,
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}

/// `12345` or `12345-6789`.
pub fn format_zip(raw: &str) -> String {
    let digits = digits(raw, ZIP_DIGITS);
    if digits.len() > 5 {
        format!("{}-{}", &digits[..5], &digits[5..])
    } else {
        digits
    }
}

/// Letters, spaces, hyphens and apostrophes; at most 50 characters.
pub fn format_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphabetic() || matches!(c, ' ' | '-' | '\''))
        .take(NAME_CHARS)
        .collect()
}
