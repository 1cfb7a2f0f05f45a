//! Field validation used when advancing through checkout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::format::{digits, format_name, CheckoutField};

/// Why a checkout field was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(CheckoutField),

    #[error("card number must be 16 digits")]
    CardLength,

    #[error("card number is not valid")]
    CardChecksum,

    #[error("expiration date must be MM/YY")]
    ExpiryFormat,

    #[error("expiration month must be between 01 and 12")]
    ExpiryMonth,

    #[error("card has expired")]
    Expired,

    #[error("security code must be 3 or 4 digits")]
    Cvv,

    #[error("phone number must be 10 digits")]
    Phone,

    #[error("ZIP code must be 5 or 9 digits")]
    Zip,

    #[error("email address is not valid")]
    Email,
}

/// A calendar month, used as "today" when checking card expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: u16,
    pub month: u8,
}

impl YearMonth {
    pub fn new(year: u16, month: u8) -> Self {
        Self { year, month }
    }
}

impl CheckoutField {
    /// Validate a (raw or formatted) value for this field.
    pub fn validate(&self, value: &str, today: YearMonth) -> Result<(), FieldError> {
        match self {
            CheckoutField::CardNumber => validate_card_number(value),
            CheckoutField::Expiry => validate_expiry(value, today).map(|_| ()),
            CheckoutField::Cvv => validate_cvv(value),
            CheckoutField::Phone => validate_phone(value),
            CheckoutField::Zip => validate_zip(value),
            CheckoutField::Name => validate_name(value),
        }
    }
}

pub fn validate_card_number(value: &str) -> Result<(), FieldError> {
    let digits = digits(value, usize::MAX);
    if digits.is_empty() {
        return Err(FieldError::Required(CheckoutField::CardNumber));
    }
    if digits.len() != 16 {
        return Err(FieldError::CardLength);
    }
    if !luhn_valid(&digits) {
        return Err(FieldError::CardChecksum);
    }
    Ok(())
}

/// Parse and check an expiry, returning the month it denotes.
pub fn validate_expiry(value: &str, today: YearMonth) -> Result<YearMonth, FieldError> {
    let digits = digits(value, usize::MAX);
    if digits.is_empty() {
        return Err(FieldError::Required(CheckoutField::Expiry));
    }
    if digits.len() != 4 {
        return Err(FieldError::ExpiryFormat);
    }
    let month: u8 = digits[..2].parse().map_err(|_| FieldError::ExpiryFormat)?;
    let year: u16 = digits[2..].parse().map_err(|_| FieldError::ExpiryFormat)?;
    if !(1..=12).contains(&month) {
        return Err(FieldError::ExpiryMonth);
    }
    let expiry = YearMonth::new(2000 + year, month);
    if expiry < today {
        return Err(FieldError::Expired);
    }
    Ok(expiry)
}

pub fn validate_cvv(value: &str) -> Result<(), FieldError> {
    match digits(value, usize::MAX).len() {
        0 => Err(FieldError::Required(CheckoutField::Cvv)),
        3 | 4 => Ok(()),
        _ => Err(FieldError::Cvv),
    }
}

pub fn validate_phone(value: &str) -> Result<(), FieldError> {
    match digits(value, usize::MAX).len() {
        0 => Err(FieldError::Required(CheckoutField::Phone)),
        10 => Ok(()),
        _ => Err(FieldError::Phone),
    }
}

pub fn validate_zip(value: &str) -> Result<(), FieldError> {
    match digits(value, usize::MAX).len() {
        0 => Err(FieldError::Required(CheckoutField::Zip)),
        5 | 9 => Ok(()),
        _ => Err(FieldError::Zip),
    }
}

pub fn validate_name(value: &str) -> Result<(), FieldError> {
    if format_name(value).trim().is_empty() {
        return Err(FieldError::Required(CheckoutField::Name));
    }
    Ok(())
}

/// Shape check only: `local@domain.tld`.
pub fn validate_email(value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    let (local, domain) = value.split_once('@').ok_or(FieldError::Email)?;
    let domain_ok = domain
        .split_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'));
    if local.is_empty() || !domain_ok || value.chars().any(char::is_whitespace) {
        return Err(FieldError::Email);
    }
    Ok(())
}

fn luhn_valid(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const TODAY: YearMonth = YearMonth { year: 2026, month: 10 };

    #[test]
    fn test_card_number() {
        assert_eq!(validate_card_number("4242 4242 4242 4242"), Ok(()));
        assert_eq!(validate_card_number("4242 4242 4242 4241"), Err(FieldError::CardChecksum));
        assert_eq!(validate_card_number("4242"), Err(FieldError::CardLength));
        assert_eq!(
            validate_card_number(""),
            Err(FieldError::Required(CheckoutField::CardNumber))
        );
    }

    #[test]
    fn test_expiry() {
        assert_eq!(validate_expiry("10/26", TODAY), Ok(YearMonth::new(2026, 10)));
        assert_eq!(validate_expiry("01/30", TODAY), Ok(YearMonth::new(2030, 1)));
        assert_eq!(validate_expiry("09/26", TODAY), Err(FieldError::Expired));
        assert_eq!(validate_expiry("13/27", TODAY), Err(FieldError::ExpiryMonth));
        assert_eq!(validate_expiry("00/27", TODAY), Err(FieldError::ExpiryMonth));
        assert_eq!(validate_expiry("1/2", TODAY), Err(FieldError::ExpiryFormat));
    }

    #[test]
    fn test_cvv_phone_zip() {
        assert!(validate_cvv("123").is_ok());
        assert!(validate_cvv("1234").is_ok());
        assert_eq!(validate_cvv("12"), Err(FieldError::Cvv));

        assert!(validate_phone("(555) 123-4567").is_ok());
        assert_eq!(validate_phone("555-1234"), Err(FieldError::Phone));

        assert!(validate_zip("90210").is_ok());
        assert!(validate_zip("90210-1234").is_ok());
        assert_eq!(validate_zip("9021"), Err(FieldError::Zip));
    }

    #[test]
    fn test_name() {
        assert!(validate_name("Ada Lovelace").is_ok());
        assert_eq!(validate_name(" 123 "), Err(FieldError::Required(CheckoutField::Name)));
    }

    #[test]
    fn test_email() {
        assert!(validate_email("rider@example.com").is_ok());
        assert_eq!(validate_email("rider@localhost"), Err(FieldError::Email));
        assert_eq!(validate_email("@example.com"), Err(FieldError::Email));
        assert_eq!(validate_email("rider example@x.com"), Err(FieldError::Email));
    }

    #[test]
    fn test_field_dispatch() {
        assert!(CheckoutField::Zip.validate("12345", TODAY).is_ok());
        assert!(CheckoutField::Expiry.validate("12/20", TODAY).is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FieldError::Required(CheckoutField::Phone).to_string(),
            "Phone is required"
        );
    }
}
