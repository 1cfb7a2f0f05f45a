//! Shipping addresses.

use serde::{Deserialize, Serialize};

use super::format::{format_name, format_phone, format_zip};
use super::validate::{validate_name, validate_zip, FieldError};

/// A US postal address.
///
/// Aliases accept the camelCase keys of order snapshots written before the
/// canonical order record existed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    /// Street line.
    #[serde(alias = "line1", alias = "street")]
    pub address1: String,
    /// Apartment, suite, unit.
    #[serde(default, alias = "line2", skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub city: String,
    /// Two-letter state code.
    #[serde(default, alias = "state")]
    pub province_code: Option<String>,
    /// ZIP or ZIP+4, formatted.
    #[serde(alias = "postalCode", alias = "zipCode")]
    pub zip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Address {
    /// Create an address, running names, ZIP and phone through the
    /// checkout formatters.
    pub fn new(
        first_name: &str,
        last_name: &str,
        address1: impl Into<String>,
        city: impl Into<String>,
        province_code: Option<&str>,
        zip: &str,
    ) -> Self {
        Self {
            first_name: format_name(first_name).trim().to_string(),
            last_name: format_name(last_name).trim().to_string(),
            address1: address1.into().trim().to_string(),
            address2: None,
            city: city.into().trim().to_string(),
            province_code: province_code
                .map(|p| p.trim().to_ascii_uppercase())
                .filter(|p| !p.is_empty()),
            zip: format_zip(zip),
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        let phone = format_phone(phone);
        self.phone = (!phone.is_empty()).then_some(phone);
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.address1.clone()];
        if let Some(ref addr2) = self.address2 {
            parts.push(addr2.clone());
        }
        parts.push(self.city.clone());
        match &self.province_code {
            Some(state) => parts.push(format!("{} {}", state, self.zip)),
            None => parts.push(self.zip.clone()),
        }
        parts.join(", ")
    }

    /// Format as multi-line, mailing-label style.
    pub fn multi_line(&self) -> String {
        let mut lines = vec![self.full_name(), self.address1.clone()];
        if let Some(ref addr2) = self.address2 {
            lines.push(addr2.clone());
        }
        let city_line = match &self.province_code {
            Some(state) => format!("{}, {} {}", self.city, state, self.zip),
            None => format!("{} {}", self.city, self.zip),
        };
        lines.push(city_line);
        lines.join("\n")
    }

    /// Every problem preventing this address from being shipped to.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if let Err(e) = validate_name(&self.full_name()) {
            problems.push(e.to_string());
        }
        if self.address1.trim().is_empty() {
            problems.push("street address is required".to_string());
        }
        if self.city.trim().is_empty() {
            problems.push("city is required".to_string());
        }
        if let Err(e) = validate_zip(&self.zip) {
            problems.push(e.to_string());
        }
        problems
    }

    pub fn is_complete(&self) -> bool {
        self.problems().is_empty()
    }

    /// First validation failure on the ZIP, if any.
    pub fn zip_error(&self) -> Option<FieldError> {
        validate_zip(&self.zip).err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_creation_formats_fields() {
        let addr = Address::new("John3", "Doe", " 123 Main St ", "Austin", Some("tx"), "787011234")
            .with_phone("5125550100");
        assert_eq!(addr.full_name(), "John Doe");
        assert_eq!(addr.zip, "78701-1234");
        assert_eq!(addr.province_code.as_deref(), Some("TX"));
        assert_eq!(addr.phone.as_deref(), Some("(512) 555-0100"));
        assert!(addr.is_complete());
    }

    #[test]
    fn test_address_formatting() {
        let addr = Address::new("Jane", "Smith", "456 Oak Ave", "Los Angeles", Some("CA"), "90001");
        assert_eq!(addr.one_line(), "456 Oak Ave, Los Angeles, CA 90001");
        assert_eq!(addr.multi_line(), "Jane Smith\n456 Oak Ave\nLos Angeles, CA 90001");
    }

    #[test]
    fn test_incomplete_address() {
        let addr = Address::new("", "", "", "Reno", None, "8950");
        let problems = addr.problems();
        assert_eq!(problems.len(), 3);
        assert!(!addr.is_complete());
        assert_eq!(addr.zip_error(), Some(FieldError::Zip));
    }

    #[test]
    fn test_camel_case_aliases() {
        let addr: Address = serde_json::from_str(
            r#"{"firstName":"Ana","lastName":"Ruiz","line1":"1 Elm","city":"Provo","state":"UT","postalCode":"84601"}"#,
        )
        .unwrap();
        assert_eq!(addr.full_name(), "Ana Ruiz");
        assert_eq!(addr.province_code.as_deref(), Some("UT"));
        assert!(addr.is_complete());
    }
}
