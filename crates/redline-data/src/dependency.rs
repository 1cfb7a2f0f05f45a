//! Dependency tagging for outbound calls.

use std::time::Duration;

/// The external services the storefront talks to.
///
/// Each tag carries a default timeout and retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyTag {
    /// Third-party catalog service (listings, item lookups).
    Catalog,
    /// Payment processor (payment intents).
    Payment,
}

impl DependencyTag {
    /// Get the default timeout for this dependency.
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(12)
    }

    /// Get the default number of retries for this dependency.
    ///
    /// Payment calls only use theirs when the request is safe to repeat.
    pub fn default_max_retries(&self) -> u32 {
        1
    }

    /// Whether a failure should surface to the shopper immediately.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Payment)
    }

    /// Get the name of this dependency.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Payment => "payment",
        }
    }
}

impl std::fmt::Display for DependencyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(DependencyTag::Catalog.default_timeout(), Duration::from_secs(12));
        assert_eq!(DependencyTag::Payment.default_max_retries(), 1);
        assert!(DependencyTag::Payment.is_critical());
        assert_eq!(DependencyTag::Catalog.to_string(), "catalog");
    }
}
