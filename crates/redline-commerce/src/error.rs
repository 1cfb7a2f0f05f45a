//! Commerce error types.
//!
//! Cart and filter operations are total and never return these; they surface
//! from boundary parsing, persistence and checkout transitions.

use thiserror::Error;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Amount string could not be parsed as a non-negative decimal.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    /// Checkout incomplete.
    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(String),

    /// Checkout cannot start from an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Persisted record could not be read or written.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Persisted record has a version this build does not understand.
    #[error("Unsupported record version {0}")]
    UnsupportedVersion(u32),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<redline_cache::CacheError> for CommerceError {
    fn from(e: redline_cache::CacheError) -> Self {
        CommerceError::StorageError(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
