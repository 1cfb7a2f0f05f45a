//! Checkout module.
//!
//! Field formatting and validation, the checkout flow, payment-intent
//! requests, and placed orders.

mod address;
mod flow;
mod format;
mod order;
mod payment;
mod validate;

pub use address::Address;
pub use flow::{CardSummary, CheckoutFlow, CheckoutStep};
pub use format::{
    format_card_number, format_cvv, format_expiry, format_name, format_phone, format_zip, CheckoutField,
};
pub use order::{
    generate_order_number, locate_order, Customer, LocatedOrder, Order, OrderLookup, OrderRecord, OrderSource,
    OrderStore, OrderTotals, PaymentReference, ORDER_RECORD_VERSION,
};
pub use payment::{
    PaymentIntent, PaymentIntentRequest, CART_METADATA_KEY, CHECKOUT_METADATA_KEY, IDEMPOTENCY_METADATA_KEY,
};
pub use validate::{
    validate_card_number, validate_cvv, validate_email, validate_expiry, validate_name, validate_phone,
    validate_zip, FieldError, YearMonth,
};
