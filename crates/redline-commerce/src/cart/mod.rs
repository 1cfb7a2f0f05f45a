//! Shopping cart module.
//!
//! Contains the cart aggregator, derived totals and session persistence.

mod cart;
mod pricing;
mod session;

pub use cart::{Cart, LineItem, MAX_QUANTITY_PER_ITEM};
pub use pricing::{CartTotals, LineTotal};
pub use session::{CartRecord, CartSession, CART_RECORD_VERSION};
pub(crate) use cart::current_timestamp;
