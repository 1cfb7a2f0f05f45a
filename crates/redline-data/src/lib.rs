//! Outbound HTTP for the storefront.
//!
//! This crate provides:
//! - `Transport` - one request in, one response out (`reqwest` in production)
//! - `FetchClient` - timeout and retry around a transport
//! - `DependencyTag` - per-service defaults
//! - `CatalogClient` / `PaymentClient` - typed service clients

mod catalog;
mod client;
mod dependency;
mod payment;
mod retry;
mod timeout;
mod transport;

pub use catalog::*;
pub use client::*;
pub use dependency::*;
pub use payment::*;
pub use retry::*;
pub use timeout::*;
pub use transport::*;
