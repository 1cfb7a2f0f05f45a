//! Type-safe Key-Value store for Redline.
//!
//! Stands in for the browser-local store the storefront keeps its cart and
//! last order snapshot in. Values are stored as JSON under namespaced keys.
//!
//! # Example
//!
//! ```rust
//! use redline_cache::{cache_key, Cache};
//!
//! let cache = Cache::in_memory();
//! let key = cache_key!("cart", "c-123");
//!
//! cache.set(&key, &vec![1, 2, 3]).unwrap();
//! let items: Option<Vec<i32>> = cache.get(&key).unwrap();
//! assert_eq!(items, Some(vec![1, 2, 3]));
//!
//! cache.delete(&key).unwrap();
//! assert!(!cache.exists(&key).unwrap());
//! ```

mod error;
mod kv;

pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{cache_key, Cache, CacheError};
}
